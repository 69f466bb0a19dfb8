//! Congress.gov API client (v3).
//!
//! Thin typed methods over the shared transport. Every method validates its
//! parameters locally and returns the decoded JSON body; responses are
//! always requested in JSON format.

use std::sync::Arc;

use serde_json::Value;

use crate::client::http::Transport;
use crate::client::params::{self, Chamber, Pagination};
use crate::client::rate_limit::RateLimiter;
use crate::types::{Result, UpstreamConfig};

/// Typed access to the Congress.gov v3 REST API.
#[derive(Debug, Clone)]
pub struct CongressClient {
    transport: Transport,
}

impl CongressClient {
    pub fn new(config: &UpstreamConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config, limiter)?,
        })
    }

    /// List bills, optionally filtered by a full-text query.
    pub async fn search_bills(&self, query: Option<&str>, page: Pagination) -> Result<Value> {
        page.validate()?;
        let mut pairs = page_query(&page);
        if let Some(q) = query {
            params::non_empty("q", q)?;
            pairs.push(("q", q.to_string()));
        }
        self.transport.get_json("bill", &pairs).await
    }

    /// Detail for one bill.
    pub async fn bill(&self, congress: u16, chamber: Chamber, bill_number: &str) -> Result<Value> {
        let path = bill_path(congress, chamber, bill_number)?;
        self.transport.get_json(&path, &json_format()).await
    }

    /// Action history for one bill.
    pub async fn bill_actions(
        &self,
        congress: u16,
        chamber: Chamber,
        bill_number: &str,
        page: Pagination,
    ) -> Result<Value> {
        self.bill_subresource(congress, chamber, bill_number, "actions", page)
            .await
    }

    /// Text versions for one bill.
    pub async fn bill_text(
        &self,
        congress: u16,
        chamber: Chamber,
        bill_number: &str,
        page: Pagination,
    ) -> Result<Value> {
        self.bill_subresource(congress, chamber, bill_number, "text", page)
            .await
    }

    /// Amendments to one bill.
    pub async fn bill_amendments(
        &self,
        congress: u16,
        chamber: Chamber,
        bill_number: &str,
        page: Pagination,
    ) -> Result<Value> {
        self.bill_subresource(congress, chamber, bill_number, "amendments", page)
            .await
    }

    /// Cosponsors of one bill.
    pub async fn bill_cosponsors(
        &self,
        congress: u16,
        chamber: Chamber,
        bill_number: &str,
        page: Pagination,
    ) -> Result<Value> {
        self.bill_subresource(congress, chamber, bill_number, "cosponsors", page)
            .await
    }

    /// List members of Congress.
    pub async fn members(&self, page: Pagination) -> Result<Value> {
        page.validate()?;
        self.transport.get_json("member", &page_query(&page)).await
    }

    /// Detail for one member by bioguide id.
    pub async fn member(&self, bioguide_id: &str) -> Result<Value> {
        params::non_empty("bioguideId", bioguide_id)?;
        let path = format!("member/{}", bioguide_id);
        self.transport.get_json(&path, &json_format()).await
    }

    /// List committee meetings.
    pub async fn committee_meetings(&self, page: Pagination) -> Result<Value> {
        page.validate()?;
        self.transport
            .get_json("committee-meeting", &page_query(&page))
            .await
    }

    /// List nominations.
    pub async fn nominations(&self, page: Pagination) -> Result<Value> {
        page.validate()?;
        self.transport
            .get_json("nomination", &page_query(&page))
            .await
    }

    /// One recorded vote.
    pub async fn roll_call_vote(
        &self,
        congress: u16,
        chamber: Chamber,
        session: u8,
        roll_call: u32,
    ) -> Result<Value> {
        params::validate_congress_number(congress)?;
        params::validate_session(session)?;
        let path = format!(
            "roll-call-vote/{}/{}/{}/{}",
            congress, chamber, session, roll_call
        );
        self.transport.get_json(&path, &json_format()).await
    }

    async fn bill_subresource(
        &self,
        congress: u16,
        chamber: Chamber,
        bill_number: &str,
        suffix: &str,
        page: Pagination,
    ) -> Result<Value> {
        page.validate()?;
        let path = format!("{}/{}", bill_path(congress, chamber, bill_number)?, suffix);
        self.transport.get_json(&path, &page_query(&page)).await
    }
}

fn bill_path(congress: u16, chamber: Chamber, bill_number: &str) -> Result<String> {
    params::validate_congress_number(congress)?;
    params::non_empty("billNumber", bill_number)?;
    Ok(format!("bill/{}/{}/{}", congress, chamber, bill_number))
}

fn json_format() -> Vec<(&'static str, String)> {
    vec![("format", "json".to_string())]
}

fn page_query(page: &Pagination) -> Vec<(&'static str, String)> {
    let mut pairs = json_format();
    if let Some(limit) = page.limit {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(offset) = page.offset {
        pairs.push(("offset", offset.to_string()));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_path_layout() {
        let path = bill_path(118, Chamber::House, "hr1").unwrap();
        assert_eq!(path, "bill/118/house/hr1");

        let path = bill_path(117, Chamber::Senate, "s2089").unwrap();
        assert_eq!(path, "bill/117/senate/s2089");
    }

    #[test]
    fn test_bill_path_rejects_out_of_range_congress() {
        let err = bill_path(92, Chamber::House, "hr1").unwrap_err();
        assert!(err.to_string().contains("congress"));
    }

    #[test]
    fn test_bill_path_rejects_empty_number() {
        assert!(bill_path(118, Chamber::House, "").is_err());
    }

    #[test]
    fn test_page_query_always_requests_json() {
        let pairs = page_query(&Pagination::default());
        assert_eq!(pairs, vec![("format", "json".to_string())]);

        let pairs = page_query(&Pagination {
            limit: Some(50),
            offset: Some(100),
        });
        assert!(pairs.contains(&("limit", "50".to_string())));
        assert!(pairs.contains(&("offset", "100".to_string())));
    }
}
