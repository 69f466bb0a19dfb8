//! Request parameter types and local bounds checks.
//!
//! Every bound the upstreams document is enforced here, before any network
//! I/O. Violation messages name the offending parameter using its wire
//! spelling so they can flow into tool envelopes unchanged.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Error, Result};

/// Congress numbers with data behind the APIs (93rd through 123rd).
pub const CONGRESS_RANGE: RangeInclusive<u16> = 93..=123;

/// Largest page Congress.gov will serve.
pub const MAX_CONGRESS_LIMIT: u32 = 250;

/// Largest page GovInfo will serve.
pub const MAX_GOVINFO_PAGE_SIZE: u32 = 100;

/// Chamber segment of bill and vote paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    House,
    Senate,
}

impl Chamber {
    /// Lowercase path segment form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Chamber::House => "house",
            Chamber::Senate => "senate",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chamber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "house" => Ok(Chamber::House),
            "senate" => Ok(Chamber::Senate),
            other => Err(Error::invalid_argument(format!(
                "chamber must be \"house\" or \"senate\", got {:?}",
                other
            ))),
        }
    }
}

/// Congress.gov list pagination. Absent fields fall back to upstream
/// defaults (limit 20, offset 0).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.limit {
            validate_congress_limit(limit)?;
        }
        Ok(())
    }
}

/// GovInfo list pagination. Absent fields fall back to upstream defaults
/// (pageSize 20, offsetMark `*`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GovInfoPaging {
    pub page_size: Option<u32>,
    pub offset_mark: Option<String>,
}

impl GovInfoPaging {
    pub fn validate(&self) -> Result<()> {
        if let Some(page_size) = self.page_size {
            validate_page_size(page_size)?;
        }
        Ok(())
    }
}

pub fn validate_congress_number(congress: u16) -> Result<()> {
    if CONGRESS_RANGE.contains(&congress) {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "congress must be between {} and {}, got {}",
            CONGRESS_RANGE.start(),
            CONGRESS_RANGE.end(),
            congress
        )))
    }
}

pub fn validate_congress_limit(limit: u32) -> Result<()> {
    if (1..=MAX_CONGRESS_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "limit must be between 1 and {}, got {}",
            MAX_CONGRESS_LIMIT, limit
        )))
    }
}

pub fn validate_page_size(page_size: u32) -> Result<()> {
    if (1..=MAX_GOVINFO_PAGE_SIZE).contains(&page_size) {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "pageSize must be between 1 and {}, got {}",
            MAX_GOVINFO_PAGE_SIZE, page_size
        )))
    }
}

/// Sessions within a congress are numbered 1 and 2.
pub fn validate_session(session: u8) -> Result<()> {
    if session == 1 || session == 2 {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "session must be 1 or 2, got {}",
            session
        )))
    }
}

/// Reject empty or whitespace-only identifier segments before they reach a
/// URL path.
pub fn non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::invalid_argument(format!("{} must not be empty", name)))
    } else {
        Ok(())
    }
}

/// GovInfo collection codes are short uppercase tokens (BILLS, PLAW, FR).
pub fn validate_collection_code(code: &str) -> Result<()> {
    non_empty("collection", code)?;
    if code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "collection must be an uppercase code like BILLS, got {:?}",
            code
        )))
    }
}

/// GovInfo download renditions are short lowercase tokens (pdf, xml, htm,
/// zip, mods, premis).
pub fn validate_content_type(content_type: &str) -> Result<()> {
    non_empty("contentType", content_type)?;
    if content_type
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "contentType must be a lowercase rendition code like pdf, got {:?}",
            content_type
        )))
    }
}

/// `fromDate` is an RFC 3339 timestamp, e.g. `2024-01-01T00:00:00Z`.
pub fn validate_from_date(raw: &str) -> Result<()> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|_| ())
        .map_err(|_| {
            Error::invalid_argument(format!(
                "fromDate must be an RFC 3339 timestamp like 2024-01-01T00:00:00Z, got {:?}",
                raw
            ))
        })
}
