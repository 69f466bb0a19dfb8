//! Congress.gov tool surface.
//!
//! Declarative definitions plus thin handlers over [`CongressClient`]. The
//! schemas carry every documented bound, so by the time a handler runs its
//! arguments deserialize cleanly into the typed forms below.

use std::sync::Arc;

use serde::Deserialize;

use crate::client::params::{Chamber, Pagination};
use crate::client::CongressClient;
use crate::tools::registry::{handler, ToolDefinition, ToolRegistry};
use crate::tools::schema::{FieldType, InputSchema};
use crate::tools::parse_args;
use crate::types::Result;

/// Register all Congress.gov tools on `registry`.
pub fn register_congress_tools(
    registry: &mut ToolRegistry,
    client: Arc<CongressClient>,
) -> Result<()> {
    register_search_bills(registry, Arc::clone(&client))?;
    register_get_bill(registry, Arc::clone(&client))?;
    register_bill_subresources(registry, Arc::clone(&client))?;
    register_members(registry, Arc::clone(&client))?;
    register_meetings_and_nominations(registry, Arc::clone(&client))?;
    register_roll_call_vote(registry, client)?;
    Ok(())
}

// =============================================================================
// Shared schema fragments and argument shapes
// =============================================================================

fn bill_locator() -> InputSchema {
    InputSchema::new()
        .required(
            "congress",
            FieldType::integer_in(93, 123),
            "Congress number (93 through 123)",
        )
        .required(
            "chamber",
            FieldType::one_of(&["house", "senate"]),
            "Originating chamber",
        )
        .required(
            "billNumber",
            FieldType::String,
            "Bill identifier, e.g. hr1 or s2089",
        )
}

fn with_paging(schema: InputSchema) -> InputSchema {
    schema
        .optional(
            "limit",
            FieldType::integer_in(1, 250),
            "Results per page (default 20, maximum 250)",
        )
        .optional("offset", FieldType::unsigned(), "Zero-based result offset")
}

#[derive(Debug, Default, Deserialize)]
struct PageArgs {
    limit: Option<u32>,
    offset: Option<u32>,
}

impl PageArgs {
    fn into_pagination(self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BillArgs {
    congress: u16,
    chamber: Chamber,
    bill_number: String,
    #[serde(flatten)]
    page: PageArgs,
}

// =============================================================================
// Bill tools
// =============================================================================

fn register_search_bills(registry: &mut ToolRegistry, client: Arc<CongressClient>) -> Result<()> {
    #[derive(Debug, Deserialize)]
    struct Args {
        query: Option<String>,
        #[serde(flatten)]
        page: PageArgs,
    }

    registry.register(
        ToolDefinition::new(
            "congress_search_bills",
            "Search bills on Congress.gov, optionally filtered by a full-text query.",
            with_paging(InputSchema::new().optional(
                "query",
                FieldType::String,
                "Full-text search query",
            )),
        ),
        handler(move |args| {
            let client = Arc::clone(&client);
            async move {
                let args: Args = parse_args(args)?;
                client
                    .search_bills(args.query.as_deref(), args.page.into_pagination())
                    .await
            }
        }),
    )
}

fn register_get_bill(registry: &mut ToolRegistry, client: Arc<CongressClient>) -> Result<()> {
    registry.register(
        ToolDefinition::new(
            "congress_get_bill",
            "Fetch detail for one bill by congress, chamber and bill number.",
            bill_locator(),
        ),
        handler(move |args| {
            let client = Arc::clone(&client);
            async move {
                let args: BillArgs = parse_args(args)?;
                client
                    .bill(args.congress, args.chamber, &args.bill_number)
                    .await
            }
        }),
    )
}

fn register_bill_subresources(
    registry: &mut ToolRegistry,
    client: Arc<CongressClient>,
) -> Result<()> {
    #[derive(Debug, Clone, Copy)]
    enum Subresource {
        Actions,
        Text,
        Amendments,
        Cosponsors,
    }

    // One tool per subresource; they share the locator schema plus paging.
    let subresources = [
        (
            "congress_get_bill_actions",
            "List the action history of one bill.",
            Subresource::Actions,
        ),
        (
            "congress_get_bill_text",
            "List the published text versions of one bill.",
            Subresource::Text,
        ),
        (
            "congress_get_bill_amendments",
            "List amendments to one bill.",
            Subresource::Amendments,
        ),
        (
            "congress_get_bill_cosponsors",
            "List cosponsors of one bill.",
            Subresource::Cosponsors,
        ),
    ];

    for (name, description, sub) in subresources {
        let client = Arc::clone(&client);
        registry.register(
            ToolDefinition::new(name, description, with_paging(bill_locator())),
            handler(move |args| {
                let client = Arc::clone(&client);
                async move {
                    let args: BillArgs = parse_args(args)?;
                    let (congress, chamber) = (args.congress, args.chamber);
                    let number = &args.bill_number;
                    let page = args.page.into_pagination();
                    match sub {
                        Subresource::Actions => {
                            client.bill_actions(congress, chamber, number, page).await
                        }
                        Subresource::Text => {
                            client.bill_text(congress, chamber, number, page).await
                        }
                        Subresource::Amendments => {
                            client.bill_amendments(congress, chamber, number, page).await
                        }
                        Subresource::Cosponsors => {
                            client.bill_cosponsors(congress, chamber, number, page).await
                        }
                    }
                }
            }),
        )?;
    }
    Ok(())
}

// =============================================================================
// Member, meeting and nomination tools
// =============================================================================

fn register_members(registry: &mut ToolRegistry, client: Arc<CongressClient>) -> Result<()> {
    let list_client = Arc::clone(&client);
    registry.register(
        ToolDefinition::new(
            "congress_list_members",
            "List members of Congress.",
            with_paging(InputSchema::new()),
        ),
        handler(move |args| {
            let client = Arc::clone(&list_client);
            async move {
                let args: PageArgs = parse_args(args)?;
                client.members(args.into_pagination()).await
            }
        }),
    )?;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct MemberArgs {
        bioguide_id: String,
    }

    registry.register(
        ToolDefinition::new(
            "congress_get_member",
            "Fetch detail for one member by bioguide id.",
            InputSchema::new().required(
                "bioguideId",
                FieldType::String,
                "Bioguide identifier, e.g. A000360",
            ),
        ),
        handler(move |args| {
            let client = Arc::clone(&client);
            async move {
                let args: MemberArgs = parse_args(args)?;
                client.member(&args.bioguide_id).await
            }
        }),
    )
}

fn register_meetings_and_nominations(
    registry: &mut ToolRegistry,
    client: Arc<CongressClient>,
) -> Result<()> {
    let meetings_client = Arc::clone(&client);
    registry.register(
        ToolDefinition::new(
            "congress_list_committee_meetings",
            "List committee meetings.",
            with_paging(InputSchema::new()),
        ),
        handler(move |args| {
            let client = Arc::clone(&meetings_client);
            async move {
                let args: PageArgs = parse_args(args)?;
                client.committee_meetings(args.into_pagination()).await
            }
        }),
    )?;

    registry.register(
        ToolDefinition::new(
            "congress_list_nominations",
            "List presidential nominations before the Senate.",
            with_paging(InputSchema::new()),
        ),
        handler(move |args| {
            let client = Arc::clone(&client);
            async move {
                let args: PageArgs = parse_args(args)?;
                client.nominations(args.into_pagination()).await
            }
        }),
    )
}

// =============================================================================
// Vote tools
// =============================================================================

fn register_roll_call_vote(registry: &mut ToolRegistry, client: Arc<CongressClient>) -> Result<()> {
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Args {
        congress: u16,
        chamber: Chamber,
        session: u8,
        roll_call: u32,
    }

    registry.register(
        ToolDefinition::new(
            "congress_get_roll_call_vote",
            "Fetch one recorded vote by congress, chamber, session and roll call number.",
            InputSchema::new()
                .required(
                    "congress",
                    FieldType::integer_in(93, 123),
                    "Congress number (93 through 123)",
                )
                .required(
                    "chamber",
                    FieldType::one_of(&["house", "senate"]),
                    "Voting chamber",
                )
                .required(
                    "session",
                    FieldType::integer_in(1, 2),
                    "Session within the congress",
                )
                .required(
                    "rollCall",
                    FieldType::integer_in(1, i64::from(u32::MAX)),
                    "Roll call vote number",
                ),
        ),
        handler(move |args| {
            let client = Arc::clone(&client);
            async move {
                let args: Args = parse_args(args)?;
                client
                    .roll_call_vote(args.congress, args.chamber, args.session, args.roll_call)
                    .await
            }
        }),
    )
}
