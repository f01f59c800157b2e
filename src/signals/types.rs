/// Signal analysis result types (serialized camelCase for the HTTP API)
use serde::{Deserialize, Serialize};

/// Number of reports carrying one reaction label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionCount {
    pub reaction: String,
    pub count: u64,
}

impl ReactionCount {
    pub fn new(reaction: impl Into<String>, count: u64) -> Self {
        Self {
            reaction: reaction.into(),
            count,
        }
    }
}

/// Adverse-event signal for a drug pair
///
/// `drug_a`/`drug_b` are in canonical order with the casing the caller used.
/// `count` is the upstream total match count, not the size of the fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalAnalysis {
    pub drug_a: String,
    pub drug_b: String,
    pub count: u64,
    pub top_reactions: Vec<ReactionCount>,
}
