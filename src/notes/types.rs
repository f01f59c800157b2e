/// Drug interaction note record
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-text note about a drug pair
///
/// `drug_a`/`drug_b` are in canonical order, with the casing used when the
/// note was first created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugInteractionNote {
    pub drug_a: String,
    pub drug_b: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
