/// openFDA drug adverse-event response types
///
/// Only the fields the signal analysis reads are modelled; everything else in
/// an event report is ignored by serde.
use serde::{Deserialize, Serialize};

// ============================================================================
// SEARCH RESPONSE
// ============================================================================

/// Body of `GET /drug/event.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSearchResponse {
    pub meta: EventMeta,

    /// Page of matching reports (at most `limit` of them)
    #[serde(default)]
    pub results: Vec<AdverseEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMeta {
    pub results: ResultsMeta,
}

/// Paging metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsMeta {
    #[serde(default)]
    pub skip: u64,

    #[serde(default)]
    pub limit: u64,

    /// Number of reports matching the search, across all pages
    pub total: u64,
}

// ============================================================================
// EVENT REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdverseEvent {
    #[serde(default)]
    pub patient: Patient,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default)]
    pub reaction: Vec<PatientReaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientReaction {
    /// MedDRA preferred term, already normalized upstream (e.g. "HAEMORRHAGE")
    #[serde(rename = "reactionmeddrapt", default)]
    pub label: Option<String>,
}
