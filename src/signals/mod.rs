/// Adverse-event signal analysis for drug pairs
///
/// - `pair`: order-independent, case-insensitive pair identity
/// - `query`: openFDA event-search request construction
/// - `aggregate`: reaction grouping, ranking and truncation
/// - `analyzer`: cached orchestration of the above
/// - `types`: result types returned to callers
pub mod aggregate;
pub mod analyzer;
pub mod pair;
pub mod query;
pub mod types;

pub use analyzer::{
    EventSource, QueryTarget, SignalAnalyzer, SignalCache, SignalCacheKey, DEFAULT_LIMIT,
};
pub use pair::{canonicalize, DrugPairKey};
pub use types::{ReactionCount, SignalAnalysis};
