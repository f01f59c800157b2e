/// In-memory caching
///
/// - `config`: TTL and capacity per cached entity type
/// - `manager`: generic TTL/LRU cache with single-flight `get_or_compute`
pub mod config;
pub mod manager;

pub use config::CacheConfig;
pub use manager::{CacheManager, CacheMetrics};
