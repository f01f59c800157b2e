/// Cache configuration per cached entity type
///
/// Signal analyses are expensive (one upstream search each) and the
/// underlying report database changes slowly, so they get a long TTL.
use crate::config::SignalsConfig;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Absolute time-to-live, measured from the moment an entry is stored
    pub ttl: Duration,

    /// Maximum number of stored entries (LRU eviction when exceeded, 0 = unbounded)
    pub capacity: usize,
}

impl CacheConfig {
    /// Signal analyses: one hour, bounded as an operational safeguard
    pub fn signal_analysis() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            capacity: 10_000,
        }
    }

    pub fn custom(ttl_secs: u64, capacity: usize) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            capacity,
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.capacity > 0
    }
}

impl From<&SignalsConfig> for CacheConfig {
    fn from(config: &SignalsConfig) -> Self {
        Self::custom(config.cache_ttl_secs, config.cache_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_defaults_match_config_defaults() {
        let from_config = CacheConfig::from(&SignalsConfig::default());
        assert_eq!(from_config, CacheConfig::signal_analysis());
        assert_eq!(from_config.ttl, Duration::from_secs(60 * 60));
    }

    #[test]
    fn test_zero_capacity_is_unbounded() {
        assert!(!CacheConfig::custom(10, 0).is_bounded());
        assert!(CacheConfig::custom(10, 1).is_bounded());
    }
}
