/// Configuration schemas, each section declared once with its defaults
use crate::config_struct;

// ============================================================================
// OPENFDA CONFIGURATION
// ============================================================================

config_struct! {
    /// External adverse-event API settings
    pub struct OpenFdaConfig {
        /// Base URL, without the `drug/event.json` path
        base_url: String = "https://api.fda.gov".to_string(),

        /// API key; empty sends keyless requests (lower daily quota)
        api_key: String = String::new(),

        /// Request timeout for a single event search
        timeout_secs: u64 = 30,
    }
}

// ============================================================================
// SIGNAL ANALYSIS CONFIGURATION
// ============================================================================

config_struct! {
    /// Signal analysis and caching settings
    pub struct SignalsConfig {
        /// How long an analysis stays valid after it was stored
        cache_ttl_secs: u64 = 3600,

        /// Max cached analyses before LRU eviction (0 = unbounded)
        cache_capacity: usize = 10_000,

        /// Reaction limit used when a request does not specify one
        default_limit: usize = 50,

        /// Largest limit accepted from callers (openFDA caps a page at 1000)
        max_limit: usize = 1000,
    }
}

// ============================================================================
// WEBSERVER CONFIGURATION
// ============================================================================

config_struct! {
    /// HTTP API bind settings
    pub struct WebserverConfig {
        host: String = "127.0.0.1".to_string(),
        port: u16 = 8080,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    pub struct Config {
        openfda: OpenFdaConfig = OpenFdaConfig::default(),
        signals: SignalsConfig = SignalsConfig::default(),
        webserver: WebserverConfig = WebserverConfig::default(),
    }
}
