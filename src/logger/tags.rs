/// Log tags identify the subsystem a message comes from.
///
/// Each tag has a debug key used by `--debug <key>` on the command line.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Api,
    Cache,
    Signals,
    Notes,
    Webserver,
    /// Records forwarded from third-party crates through the `log` facade
    External,
}

impl LogTag {
    pub const ALL: [LogTag; 8] = [
        LogTag::System,
        LogTag::Config,
        LogTag::Api,
        LogTag::Cache,
        LogTag::Signals,
        LogTag::Notes,
        LogTag::Webserver,
        LogTag::External,
    ];

    /// Key accepted by `--debug <key>`
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Api => "api",
            LogTag::Cache => "cache",
            LogTag::Signals => "signals",
            LogTag::Notes => "notes",
            LogTag::Webserver => "webserver",
            LogTag::External => "external",
        }
    }

    /// Uppercase label used in formatted output
    pub fn to_plain_string(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Api => "API",
            LogTag::Cache => "CACHE",
            LogTag::Signals => "SIGNALS",
            LogTag::Notes => "NOTES",
            LogTag::Webserver => "WEBSERVER",
            LogTag::External => "EXTERNAL",
        }
    }

    pub fn from_debug_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.iter().copied().find(|tag| tag.to_debug_key() == key)
    }
}
