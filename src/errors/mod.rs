/// Error types for drugsignals
///
/// `SignalError` is `Clone` because a single in-flight computation hands the
/// same outcome to every waiter.
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// SIGNAL ANALYSIS ERRORS
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// Connection failure or timeout reaching the adverse-event API
    #[error("Upstream unavailable ({endpoint}): {reason}")]
    UpstreamUnavailable { endpoint: String, reason: String },

    /// Body did not parse into the expected event-search shape
    #[error("Malformed upstream response ({endpoint}): {reason}")]
    UpstreamMalformedResponse { endpoint: String, reason: String },

    /// Non-success HTTP status from the adverse-event API
    #[error("Upstream HTTP {status} ({endpoint}): {body}")]
    UpstreamHttpError {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The shared computation task panicked or was cancelled
    #[error("Signal computation aborted: {0}")]
    ComputeAborted(String),
}

impl SignalError {
    /// Stable machine-readable code, used in API error bodies and logs
    pub fn code(&self) -> &'static str {
        match self {
            SignalError::UpstreamUnavailable { .. } => "upstream_unavailable",
            SignalError::UpstreamMalformedResponse { .. } => "upstream_malformed_response",
            SignalError::UpstreamHttpError { .. } => "upstream_http_error",
            SignalError::ComputeAborted(_) => "compute_aborted",
        }
    }

    /// HTTP status reported by the upstream, when there was one
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            SignalError::UpstreamHttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for SignalError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            SignalError::ComputeAborted("task cancelled".to_string())
        } else {
            SignalError::ComputeAborted("task panicked".to_string())
        }
    }
}

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config field '{field}': {reason}")]
    Invalid { field: String, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

impl ConfigError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// REQUEST VALIDATION ERRORS
// =============================================================================

/// Field-level validation failures, keyed by request field name
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[error("Validation failed for {}", self.fields().join(", "))]
pub struct ValidationError {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn extend_field(&mut self, field: &str, messages: Vec<String>) {
        if messages.is_empty() {
            return;
        }
        self.errors
            .entry(field.to_string())
            .or_default()
            .extend(messages);
    }

    /// Fold another set of failures into this one
    pub fn merge(&mut self, other: ValidationError) {
        for (field, messages) in other.errors {
            self.extend_field(&field, messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_error_codes() {
        let err = SignalError::UpstreamHttpError {
            endpoint: "drug/event.json".to_string(),
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(err.code(), "upstream_http_error");
        assert_eq!(err.upstream_status(), Some(503));
        assert_eq!(err.to_string(), "Upstream HTTP 503 (drug/event.json): busy");

        let err = SignalError::UpstreamUnavailable {
            endpoint: "drug/event.json".to_string(),
            reason: "timed out".to_string(),
        };
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn test_validation_error_accumulates() {
        let mut err = ValidationError::new();
        assert!(err.clone().into_result().is_ok());

        err.add("drugA", "too short");
        err.extend_field("drugB", vec![]);
        err.extend_field("note", vec!["required".to_string()]);

        assert_eq!(err.fields(), vec!["drugA", "note"]);
        assert_eq!(err.to_string(), "Validation failed for drugA, note");
        assert!(err.into_result().is_err());
    }
}
