/// Signal analyzer - canonical pair, cached openFDA search, aggregation
///
/// Flow per call:
/// 1. Canonicalize the pair and derive the cache key (uppercased pair + limit)
/// 2. Return a fresh cached analysis, or join the computation in flight
/// 3. On a miss: build the request, fetch one page of events, aggregate
///
/// The cache is created by the caller and injected, so its lifetime is the
/// analyzer's. At most one upstream request runs per key at a time.
use super::aggregate::aggregate;
use super::pair::{canonicalize, DrugPairKey};
use super::query::build_request;
use super::types::SignalAnalysis;
use crate::apis::openfda::types::EventSearchResponse;
use crate::cache::{CacheManager, CacheMetrics};
use crate::errors::SignalError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Reaction limit when the caller does not give one
pub const DEFAULT_LIMIT: usize = 50;

/// Anything that can run an event search
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self, request: Url) -> Result<EventSearchResponse, SignalError>;
}

/// Where event searches are sent
#[derive(Debug, Clone)]
pub struct QueryTarget {
    pub base_url: Url,
    pub api_key: String,
}

impl QueryTarget {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
        }
    }

    pub fn request_for(&self, first: &str, second: &str, limit: usize) -> Url {
        build_request(&self.base_url, &self.api_key, first, second, limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalCacheKey {
    pub pair: DrugPairKey,
    pub limit: usize,
}

pub type SignalCache = CacheManager<SignalCacheKey, Arc<SignalAnalysis>, SignalError>;

pub struct SignalAnalyzer {
    source: Arc<dyn EventSource>,
    target: QueryTarget,
    cache: SignalCache,
    default_limit: usize,
}

impl SignalAnalyzer {
    pub fn new(source: Arc<dyn EventSource>, target: QueryTarget, cache: SignalCache) -> Self {
        Self {
            source,
            target,
            cache,
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Adverse-event signal for an unordered drug pair
    ///
    /// Names are not validated here. The returned analysis is shared with the
    /// cache and echoes the drug names as first submitted for this key.
    pub async fn analyze_signals(
        &self,
        drug_a: &str,
        drug_b: &str,
        limit: Option<usize>,
    ) -> Result<Arc<SignalAnalysis>, SignalError> {
        let limit = limit.unwrap_or(self.default_limit);
        let (first, second) = canonicalize(drug_a, drug_b);
        let key = SignalCacheKey {
            pair: DrugPairKey::new(first, second),
            limit,
        };

        let source = Arc::clone(&self.source);
        let target = self.target.clone();
        let (first, second) = (first.to_string(), second.to_string());

        self.cache
            .get_or_compute(key, move || {
                compute_analysis(source, target, first, second, limit)
            })
            .await
    }
}

/// One upstream search, aggregated (runs only on a cache miss)
async fn compute_analysis(
    source: Arc<dyn EventSource>,
    target: QueryTarget,
    first: String,
    second: String,
    limit: usize,
) -> Result<Arc<SignalAnalysis>, SignalError> {
    let label = DrugPairKey::new(&first, &second);
    logger::info(
        LogTag::Signals,
        &format!("Fetching adverse events for {} (limit={})", label, limit),
    );

    let request = target.request_for(&first, &second, limit);
    let response = source.fetch_events(request).await?;
    let summary = aggregate(&response, limit);

    logger::debug(
        LogTag::Signals,
        &format!(
            "{}: {} matching reports, {} reactions in page of {}",
            label,
            summary.total,
            summary.top_reactions.len(),
            response.results.len()
        ),
    );

    Ok(Arc::new(SignalAnalysis {
        drug_a: first,
        drug_b: second,
        count: summary.total,
        top_reactions: summary.top_reactions,
    }))
}
