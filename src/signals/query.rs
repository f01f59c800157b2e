/// openFDA event-search request construction
///
/// Both drug names must appear as exact phrases in the patient drug product
/// field of a report. openFDA caps `limit` at 1000 per page; callers enforce
/// that through `signals.max_limit`, this module does not clamp.
use url::Url;

/// Event-search resource, relative to the configured base URL
pub const EVENT_ENDPOINT: &str = "drug/event.json";

/// Nested field holding each reported drug's product name
pub const PRODUCT_FIELD: &str = "patient.drug.medicinalproduct";

/// Escape a value for use inside a quoted openFDA phrase
pub fn escape_phrase(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `patient.drug.medicinalproduct:"A" AND patient.drug.medicinalproduct:"B"`
pub fn search_expression(first: &str, second: &str) -> String {
    format!(
        "{field}:\"{}\" AND {field}:\"{}\"",
        escape_phrase(first),
        escape_phrase(second),
        field = PRODUCT_FIELD
    )
}

/// Full request URL for one event search
///
/// Any path on `base` is kept and the endpoint appended to it; any query on
/// `base` is replaced. An empty `api_key` is left out so keyless access works.
pub fn build_request(base: &Url, api_key: &str, first: &str, second: &str, limit: usize) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        segments.extend(EVENT_ENDPOINT.split('/'));
    }

    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        if !api_key.is_empty() {
            query.append_pair("api_key", api_key);
        }
        query.append_pair("search", &search_expression(first, second));
        query.append_pair("limit", &limit.to_string());
    }

    url
}
