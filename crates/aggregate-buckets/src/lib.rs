#![doc = include_str!("../README.md")]

mod bucket;
mod error;
mod options;
mod response;

use serde_json::Value;

pub use self::bucket::{find_aggregate, AggregateBucket};
pub use self::error::{DecodeError, Result};
pub use self::options::{ExtractOptions, DEFAULT_MAX_DEPTH};
pub use self::response::SearchResponse;

/// The target of the spans and events emitted while extracting aggregations.
pub const LOG_TARGET: &str = "search::aggregates";

/// Extracts the buckets of the raw `aggregations` section of a search response.
///
/// The name of an aggregation is a key of the document, not a value, so the
/// document is decoded as a generic JSON object and walked by hand.
/// Aggregations that do not resolve to any bucket are left out.
///
/// ```
/// use aggregate_buckets::extract_aggregates;
///
/// let raw = br#"{"tags":{"buckets":[{"key":"bass","doc_count":1},{"key":"drum","doc_count":1}]}}"#;
/// let buckets = extract_aggregates(raw).unwrap();
///
/// assert_eq!(buckets.len(), 1);
/// assert_eq!(buckets[0].name, "tags");
/// assert_eq!(buckets[0].count("bass"), Some(1));
/// assert_eq!(buckets[0].count("drum"), Some(1));
/// ```
pub fn extract_aggregates(raw: &[u8]) -> Result<Vec<AggregateBucket>> {
    extract_aggregates_with(raw, &ExtractOptions::default())
}

#[tracing::instrument(level = "trace", skip_all, target = "search::aggregates")]
pub fn extract_aggregates_with(raw: &[u8], options: &ExtractOptions) -> Result<Vec<AggregateBucket>> {
    let value: Value = serde_json::from_slice(raw)?;
    extract_aggregates_from_value(&value, options)
}

/// Same as [`extract_aggregates_with`] for an already decoded document.
#[tracing::instrument(level = "trace", skip_all, target = "search::aggregates")]
pub fn extract_aggregates_from_value(
    value: &Value,
    options: &ExtractOptions,
) -> Result<Vec<AggregateBucket>> {
    let Value::Object(aggregations) = value else {
        return Err(DecodeError::not_an_object(value));
    };

    let mut buckets = Vec::new();
    for (name, aggregation) in aggregations {
        let bucket = AggregateBucket::from_value_with(name, aggregation, options);
        if bucket.is_empty() {
            tracing::trace!(
                target: "search::aggregates",
                aggregation = %name,
                "dropping aggregation without buckets"
            );
        } else {
            buckets.push(bucket);
        }
    }

    Ok(buckets)
}

/// Extracts the buckets of a whole search response, see [`SearchResponse`].
pub fn extract_aggregates_from_response(raw: &[u8]) -> Result<Vec<AggregateBucket>> {
    SearchResponse::from_slice(raw)?.aggregates(&ExtractOptions::default())
}
