use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::Result;
use crate::options::ExtractOptions;
use crate::{extract_aggregates_with, AggregateBucket};

/// The part of a search response the extractor cares about.
///
/// Any query can have an `aggs` section added to it, the result of which is
/// returned under the `aggregations` key of the response, next to the `hits`.
/// The other fields of the response are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub aggregations: Option<Box<RawValue>>,
}

impl SearchResponse {
    pub fn from_slice(raw: &[u8]) -> Result<SearchResponse> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Extracts the buckets of the aggregations section, an absent
    /// section gives no bucket.
    pub fn aggregates(&self, options: &ExtractOptions) -> Result<Vec<AggregateBucket>> {
        match &self.aggregations {
            Some(raw) => extract_aggregates_with(raw.get().as_bytes(), options),
            None => Ok(Vec::new()),
        }
    }
}
