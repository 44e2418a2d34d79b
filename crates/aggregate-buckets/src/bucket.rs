use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::options::ExtractOptions;

const BUCKETS_FIELD: &str = "buckets";
const KEY_FIELD: &str = "key";
const DOC_COUNT_FIELD: &str = "doc_count";

/// The buckets of a term aggregation as returned by the search engine.
///
/// Given this JSON:
///
/// ```json
/// {"tags":{"buckets":[{"key":"bass","doc_count":1},{"key":"drum","doc_count":1}]}}
/// ```
///
/// the bucket is named `tags` and holds `{"bass": 1, "drum": 1}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateBucket {
    pub name: String,
    pub key_count: BTreeMap<String, u64>,
}

impl AggregateBucket {
    pub fn new(name: impl Into<String>) -> AggregateBucket {
        AggregateBucket { name: name.into(), key_count: BTreeMap::new() }
    }

    /// Normalizes the result of the aggregation named `name` into a bucket.
    ///
    /// Returns an empty bucket when no bucket list can be found in `value`.
    pub fn from_value(name: &str, value: &Value) -> AggregateBucket {
        AggregateBucket::from_value_with(name, value, &ExtractOptions::default())
    }

    pub fn from_value_with(name: &str, value: &Value, options: &ExtractOptions) -> AggregateBucket {
        normalize(name, value, 0, options.effective_max_depth())
    }

    /// The number of documents that fall in the bucket identified by `key`.
    pub fn count(&self, key: &str) -> Option<u64> {
        self.key_count.get(key).copied()
    }

    pub fn total_doc_count(&self) -> u64 {
        self.key_count.values().fold(0, |total, count| total.saturating_add(*count))
    }

    pub fn len(&self) -> usize {
        self.key_count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_count.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, u64> {
        self.key_count.iter()
    }
}

impl<'a> IntoIterator for &'a AggregateBucket {
    type Item = (&'a String, &'a u64);
    type IntoIter = btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for AggregateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.name, self.key_count)
    }
}

/// Returns the first bucket named `name`.
pub fn find_aggregate<'a>(buckets: &'a [AggregateBucket], name: &str) -> Option<&'a AggregateBucket> {
    buckets.iter().find(|bucket| bucket.name == name)
}

fn normalize(name: &str, value: &Value, depth: usize, max_depth: usize) -> AggregateBucket {
    let mut bucket = AggregateBucket::new(name);

    let Value::Object(object) = value else {
        tracing::trace!(
            target: "search::aggregates",
            aggregation = name,
            "aggregation result is not an object"
        );
        return bucket;
    };

    match object.get(BUCKETS_FIELD) {
        Some(Value::Array(entries)) => {
            for entry in entries {
                match key_and_count(entry) {
                    Some((key, count)) => {
                        bucket.key_count.insert(key.to_string(), count);
                    }
                    None => tracing::trace!(
                        target: "search::aggregates",
                        aggregation = name,
                        %entry,
                        "skipping bucket entry"
                    ),
                }
            }
            bucket
        }
        Some(_) => {
            tracing::trace!(
                target: "search::aggregates",
                aggregation = name,
                "the buckets of the aggregation are not an array"
            );
            bucket
        }
        // The bucket list may be one level down, under a sub-aggregation.
        None => match first_sub_aggregation(object) {
            Some(_) if depth >= max_depth => {
                tracing::debug!(
                    target: "search::aggregates",
                    aggregation = name,
                    depth,
                    "too many nested aggregations"
                );
                bucket
            }
            Some((inner_name, inner_value)) => {
                normalize(inner_name, inner_value, depth + 1, max_depth)
            }
            None => bucket,
        },
    }
}

fn first_sub_aggregation(object: &Map<String, Value>) -> Option<(&str, &Value)> {
    object
        .iter()
        .find(|(key, _)| key.as_str() != DOC_COUNT_FIELD)
        .map(|(key, value)| (key.as_str(), value))
}

fn key_and_count(entry: &Value) -> Option<(&str, u64)> {
    let entry = entry.as_object()?;
    let key = match entry.get(KEY_FIELD)? {
        Value::String(key) => key.as_str(),
        _ => return None,
    };
    let count = match entry.get(DOC_COUNT_FIELD)? {
        Value::Number(number) => doc_count(number)?,
        _ => return None,
    };
    Some((key, count))
}

/// Floating point counts are truncated toward zero, only the ones
/// that truncate to a negative number are invalid.
fn doc_count(number: &Number) -> Option<u64> {
    number.as_u64().or_else(|| {
        number.as_f64().filter(|count| count.is_finite() && *count > -1.0).map(|count| count as u64)
    })
}
