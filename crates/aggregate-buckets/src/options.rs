use serde::{Deserialize, Serialize};

/// The default number of wrapping levels the extractor walks through
/// before giving up on finding a bucket list.
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExtractOptions {
    /// How many levels of aggregations without a `buckets` list are unwrapped
    /// while looking for one. At least one level is always unwrapped.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl ExtractOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn effective_max_depth(&self) -> usize {
        self.max_depth.max(1)
    }
}
