//! Serialized position mappings

use serde::{Deserialize, Serialize};

/// One generated-to-original position mapping.
///
/// Lines are 1-indexed, columns 0-indexed, matching the convention of the
/// template document splitter (`body_begin` is a 1-indexed line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub generated_line: usize,
    pub generated_column: usize,
    /// Original source name, if the node carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub original_line: usize,
    pub original_column: usize,
}

/// A source map for one emitted artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMap {
    pub mappings: Vec<Mapping>,
}

impl SourceMap {
    /// Look up the original position for a generated line.
    ///
    /// Returns the mapping with the largest generated position that is still
    /// at or before the start of `generated_line`.
    pub fn original_for_line(&self, generated_line: usize) -> Option<&Mapping> {
        self.mappings
            .iter()
            .filter(|m| m.generated_line <= generated_line)
            .max_by_key(|m| (m.generated_line, m.generated_column))
    }
}
