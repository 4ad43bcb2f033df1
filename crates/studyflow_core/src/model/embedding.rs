//! Embedding rows and ranked retrieval matches.
//!
//! # Invariants
//! - Within one ranking call, every well-formed vector has the query's
//!   dimensionality; rows that do not are rejected individually.
//! - `RankedMatch::similarity` is finite and lies in `[-1, 1]`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key carrying the source file name of a stored chunk.
pub const METADATA_FILE_NAME: &str = "file_name";

/// Embedding as stored by the chunk-storage collaborator.
///
/// Storage may hand back either a numeric sequence or its encoded text form
/// (a JSON array such as `"[0.1, 0.2]"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEmbedding {
    Values(Vec<f32>),
    Encoded(String),
}

impl From<Vec<f32>> for StoredEmbedding {
    fn from(value: Vec<f32>) -> Self {
        Self::Values(value)
    }
}

/// One candidate row for similarity ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Opaque row key.
    pub id: String,
    /// Source/category labels, at minimum [`METADATA_FILE_NAME`] for chunks.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Chunk text, when the caller has it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embedding: StoredEmbedding,
}

impl EmbeddingRecord {
    pub fn new(id: impl Into<String>, embedding: impl Into<StoredEmbedding>) -> Self {
        Self {
            id: id.into(),
            metadata: BTreeMap::new(),
            content: None,
            embedding: embedding.into(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Ranked candidate returned by the similarity ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub id: String,
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Decoded embedding used for scoring.
    pub embedding: Vec<f32>,
    pub similarity: f64,
}

/// Case-insensitive substring predicate over one metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub key: String,
    pub value: String,
}

impl MetadataFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Filter on the chunk source file name.
    pub fn file_name(value: impl Into<String>) -> Self {
        Self::new(METADATA_FILE_NAME, value)
    }

    /// Returns whether `value` occurs in the metadata field, ignoring case.
    ///
    /// A missing field never matches.
    pub fn matches(&self, metadata: &BTreeMap<String, String>) -> bool {
        metadata
            .get(self.key.as_str())
            .is_some_and(|field| contains_ignore_case(field, &self.value))
    }
}

/// Case-insensitive substring test shared by ranker and storage filters.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{EmbeddingRecord, MetadataFilter, StoredEmbedding};

    #[test]
    fn filter_matches_case_insensitive_substring() {
        let record = EmbeddingRecord::new("c1", vec![1.0]).with_metadata("file_name", "Lecture-03.PDF");
        assert!(MetadataFilter::file_name("lecture").matches(&record.metadata));
        assert!(MetadataFilter::file_name("03.pdf").matches(&record.metadata));
        assert!(!MetadataFilter::file_name("syllabus").matches(&record.metadata));
        assert!(!MetadataFilter::new("course", "lecture").matches(&record.metadata));
    }

    #[test]
    fn stored_embedding_accepts_numbers_or_text() {
        let numbers: StoredEmbedding = serde_json::from_value(serde_json::json!([0.5, 1.0])).unwrap();
        assert_eq!(numbers, StoredEmbedding::Values(vec![0.5, 1.0]));

        let text: StoredEmbedding = serde_json::from_value(serde_json::json!("[0.5, 1.0]")).unwrap();
        assert_eq!(text, StoredEmbedding::Encoded("[0.5, 1.0]".to_string()));
    }
}
