//! Word-window chunking of extracted document text.
//!
//! # Invariants
//! - Windows hold at most `chunk_size` words and advance by
//!   `chunk_size - overlap` words; only the last window may be shorter.
//! - `chunk_id` is 1-based and contiguous.
//! - Every word of the input appears in at least one chunk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,
    #[error("chunk overlap {overlap} must be smaller than chunk size {chunk_size}")]
    OverlapTooLarge { overlap: usize, chunk_size: usize },
}

/// One word window of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub chunk_id: u32,
    pub text: String,
}

/// Validated chunking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    chunk_size: usize,
    overlap: usize,
}

impl Default for ChunkSpec {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkSpec {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::ZeroChunkSize);
        }
        if overlap >= chunk_size {
            return Err(ChunkError::OverlapTooLarge {
                overlap,
                chunk_size,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Splits `text` on whitespace and groups the words into windows.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let words = text.split_whitespace().collect::<Vec<_>>();
        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < words.len() {
            let end = (start + self.chunk_size).min(words.len());
            chunks.push(TextChunk {
                chunk_id: u32::try_from(chunks.len() + 1).unwrap_or(u32::MAX),
                text: words[start..end].join(" "),
            });
            if end == words.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

/// Convenience wrapper over [`ChunkSpec::new`] + [`ChunkSpec::split`].
pub fn chunk_words(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<TextChunk>, ChunkError> {
    Ok(ChunkSpec::new(chunk_size, overlap)?.split(text))
}

#[cfg(test)]
mod tests {
    use super::{chunk_words, ChunkError};

    #[test]
    fn windows_overlap_and_cover_every_word() {
        let chunks = chunk_words("a b c d e f g", 3, 1).unwrap();
        let texts = chunks.iter().map(|chunk| chunk.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["a b c", "c d e", "e f g"]);
        assert_eq!(
            chunks.iter().map(|chunk| chunk.chunk_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn short_tail_is_kept_and_no_redundant_window_follows() {
        let chunks = chunk_words("one two three four five", 4, 1).unwrap();
        let texts = chunks.iter().map(|chunk| chunk.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["one two three four", "four five"]);

        let exact = chunk_words("one two three", 3, 1).unwrap();
        assert_eq!(exact.len(), 1);
    }

    #[test]
    fn blank_text_has_no_chunks() {
        assert!(chunk_words(" \n\t ", 10, 2).unwrap().is_empty());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(chunk_words("x", 0, 0).unwrap_err(), ChunkError::ZeroChunkSize);
        assert_eq!(
            chunk_words("x", 5, 5).unwrap_err(),
            ChunkError::OverlapTooLarge {
                overlap: 5,
                chunk_size: 5
            }
        );
    }
}
