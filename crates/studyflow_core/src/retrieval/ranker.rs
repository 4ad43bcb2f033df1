//! Top-k cosine similarity ranking over stored embeddings.
//!
//! # Responsibility
//! - Filter candidates by a case-insensitive metadata substring.
//! - Decode stored embeddings and score them against the query.
//! - Return the `k` best matches plus the candidates that could not be scored.
//!
//! # Invariants
//! - Results are sorted by similarity descending; ties keep input order.
//! - A bad candidate (wrong length, zero magnitude, undecodable) is rejected
//!   on its own and never aborts the ranking of the others.
//! - `k == 0` yields an empty outcome.
//!
//! # Scalability
//! Ranking is a full scan over the supplied candidates. Candidate sets here
//! are per-user chunk collections (a handful to low thousands of rows); past
//! that scale an approximate nearest-neighbour index would replace the scan.

use crate::model::embedding::{EmbeddingRecord, MetadataFilter, RankedMatch, StoredEmbedding};
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Per-candidate scoring failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankError {
    #[error("vector dimension mismatch: query has {expected}, candidate has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("cosine similarity is undefined for a zero-magnitude vector")]
    ZeroMagnitudeVector,
    #[error("embedding could not be decoded: {message}")]
    EmbeddingDecodeFailure { message: String },
}

/// Candidate excluded from ranking, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCandidate {
    pub id: String,
    pub error: RankError,
}

/// Ranking result: ordered matches plus rejected candidates in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankOutcome {
    pub matches: Vec<RankedMatch>,
    pub rejected: Vec<RejectedCandidate>,
}

/// Ranks `candidates` against `query` and keeps the best `k`.
pub fn rank(
    query: &[f32],
    candidates: &[EmbeddingRecord],
    k: usize,
    filter: Option<&MetadataFilter>,
) -> RankOutcome {
    if k == 0 {
        return RankOutcome::default();
    }

    let mut outcome = RankOutcome::default();
    let mut filtered_out = 0usize;

    for candidate in candidates {
        if let Some(filter) = filter {
            if !filter.matches(&candidate.metadata) {
                filtered_out += 1;
                continue;
            }
        }

        let scored = decode_embedding(&candidate.embedding).and_then(|vector| {
            let similarity = cosine_similarity(query, &vector)?;
            Ok((vector.into_owned(), similarity))
        });
        match scored {
            Ok((embedding, similarity)) => outcome.matches.push(RankedMatch {
                id: candidate.id.clone(),
                metadata: candidate.metadata.clone(),
                content: candidate.content.clone(),
                embedding,
                similarity,
            }),
            Err(error) => outcome.rejected.push(RejectedCandidate {
                id: candidate.id.clone(),
                error,
            }),
        }
    }

    // `sort_by` is stable, so equal scores keep candidate order.
    outcome
        .matches
        .sort_by(|left, right| right.similarity.total_cmp(&left.similarity));
    outcome.matches.truncate(k);

    debug!(
        "event=rank module=retrieval status=ok candidates={} filtered_out={} rejected={} returned={} k={}",
        candidates.len(),
        filtered_out,
        outcome.rejected.len(),
        outcome.matches.len(),
        k
    );
    outcome
}

/// Cosine similarity `a·b / (|a| |b|)`, accumulated in `f64`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, RankError> {
    if a.len() != b.len() {
        return Err(RankError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let x = f64::from(x);
        let y = f64::from(y);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(RankError::ZeroMagnitudeVector);
    }
    Ok((dot / denominator).clamp(-1.0, 1.0))
}

/// Decodes a stored embedding; encoded text must be a JSON number array.
pub fn decode_embedding(embedding: &StoredEmbedding) -> Result<Cow<'_, [f32]>, RankError> {
    let vector = match embedding {
        StoredEmbedding::Values(values) => Cow::Borrowed(values.as_slice()),
        StoredEmbedding::Encoded(text) => {
            let values = serde_json::from_str::<Vec<f32>>(text.trim()).map_err(|err| {
                RankError::EmbeddingDecodeFailure {
                    message: err.to_string(),
                }
            })?;
            Cow::Owned(values)
        }
    };
    if vector.iter().any(|value| !value.is_finite()) {
        return Err(RankError::EmbeddingDecodeFailure {
            message: "embedding contains non-finite values".to_string(),
        });
    }
    Ok(vector)
}
