//! Document ingestion and top-k chunk retrieval.
//!
//! # Responsibility
//! - Chunk extracted document text, embed every chunk and store it.
//! - Embed a query and rank the owner's stored chunks against it.
//!
//! # Invariants
//! - Re-ingesting a file replaces its previous chunks atomically.
//! - Ranking failures for individual rows are returned in
//!   [`RankOutcome::rejected`] and logged, never fatal.

use crate::config::CoreConfig;
use crate::provider::Embedder;
use crate::repo::chunk_repo::{ChunkListQuery, ChunkRepository, NewChunk};
use crate::retrieval::ranker::{rank, RankOutcome};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use std::time::Instant;

/// Retrieval service over a chunk repository and an embedder.
pub struct RetrievalService<R: ChunkRepository, E: Embedder> {
    repo: R,
    embedder: E,
    config: CoreConfig,
}

impl<R: ChunkRepository, E: Embedder> RetrievalService<R, E> {
    pub fn new(repo: R, embedder: E, config: CoreConfig) -> Self {
        Self {
            repo,
            embedder,
            config,
        }
    }

    /// Chunks, embeds and stores `text` as the content of `file_name`.
    ///
    /// Returns the number of stored chunks. Empty text clears the file.
    pub fn ingest_document(&self, owner: &str, file_name: &str, text: &str) -> ServiceResult<usize> {
        let started_at = Instant::now();
        let owner = require_non_blank("owner", owner)?;
        let file_name = require_non_blank("file_name", file_name)?;

        let chunks = self.config.chunk_spec()?.split(text);
        let mut rows = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let embedding = self.embedder.embed(&chunk.text).map_err(|err| {
                let err = ServiceError::from(err);
                warn!(
                    "event=document_ingest module=service status=error chunk_id={} error_code={} error={err}",
                    chunk.chunk_id,
                    err.code()
                );
                err
            })?;
            rows.push(NewChunk {
                owner: owner.to_string(),
                file_name: file_name.to_string(),
                chunk_index: chunk.chunk_id,
                content: chunk.text,
                embedding,
            });
        }

        let stored = self.repo.replace_file(owner, file_name, &rows)?.len();
        info!(
            "event=document_ingest module=service status=ok chunks={} duration_ms={}",
            stored,
            started_at.elapsed().as_millis()
        );
        Ok(stored)
    }

    /// Ranks the owner's chunks against `query_text`.
    ///
    /// `k` defaults to the configured top-k; `file_filter` is a
    /// case-insensitive file-name substring.
    pub fn top_chunks(
        &self,
        owner: &str,
        query_text: &str,
        k: Option<usize>,
        file_filter: Option<&str>,
    ) -> ServiceResult<RankOutcome> {
        let started_at = Instant::now();
        let owner = require_non_blank("owner", owner)?;
        let query_text = require_non_blank("query_text", query_text)?;
        let k = k.unwrap_or(self.config.top_k);

        let query = self.embedder.embed(query_text)?;
        let records = self
            .repo
            .list_chunks(&ChunkListQuery {
                owner: owner.to_string(),
                file_filter: file_filter.map(str::to_string),
            })?
            .into_iter()
            .map(|chunk| chunk.into_embedding_record())
            .collect::<Vec<_>>();

        let outcome = rank(&query, &records, k, None);
        for rejected in &outcome.rejected {
            warn!(
                "event=chunk_rejected module=service status=degraded chunk_uuid={} error={}",
                rejected.id, rejected.error
            );
        }
        info!(
            "event=top_chunks module=service status=ok candidates={} returned={} rejected={} duration_ms={}",
            records.len(),
            outcome.matches.len(),
            outcome.rejected.len(),
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }
}

fn require_non_blank<'a>(field: &str, value: &'a str) -> ServiceResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidRequest(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}
