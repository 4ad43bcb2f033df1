//! Chunk repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist chunk text, its embedding and file/owner metadata.
//! - Serve exact-owner reads with an optional file-name filter.
//!
//! # Invariants
//! - Embeddings are stored in encoded text form (JSON array) and read back as
//!   [`StoredEmbedding::Encoded`]; decoding happens in the ranker.
//! - `(owner, file_name, chunk_index)` is unique.
//! - Reads are ordered by `file_name ASC, chunk_index ASC`.

use crate::db::DbError;
use crate::model::embedding::{contains_ignore_case, EmbeddingRecord, StoredEmbedding, METADATA_FILE_NAME};
use rusqlite::{params, Connection, Row};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier of one stored chunk row.
pub type ChunkId = Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("invalid chunk: {0}")]
    Validation(String),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("failed to encode embedding: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid persisted chunk data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Chunk to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChunk {
    pub owner: String,
    pub file_name: String,
    /// 1-based position of the chunk within its file.
    pub chunk_index: u32,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// Chunk as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredChunk {
    pub chunk_id: ChunkId,
    pub owner: String,
    pub file_name: String,
    pub chunk_index: u32,
    pub content: String,
    pub embedding: StoredEmbedding,
}

impl StoredChunk {
    /// Converts the row into a ranking candidate labelled by file name.
    pub fn into_embedding_record(self) -> EmbeddingRecord {
        EmbeddingRecord::new(self.chunk_id.to_string(), self.embedding)
            .with_metadata(METADATA_FILE_NAME, self.file_name)
            .with_content(self.content)
    }
}

/// Query options for listing chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkListQuery {
    /// Exact owner match.
    pub owner: String,
    /// Case-insensitive substring of `file_name`.
    pub file_filter: Option<String>,
}

impl ChunkListQuery {
    pub fn for_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            file_filter: None,
        }
    }
}

/// Repository interface for chunk storage.
pub trait ChunkRepository {
    fn insert_chunks(&self, chunks: &[NewChunk]) -> RepoResult<Vec<ChunkId>>;
    /// Atomically replaces every chunk of `(owner, file_name)`.
    fn replace_file(
        &self,
        owner: &str,
        file_name: &str,
        chunks: &[NewChunk],
    ) -> RepoResult<Vec<ChunkId>>;
    fn list_chunks(&self, query: &ChunkListQuery) -> RepoResult<Vec<StoredChunk>>;
    fn delete_file(&self, owner: &str, file_name: &str) -> RepoResult<usize>;
    fn count_chunks(&self, owner: &str) -> RepoResult<u64>;
}

/// SQLite-backed chunk repository.
pub struct SqliteChunkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChunkRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

fn insert_rows(conn: &Connection, chunks: &[NewChunk]) -> RepoResult<Vec<ChunkId>> {
    let mut stmt = conn.prepare(
        "INSERT INTO study_chunks (
            chunk_uuid,
            owner,
            file_name,
            chunk_index,
            content,
            embedding
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )?;

    let mut ids = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        validate_chunk(chunk)?;
        let chunk_id = Uuid::new_v4();
        let encoded = serde_json::to_string(&chunk.embedding)?;
        stmt.execute(params![
            chunk_id.to_string(),
            chunk.owner.trim(),
            chunk.file_name.trim(),
            i64::from(chunk.chunk_index),
            chunk.content.as_str(),
            encoded,
        ])?;
        ids.push(chunk_id);
    }
    Ok(ids)
}

impl ChunkRepository for SqliteChunkRepository<'_> {
    fn insert_chunks(&self, chunks: &[NewChunk]) -> RepoResult<Vec<ChunkId>> {
        let tx = self.conn.unchecked_transaction()?;
        let ids = insert_rows(&tx, chunks)?;
        tx.commit()?;
        Ok(ids)
    }

    fn replace_file(
        &self,
        owner: &str,
        file_name: &str,
        chunks: &[NewChunk],
    ) -> RepoResult<Vec<ChunkId>> {
        let owner = owner.trim();
        let file_name = file_name.trim();
        if let Some(stray) = chunks
            .iter()
            .find(|chunk| chunk.owner.trim() != owner || chunk.file_name.trim() != file_name)
        {
            return Err(RepoError::Validation(format!(
                "chunk {} does not belong to the replaced file",
                stray.chunk_index
            )));
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM study_chunks WHERE owner = ?1 AND file_name = ?2;",
            params![owner, file_name],
        )?;
        let ids = insert_rows(&tx, chunks)?;
        tx.commit()?;
        Ok(ids)
    }

    fn list_chunks(&self, query: &ChunkListQuery) -> RepoResult<Vec<StoredChunk>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                chunk_uuid,
                owner,
                file_name,
                chunk_index,
                content,
                embedding
             FROM study_chunks
             WHERE owner = ?1
             ORDER BY file_name ASC, chunk_index ASC;",
        )?;
        let mut rows = stmt.query([query.owner.trim()])?;
        let file_filter = query
            .file_filter
            .as_deref()
            .map(str::trim)
            .filter(|filter| !filter.is_empty());

        let mut chunks = Vec::new();
        while let Some(row) = rows.next()? {
            let chunk = parse_chunk_row(row)?;
            if let Some(filter) = file_filter {
                if !contains_ignore_case(&chunk.file_name, filter) {
                    continue;
                }
            }
            chunks.push(chunk);
        }
        Ok(chunks)
    }

    fn delete_file(&self, owner: &str, file_name: &str) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM study_chunks WHERE owner = ?1 AND file_name = ?2;",
            params![owner.trim(), file_name.trim()],
        )?;
        Ok(removed)
    }

    fn count_chunks(&self, owner: &str) -> RepoResult<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM study_chunks WHERE owner = ?1;",
            [owner.trim()],
            |row| row.get::<_, i64>(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative chunk count `{count}`")))
    }
}

fn validate_chunk(chunk: &NewChunk) -> RepoResult<()> {
    if chunk.owner.trim().is_empty() {
        return Err(RepoError::Validation("owner cannot be empty".to_string()));
    }
    if chunk.file_name.trim().is_empty() {
        return Err(RepoError::Validation("file_name cannot be empty".to_string()));
    }
    if chunk.chunk_index == 0 {
        return Err(RepoError::Validation("chunk_index is 1-based".to_string()));
    }
    if chunk.embedding.iter().any(|value| !value.is_finite()) {
        return Err(RepoError::Validation(format!(
            "chunk {} embedding contains non-finite values",
            chunk.chunk_index
        )));
    }
    Ok(())
}

fn parse_chunk_row(row: &Row<'_>) -> RepoResult<StoredChunk> {
    let uuid_text: String = row.get("chunk_uuid")?;
    let chunk_id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in study_chunks.chunk_uuid"
        ))
    })?;

    let index: i64 = row.get("chunk_index")?;
    let chunk_index = u32::try_from(index).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid chunk_index `{index}` in study_chunks.chunk_index"
        ))
    })?;

    Ok(StoredChunk {
        chunk_id,
        owner: row.get("owner")?,
        file_name: row.get("file_name")?,
        chunk_index,
        content: row.get("content")?,
        embedding: StoredEmbedding::Encoded(row.get("embedding")?),
    })
}
