//! Core domain logic for StudyFlow.
//! This crate is the single source of truth for agenda normalization and
//! chunk retrieval invariants.

pub mod config;
pub mod db;
pub mod inbox;
pub mod logging;
pub mod model;
pub mod payload;
pub mod provider;
pub mod render;
pub mod repo;
pub mod retrieval;
pub mod schedule;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use inbox::normalize_emails;
pub use model::email::{MessageHeader, MessagePart, NormalizedEmail, PartBody, RawEmail};
pub use model::embedding::{EmbeddingRecord, MetadataFilter, RankedMatch, StoredEmbedding};
pub use model::event::{EventTime, NormalizedEvent, RawEvent};
pub use model::occurrence::{NormalizedOccurrence, RawOccurrenceSource};
pub use model::window::{TimeWindow, WindowError};
pub use provider::{
    DeliverySink, EmailSource, Embedder, EventSource, ProviderError, ProviderReceipt,
    ProviderResult, TaskSource,
};
pub use render::{render_emails, render_events, render_tasks};
pub use repo::chunk_repo::{
    ChunkListQuery, ChunkRepository, NewChunk, RepoError, RepoResult, SqliteChunkRepository,
    StoredChunk,
};
pub use retrieval::chunking::{chunk_words, ChunkError, ChunkSpec, TextChunk};
pub use retrieval::ranker::{cosine_similarity, rank, RankError, RankOutcome, RejectedCandidate};
pub use schedule::events::normalize_events;
pub use schedule::normalizer::normalize;
pub use schedule::zone::{LocalZone, ZoneError};
pub use service::agenda_service::AgendaService;
pub use service::delivery_service::{DeliveryOutcome, DeliveryService};
pub use service::retrieval_service::RetrievalService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
