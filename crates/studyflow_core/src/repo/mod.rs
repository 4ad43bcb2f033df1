//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the chunk-storage contract used by retrieval services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate owner/file identity before persistence.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod chunk_repo;
