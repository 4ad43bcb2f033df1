//! Context retrieval over stored document chunks.
//!
//! # Responsibility
//! - Rank stored embeddings against a query vector ([`ranker`]).
//! - Split extracted document text into overlapping word windows
//!   ([`chunking`]).
//!
//! # Invariants
//! - Both submodules are pure; storage and embedding calls live in services.

pub mod chunking;
pub mod ranker;
