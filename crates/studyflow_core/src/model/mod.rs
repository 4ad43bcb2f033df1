//! Plain data shapes exchanged with external collaborators.
//!
//! # Responsibility
//! - Define the raw records fetched from calendar/task/mail providers.
//! - Define the canonical normalized records handed back to callers.
//! - Define embedding rows and ranked matches used by retrieval.
//!
//! # Invariants
//! - Every type here is owned caller data; core never retains it across calls.
//! - Wire field names match the provider/client JSON shapes.

pub mod email;
pub mod embedding;
pub mod event;
pub mod occurrence;
pub mod window;
