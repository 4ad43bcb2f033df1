//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate provider, repository and pure-component calls into
//!   use-case level APIs.
//! - Keep CLI and transport layers decoupled from storage and provider details.

use crate::config::ConfigError;
use crate::model::window::WindowError;
use crate::payload::PayloadError;
use crate::provider::ProviderError;
use crate::repo::chunk_repo::RepoError;
use crate::retrieval::chunking::ChunkError;
use crate::schedule::zone::ZoneError;
use thiserror::Error;

pub mod agenda_service;
pub mod delivery_service;
pub mod retrieval_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Zone(#[from] ZoneError),
    #[error(transparent)]
    Chunking(#[from] ChunkError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ServiceError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Provider(err) => err.code(),
            Self::Repo(_) => "repo_error",
            Self::Payload(_) => "invalid_payload",
            Self::Window(_) => "invalid_window",
            Self::Zone(_) => "zone_error",
            Self::Chunking(_) => "invalid_chunking",
            Self::Config(_) => "invalid_config",
        }
    }
}
