//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use wheel_core::SessionError;
use wheel_core::model::CatalogError;

/// Errors emitted by `SessionPersistence`.
///
/// Callers of the best-effort `save`/`load`/`clear` never see these; they
/// are logged and the session carries on in memory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error("persistence unavailable: {0}")]
    Unavailable(#[from] StorageError),
    #[error("malformed session snapshot: {0}")]
    MalformedSnapshot(String),
}

/// Errors emitted by `SessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionServiceError {
    #[error("a spin is already in progress")]
    SpinInFlight,
    #[error("no spin is in progress")]
    NoSpinInFlight,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
