#![forbid(unsafe_code)]

pub mod error;
pub mod persistence;
pub mod session_service;

pub use error::{PersistenceError, SessionServiceError};
pub use persistence::{DEFAULT_STORAGE_KEY, SessionPersistence};
pub use session_service::{EventOutcome, SessionEvent, SessionService, SpinState};
