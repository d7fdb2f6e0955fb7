//! Error types shared by the catalog core.

use thiserror::Error;

/// Errors surfaced by the catalog core.
///
/// The taxonomy is deliberately small: malformed input, a dangling id
/// reference, or a state-incompatible request. None of these are retried
/// internally; every operation fails fast and leaves storage untouched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// Input failed a domain rule (blank name, out-of-range date, ...).
    /// `field` names the offending field.
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// A user/film/genre/rating id that does not exist was referenced.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    /// The request is incompatible with current state
    /// (e.g. adding a friendship edge that already exists).
    #[error("{0}")]
    Conflict(String),
}

impl CatalogError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CatalogError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: u32) -> Self {
        CatalogError::NotFound { entity, id }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CatalogError::Conflict(message.into())
    }
}

/// Convenience type alias for Results in the catalog core.
pub type Result<T> = std::result::Result<T, CatalogError>;
