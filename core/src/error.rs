//! Error types for the inventory client.
//!
//! # Design
//! Three layers, each recoverable at the point of the user action:
//! - `ValidationError`: a raw form field was rejected before any request
//!   was built (required, format, range, datetime).
//! - `ApiError`: building, sending or interpreting an HTTP exchange failed.
//!   `NotFound` gets a dedicated variant because callers frequently
//!   distinguish "the resource does not exist" from other statuses.
//! - `Error`: what a command handler returns; it adds the cross-entity
//!   `Referential` failure and unknown command names.

use thiserror::Error;

/// A raw field value was rejected by the field validator or the datetime
/// normalizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    RequiredField { field: &'static str },

    #[error("{field} must be {expected}, got {value:?}")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{field} must be between {min} and {max}, got {value}")]
    Range {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("invalid date {input:?}, expected {expected}")]
    Format { input: String, expected: &'static str },
}

/// Failures around a single HTTP exchange.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 for the requested resource.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one (and not 404).
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response: connection refused, DNS,
    /// timeout and the like.
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error("invalid base URL {0:?}")]
    InvalidBaseUrl(String),
}

/// Errors surfaced by command handlers.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("supplier {supplier_id} is not registered; create the supplier first")]
    Referential { supplier_id: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("unknown command {0:?}")]
    UnknownCommand(String),
}
