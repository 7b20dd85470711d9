//! Error types for the traversal engine.
//!
//! # Design
//! `InvalidPathCall` is the only error the dispatch engine itself raises, and
//! it is returned synchronously before any executor is touched. Transport
//! and status failures belong to the executor and travel through its own
//! response type untouched. The remaining variants come from the endpoint
//! descriptor layer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A call with no arguments on a path whose last segment is not a verb.
    /// `path` is the raw `/`-joined state, before normalization.
    #[error("cannot call path: {path}")]
    InvalidPathCall { path: String },

    /// An endpoint template placeholder had no value supplied.
    #[error("endpoint {endpoint}: missing value for path parameter `{param}`")]
    MissingPathParam { endpoint: String, param: String },

    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// An endpoint table could not be parsed.
    #[error("invalid endpoint descriptor: {0}")]
    Descriptor(String),
}
