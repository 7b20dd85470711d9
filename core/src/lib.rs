//! Path-traversal client core.
//!
//! # Overview
//! Addresses a remote HTTP API as a tree: each `descend` appends a path
//! segment, and calling a node whose last segment names an HTTP verb fires
//! the request through an injected executor. The core never touches the
//! network (host-does-IO); the executor performs the round-trip.
//!
//! # Design
//! - `PathBuilder` is the immutable traversal state plus the dispatch
//!   decision (`call`), with no executor attached.
//! - `ApiNode` wraps a `PathBuilder` with a shared `RequestExecutor` and
//!   returns the executor's future untouched.
//! - `path` holds the segment joiner, URL normalizer and the argument
//!   stringification used for parameter insertion.
//! - `Endpoint` descriptors resolve named method/template pairs through the
//!   same builder.

pub mod builder;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod http;
pub mod path;

pub use builder::{Call, PathBuilder};
pub use client::{ApiNode, Invocation};
pub use endpoint::{Endpoint, EndpointTable};
pub use error::ApiError;
pub use executor::RequestExecutor;
pub use http::{HttpMethod, HttpRequest};
pub use path::{join_segments, normalize_url, stringify_param};
