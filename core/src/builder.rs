//! Executor-free traversal state and call classification.
//!
//! # Design
//! `PathBuilder` is an immutable snapshot of the segments accumulated from
//! the root. `segment` never mutates; it allocates a new snapshot holding the
//! parent's segments plus one. The segments sit behind an `Arc` so handles
//! clone cheaply and can be shared across threads.
//!
//! `call` is the whole dispatch decision. It returns plain data: either the
//! request to fire or the builder produced by parameter insertion. `ApiNode`
//! layers the executor on top; the FFI crate uses this type directly.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::path::{join_segments, normalize_url, stringify_param};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuilder {
    segments: Arc<[String]>,
}

/// Outcome of classifying a call against a `PathBuilder`.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// The last segment was a verb; this request should be executed.
    Request(HttpRequest),
    /// The first argument was appended as a new segment.
    Descend(PathBuilder),
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    /// The root: no segments.
    pub fn new() -> Self {
        Self {
            segments: Arc::from(Vec::new()),
        }
    }

    /// Append `name` as a new segment. Any name is accepted, including verb
    /// names; they are only interpreted at call time.
    pub fn segment(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        trace!(segment = %name, depth = self.segments.len() + 1, "descend");
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name);
        Self {
            segments: Arc::from(segments),
        }
    }

    /// Append the display form of `value`, e.g. a numeric id.
    pub fn param(&self, value: impl fmt::Display) -> Self {
        self.segment(value.to_string())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The verb named by the last segment, if any.
    pub fn verb(&self) -> Option<HttpMethod> {
        self.segments
            .last()
            .and_then(|last| HttpMethod::from_segment(last))
    }

    /// Raw `/`-joined segments, without escape decoding or normalization.
    pub fn joined(&self) -> String {
        self.segments.join("/")
    }

    /// Normalized request path of the current segments.
    pub fn url(&self) -> String {
        normalize_url(&join_segments(self.segments.iter()))
    }

    /// Classify a call with positional `args`.
    ///
    /// 1. Last segment is a verb: build a request for the preceding segments,
    ///    taking `args[0]` as body and `args[1]` as config.
    /// 2. Otherwise, with at least one argument: insert `args[0]` as a new
    ///    segment. Further arguments are ignored.
    /// 3. Otherwise: `ApiError::InvalidPathCall`.
    pub fn call(&self, args: Vec<Value>) -> Result<Call, ApiError> {
        if let Some(method) = self.verb() {
            let mut args = args.into_iter();
            let preceding = &self.segments[..self.segments.len() - 1];
            let request = HttpRequest {
                method,
                path: normalize_url(&join_segments(preceding)),
                body: args.next(),
                config: args.next(),
            };
            debug!(method = %request.method, path = %request.path, "verb invocation");
            return Ok(Call::Request(request));
        }

        match args.first() {
            Some(arg) => {
                let segment = stringify_param(arg);
                debug!(segment = %segment, "parameter insertion");
                Ok(Call::Descend(self.segment(segment)))
            }
            None => Err(ApiError::InvalidPathCall {
                path: self.joined(),
            }),
        }
    }

    /// Build a request for `method` on the current path without a verb
    /// segment.
    pub fn request(
        &self,
        method: HttpMethod,
        body: Option<Value>,
        config: Option<Value>,
    ) -> HttpRequest {
        HttpRequest {
            method,
            path: self.url(),
            body,
            config,
        }
    }
}

impl<S: Into<String>> FromIterator<S> for PathBuilder {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let segments: Vec<String> = iter.into_iter().map(Into::into).collect();
        Self {
            segments: Arc::from(segments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> PathBuilder {
        segments.iter().copied().collect()
    }

    fn expect_request(call: Result<Call, ApiError>) -> HttpRequest {
        match call {
            Ok(Call::Request(req)) => req,
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn segment_leaves_parent_untouched() {
        let root = PathBuilder::new();
        let user = root.segment("user");
        let order = root.segment("order");
        assert!(root.is_root());
        assert_eq!(user.segments(), ["user"]);
        assert_eq!(order.segments(), ["order"]);
    }

    #[test]
    fn verb_only_looks_at_last_segment() {
        assert_eq!(path(&["get", "user"]).verb(), None);
        assert_eq!(path(&["user", "Get"]).verb(), Some(HttpMethod::Get));
        assert_eq!(path(&["user", "Getter"]).verb(), None);
        assert_eq!(PathBuilder::new().verb(), None);
    }

    #[test]
    fn verb_call_excludes_verb_from_path() {
        let req = expect_request(path(&["user", "get"]).call(vec![]));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "/user");
        assert!(req.body.is_none());
        assert!(req.config.is_none());
    }

    #[test]
    fn verb_call_takes_body_and_config_positionally() {
        let args = vec![json!({"q": "x"}), json!({"timeout": 5}), json!("extra")];
        let req = expect_request(path(&["search", "get"]).call(args));
        assert_eq!(req.path, "/search");
        assert_eq!(req.body, Some(json!({"q": "x"})));
        assert_eq!(req.config, Some(json!({"timeout": 5})));
    }

    #[test]
    fn root_verb_call_targets_root() {
        let req = expect_request(path(&["DELETE"]).call(vec![]));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "/");
    }

    #[test]
    fn earlier_verb_segments_are_plain_path() {
        let req = expect_request(path(&["get", "items", "post"]).call(vec![]));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/get/items");
    }

    #[test]
    fn verb_call_decodes_escape_and_collapses_separators() {
        let req = expect_request(path(&["api$v1", "", "/users/", "head"]).call(vec![]));
        assert_eq!(req.method, HttpMethod::Head);
        assert_eq!(req.path, "/api-v1/users/");
    }

    #[test]
    fn argument_inserts_segment_and_ignores_extras() {
        let parent = path(&["user"]);
        match parent.call(vec![json!(42), json!("ignored")]).unwrap() {
            Call::Descend(child) => assert_eq!(child.segments(), ["user", "42"]),
            other => panic!("expected descend, got {other:?}"),
        }
        assert_eq!(parent.segments(), ["user"]);
    }

    #[test]
    fn argument_at_root_inserts_first_segment() {
        match PathBuilder::new().call(vec![json!("v1")]).unwrap() {
            Call::Descend(child) => assert_eq!(child.segments(), ["v1"]),
            other => panic!("expected descend, got {other:?}"),
        }
    }

    #[test]
    fn zero_args_on_non_verb_is_invalid() {
        let err = path(&["user", "$x", "profile"]).call(vec![]).unwrap_err();
        assert_eq!(
            err,
            ApiError::InvalidPathCall {
                path: "user/$x/profile".to_string()
            }
        );
        assert_eq!(err.to_string(), "cannot call path: user/$x/profile");
    }

    #[test]
    fn zero_args_at_root_is_invalid() {
        let err = PathBuilder::new().call(vec![]).unwrap_err();
        assert_eq!(err, ApiError::InvalidPathCall { path: String::new() });
    }

    #[test]
    fn request_uses_full_path() {
        let req = path(&["user", "42"]).request(HttpMethod::Put, Some(json!({"a": 1})), None);
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "/user/42");
        assert_eq!(req.body, Some(json!({"a": 1})));
    }

    #[test]
    fn param_uses_display_form() {
        let p = PathBuilder::new().segment("user").param(7u64).segment("profile");
        assert_eq!(p.url(), "/user/7/profile");
    }
}
