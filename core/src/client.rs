//! Executor-backed traversal handle.
//!
//! # Design
//! `ApiNode` pairs a `PathBuilder` with a shared executor. Descending clones
//! the `Arc` and builds a new path, so any node can seed any number of
//! independent traversals. Only `invoke` on a verb segment (or `request`)
//! reaches the executor; everything else is pure value construction.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::builder::{Call, PathBuilder};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::http::HttpMethod;

/// A position in the virtual API tree.
///
/// ```
/// use keylink_core::{ApiNode, HttpRequest};
///
/// let api = ApiNode::new(|req: HttpRequest| std::future::ready(req));
/// let pending = api
///     .descend("user")
///     .param(42)
///     .descend("get")
///     .invoke(vec![])
///     .unwrap()
///     .into_request()
///     .unwrap();
/// # drop(pending);
/// ```
pub struct ApiNode<E> {
    executor: Arc<E>,
    path: PathBuilder,
}

/// Result of invoking a node.
pub enum Invocation<E: RequestExecutor> {
    /// The executor was called; await this for its response.
    Request(E::Future),
    /// Parameter insertion produced a deeper node.
    Descend(ApiNode<E>),
}

impl<E: RequestExecutor> Invocation<E> {
    pub fn into_request(self) -> Option<E::Future> {
        match self {
            Invocation::Request(fut) => Some(fut),
            Invocation::Descend(_) => None,
        }
    }

    pub fn into_node(self) -> Option<ApiNode<E>> {
        match self {
            Invocation::Request(_) => None,
            Invocation::Descend(node) => Some(node),
        }
    }
}

impl<E> Clone for ApiNode<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            path: self.path.clone(),
        }
    }
}

impl<E> fmt::Debug for ApiNode<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiNode").field("path", &self.path).finish_non_exhaustive()
    }
}

impl<E: RequestExecutor> ApiNode<E> {
    /// Root node for `executor`.
    pub fn new(executor: E) -> Self {
        Self::with_shared(Arc::new(executor))
    }

    pub fn with_shared(executor: Arc<E>) -> Self {
        Self {
            executor,
            path: PathBuilder::new(),
        }
    }

    pub fn path(&self) -> &PathBuilder {
        &self.path
    }

    pub fn descend(&self, name: impl Into<String>) -> Self {
        self.with_path(self.path.segment(name))
    }

    pub fn param(&self, value: impl fmt::Display) -> Self {
        self.with_path(self.path.param(value))
    }

    /// Call this node with positional arguments. See [`PathBuilder::call`]
    /// for the classification rules.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Invocation<E>, ApiError> {
        match self.path.call(args)? {
            Call::Request(request) => Ok(Invocation::Request(self.executor.execute(request))),
            Call::Descend(path) => Ok(Invocation::Descend(self.with_path(path))),
        }
    }

    /// Fire `method` at this node's path directly.
    pub fn request(
        &self,
        method: HttpMethod,
        body: Option<Value>,
        config: Option<Value>,
    ) -> E::Future {
        self.executor.execute(self.path.request(method, body, config))
    }

    /// Fire `endpoint` relative to this node, filling its placeholders from
    /// `params`.
    pub fn call_endpoint(
        &self,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
        body: Option<Value>,
        config: Option<Value>,
    ) -> Result<E::Future, ApiError> {
        let request = endpoint.request(&self.path, params, body, config)?;
        Ok(self.executor.execute(request))
    }

    fn with_path(&self, path: PathBuilder) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpRequest;
    use serde_json::json;
    use std::future::{ready, Ready};
    use std::sync::Mutex;

    type Echo = fn(HttpRequest) -> Ready<HttpRequest>;

    fn api() -> ApiNode<Echo> {
        ApiNode::new(ready as Echo)
    }

    async fn fire<E: RequestExecutor>(node: &ApiNode<E>, args: Vec<Value>) -> E::Response {
        match node.invoke(args).unwrap() {
            Invocation::Request(fut) => fut.await,
            Invocation::Descend(node) => panic!("expected request, got {node:?}"),
        }
    }

    fn insert(node: &ApiNode<Echo>, arg: Value) -> ApiNode<Echo> {
        node.invoke(vec![arg]).unwrap().into_node().unwrap()
    }

    #[tokio::test]
    async fn get_without_args() {
        let req = fire(&api().descend("user").descend("get"), vec![]).await;
        assert_eq!(
            req,
            HttpRequest {
                method: HttpMethod::Get,
                path: "/user".to_string(),
                body: None,
                config: None,
            }
        );
    }

    #[tokio::test]
    async fn parameter_then_patch_with_body() {
        let user = insert(&api().descend("user"), json!(42));
        let req = fire(&user.descend("profile").descend("patch"), vec![json!({"name": "x"})]).await;
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "/user/42/profile");
        assert_eq!(req.body, Some(json!({"name": "x"})));
        assert_eq!(req.config, None);
    }

    #[tokio::test]
    async fn get_with_body_and_config() {
        let req = fire(
            &api().descend("search").descend("get"),
            vec![json!({"q": "x"}), json!({"timeout": 5})],
        )
        .await;
        assert_eq!(req.path, "/search");
        assert_eq!(req.body, Some(json!({"q": "x"})));
        assert_eq!(req.config, Some(json!({"timeout": 5})));
    }

    #[test]
    fn bare_call_on_resource_is_invalid() {
        let err = api().descend("user").invoke(vec![]).err().unwrap();
        assert_eq!(err, ApiError::InvalidPathCall { path: "user".to_string() });
    }

    #[tokio::test]
    async fn siblings_do_not_share_state() {
        let root = api();
        let user = root.descend("user");
        let order = root.descend("order");
        let _ = fire(&user.descend("get"), vec![]).await;
        let req = fire(&order.descend("get"), vec![]).await;
        assert_eq!(req.path, "/order");
        assert_eq!(user.path().segments(), ["user"]);
        assert!(root.path().is_root());
    }

    #[tokio::test]
    async fn verb_segment_is_case_insensitive() {
        for verb in ["Get", "GET", "get"] {
            let req = fire(&api().descend("user").descend(verb), vec![]).await;
            assert_eq!(req.method, HttpMethod::Get);
        }
        let err = api().descend("user").descend("Getter").invoke(vec![]).err();
        assert!(matches!(err, Some(ApiError::InvalidPathCall { .. })));
    }

    #[tokio::test]
    async fn request_matches_verb_invocation() {
        let node = api().descend("user").param(9);
        let direct = node.request(HttpMethod::Delete, None, None).await;
        let via_verb = fire(&node.descend("delete"), vec![]).await;
        assert_eq!(direct, via_verb);
    }

    #[tokio::test]
    async fn executor_sees_every_request_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let api = ApiNode::new(move |req: HttpRequest| {
            log.lock().unwrap().push(req.path.clone());
            ready(())
        });

        let user = api.descend("user");
        user.descend("42").descend("post").invoke(vec![]).unwrap().into_request().unwrap().await;
        let _ = user.invoke(vec![json!("7")]).unwrap();
        user.descend("put").invoke(vec![]).unwrap().into_request().unwrap().await;

        assert_eq!(*seen.lock().unwrap(), vec!["/user/42".to_string(), "/user".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn handles_are_shared_across_tasks() {
        let root = api();
        let mut tasks = Vec::new();
        for id in 0..8 {
            let node = root.descend("items").param(id).descend("get");
            tasks.push(tokio::spawn(async move {
                node.invoke(vec![]).unwrap().into_request().unwrap().await
            }));
        }
        for (id, task) in tasks.into_iter().enumerate() {
            assert_eq!(task.await.unwrap().path, format!("/items/{id}"));
        }
    }
}
