//! The request executor contract.
//!
//! The executor is the only component that does I/O. It receives every
//! finalized `HttpRequest` and returns a future; the engine hands that future
//! back to the caller unchanged, so retries, timeouts, cancellation and error
//! mapping are all the executor's business.

use std::future::Future;

use crate::http::HttpRequest;

pub trait RequestExecutor {
    type Response;
    type Future: Future<Output = Self::Response>;

    fn execute(&self, request: HttpRequest) -> Self::Future;
}

impl<F, Fut> RequestExecutor for F
where
    F: Fn(HttpRequest) -> Fut,
    Fut: Future,
{
    type Response = Fut::Output;
    type Future = Fut;

    fn execute(&self, request: HttpRequest) -> Self::Future {
        self(request)
    }
}
