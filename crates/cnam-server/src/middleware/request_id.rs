//! Middleware que genera o propaga X-Request-Id.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, Response},
};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header name for request ID.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID stored in the request extensions.
///
/// The same value is forwarded to the CNAM provider so a lookup can be
/// traced end to end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Layer that adds request ID to requests and responses.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Middleware that ensures every request has a unique ID.
#[derive(Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        // Reuse the caller's ID when it is a valid header value
        let header_value = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .filter(|v| !v.is_empty() && v.to_str().is_ok())
            .cloned()
            .unwrap_or_else(|| {
                HeaderValue::from_str(&Uuid::new_v4().to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
            });

        let request_id = header_value.to_str().unwrap_or("unknown").to_string();

        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), header_value.clone());
        request.extensions_mut().insert(RequestId(request_id));

        // Clone-and-swap: the clone may not be ready, the original is
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = inner.call(request).await?;

            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), header_value);

            Ok(response)
        })
    }
}

// Unit tests are in tests/middleware_test.rs to avoid complex type bounds
// with tower::service_fn and async functions.
