//! The Tower service that evaluates the decision and proxies upstream.

use std::sync::Arc;

use http::{Request, Response};
use tower::Service;

use crate::config::ConfigHandle;
use crate::future::HeaderFilterFuture;
use crate::layer::ApplyMode;
use crate::provider::HeaderProvider;
use crate::request::FilterableRequest;

/// Per-request filter service wrapping an upstream service.
///
/// On each call the service loads the current configuration snapshot,
/// evaluates the predicate chain against the request head, forwards the
/// untouched request upstream and, when the decision was apply, stamps the
/// provider's directive on the response.
pub struct HeaderFilterService<S, H> {
    upstream: S,
    handle: ConfigHandle,
    provider: Arc<H>,
    mode: ApplyMode,
}

impl<S, H> HeaderFilterService<S, H> {
    pub(crate) fn new(
        upstream: S,
        handle: ConfigHandle,
        provider: Arc<H>,
        mode: ApplyMode,
    ) -> Self {
        Self {
            upstream,
            handle,
            provider,
            mode,
        }
    }
}

impl<S, H> Clone for HeaderFilterService<S, H>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            handle: self.handle.clone(),
            provider: Arc::clone(&self.provider),
            mode: self.mode,
        }
    }
}

impl<S, H, ReqBody, ResBody> Service<Request<ReqBody>> for HeaderFilterService<S, H>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone,
    H: HeaderProvider,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = HeaderFilterFuture<S, H, ReqBody>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.upstream.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // One snapshot per request: a concurrent config swap never changes
        // the rules mid-evaluation.
        let snapshot = self.handle.load();
        let predicate = snapshot.predicate();

        let (parts, body) = req.into_parts();
        let view = FilterableRequest::from_parts(parts);
        let decision = Box::pin(async move { predicate.check(view).await });

        HeaderFilterFuture::new(
            self.upstream.clone(),
            decision,
            body,
            Arc::clone(&self.provider),
            self.mode,
        )
    }
}
