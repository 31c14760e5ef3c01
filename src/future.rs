//! Response future for the header filter.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::ready;
use http::{HeaderName, HeaderValue, Request, Response};
use pin_project::pin_project;
use tower::Service;
use tracing::{trace, warn};

use crate::layer::ApplyMode;
use crate::predicate::PredicateResult;
use crate::provider::HeaderProvider;
use crate::request::FilterableRequest;

type Decision = BoxFuture<'static, PredicateResult<FilterableRequest>>;

#[pin_project(project = StateProj)]
enum State<F> {
    /// Predicate chain still evaluating; the request body is parked in the
    /// enclosing future until the head comes back.
    Deciding {
        #[pin]
        decision: Decision,
    },
    /// Request dispatched upstream; the directive, if any, is stamped on
    /// the response when it completes.
    Proxying {
        #[pin]
        upstream: F,
    },
}

/// Future returned by [`HeaderFilterService`](crate::HeaderFilterService).
///
/// Drives the decision, forwards the reassembled request upstream and, on
/// an apply decision, injects the provider's directive into the response
/// according to the configured [`ApplyMode`].
#[pin_project]
pub struct HeaderFilterFuture<S, H, ReqBody>
where
    S: Service<Request<ReqBody>>,
{
    upstream: S,
    provider: Arc<H>,
    mode: ApplyMode,
    body: Option<ReqBody>,
    directive: Option<(HeaderName, HeaderValue)>,
    #[pin]
    state: State<S::Future>,
}

impl<S, H, ReqBody> HeaderFilterFuture<S, H, ReqBody>
where
    S: Service<Request<ReqBody>>,
{
    pub(crate) fn new(
        upstream: S,
        decision: Decision,
        body: ReqBody,
        provider: Arc<H>,
        mode: ApplyMode,
    ) -> Self {
        Self {
            upstream,
            provider,
            mode,
            body: Some(body),
            directive: None,
            state: State::Deciding { decision },
        }
    }
}

impl<S, H, ReqBody, ResBody> Future for HeaderFilterFuture<S, H, ReqBody>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    H: HeaderProvider,
{
    type Output = Result<Response<ResBody>, S::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            match this.state.as_mut().project() {
                StateProj::Deciding { decision } => {
                    let parts = match ready!(decision.poll(cx)) {
                        PredicateResult::Apply(view) => {
                            let name = this.provider.header_name();
                            let value = this.provider.header_value(&view);
                            if value.is_empty() {
                                warn!(
                                    header = %name,
                                    "provider returned an empty header value, nothing injected"
                                );
                            } else {
                                trace!(path = view.path(), header = %name, "decision: apply");
                                *this.directive = Some((name, value));
                            }
                            view.into_parts()
                        }
                        PredicateResult::Skip(view) => {
                            trace!(path = view.path(), "decision: skip");
                            view.into_parts()
                        }
                    };

                    let body = this
                        .body
                        .take()
                        .expect("request body already dispatched upstream");
                    let upstream = this.upstream.call(Request::from_parts(parts, body));
                    this.state.set(State::Proxying { upstream });
                }
                StateProj::Proxying { upstream } => {
                    let response = ready!(upstream.poll(cx));
                    let response = response.map(|mut response| {
                        if let Some((name, value)) = this.directive.take() {
                            match this.mode {
                                // insert replaces all previous values, so a
                                // response never carries duplicates
                                ApplyMode::Overwrite => {
                                    response.headers_mut().insert(name, value);
                                }
                                ApplyMode::IfAbsent => {
                                    if !response.headers().contains_key(&name) {
                                        response.headers_mut().insert(name, value);
                                    }
                                }
                            }
                        }
                        response
                    });
                    return Poll::Ready(response);
                }
            }
        }
    }
}
