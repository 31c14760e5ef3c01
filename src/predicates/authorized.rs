//! Authenticated-request detection predicate.
//!
//! Detection is purely presence-based: a forged or expired credential still
//! counts as authorized. The filter decides cacheability signaling, not
//! access control, so validating token contents is out of its hands.

use async_trait::async_trait;

use crate::predicate::{Neutral, Predicate, PredicateResult};
use crate::request::FilterableRequest;

/// Cookie set by SSO-style login flows.
pub const LOGIN_TOKEN_COOKIE: &str = "login-token";

/// Cookie used when credentials are transported as a cookie instead of a
/// header. Names are fixed by the protocol, not configurable.
pub const AUTHORIZATION_COOKIE: &str = "authorization";

/// Returns `true` if the request carries any evidence of authentication:
/// a non-empty `Authorization` header, a `login-token` cookie, or an
/// `authorization` cookie.
pub fn is_authorized(request: &FilterableRequest) -> bool {
    request
        .authorization()
        .map(|value| !value.is_empty())
        .unwrap_or(false)
        || request.has_cookie(LOGIN_TOKEN_COOKIE)
        || request.has_cookie(AUTHORIZATION_COOKIE)
}

/// A predicate that returns [`Apply`](PredicateResult::Apply) for
/// authenticated requests.
///
/// Usually combined with [`not()`](crate::predicate::PredicateExt::not) to
/// gate anonymous-only behavior.
///
/// # Type Parameters
///
/// * `P` - The inner predicate to chain with. Use [`Authorized::new`] to
///   start a new predicate chain (uses [`Neutral`] internally), or use the
///   [`AuthorizedPredicate`] extension trait to chain onto an existing
///   predicate.
#[derive(Debug)]
pub struct Authorized<P> {
    inner: P,
}

impl<S> Authorized<Neutral<S>> {
    /// Creates a standalone authorized-request predicate.
    pub fn new() -> Self {
        Self {
            inner: Neutral::new(),
        }
    }
}

impl<S> Default for Authorized<Neutral<S>> {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension trait for adding authentication detection to a predicate chain.
pub trait AuthorizedPredicate: Sized {
    /// Adds an authenticated-request check to this predicate chain.
    fn authorized(self) -> Authorized<Self>;
}

impl<P> AuthorizedPredicate for P
where
    P: Predicate,
{
    fn authorized(self) -> Authorized<Self> {
        Authorized { inner: self }
    }
}

#[async_trait]
impl<P> Predicate for Authorized<P>
where
    P: Predicate<Subject = FilterableRequest> + Send + Sync,
{
    type Subject = P::Subject;

    async fn check(&self, request: Self::Subject) -> PredicateResult<Self::Subject> {
        match self.inner.check(request).await {
            PredicateResult::Apply(request) => {
                if is_authorized(&request) {
                    PredicateResult::Apply(request)
                } else {
                    PredicateResult::Skip(request)
                }
            }
            PredicateResult::Skip(request) => PredicateResult::Skip(request),
        }
    }
}
