//! Request parameter allow/block policy predicate.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::predicate::{Neutral, Predicate, PredicateResult};
use crate::request::FilterableRequest;

/// Parameter evaluation mode.
///
/// The two modes are mutually exclusive and operate on parameter names only;
/// values are never inspected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParamsMode {
    /// Deny-list mode: the request is allowed unless it carries **any**
    /// parameter whose name is in the set.
    DenyListed(HashSet<String>),
    /// Allow-list mode: the request is allowed iff **every** parameter it
    /// carries has its name in the set. An empty set denies any request
    /// with at least one parameter, the conservative default.
    AllowListed(HashSet<String>),
}

impl ParamsMode {
    /// Evaluates the mode against a set of parameter names.
    ///
    /// A request with no parameters is allowed in both modes.
    pub fn allows(&self, names: &HashSet<String>) -> bool {
        match self {
            ParamsMode::DenyListed(blocked) => names.is_disjoint(blocked),
            ParamsMode::AllowListed(passed) => names.is_subset(passed),
        }
    }
}

/// A predicate that evaluates query parameter names against a [`ParamsMode`].
///
/// # Type Parameters
///
/// * `P` - The inner predicate to chain with. Use [`Params::new`] to start
///   a new predicate chain (uses [`Neutral`] internally), or use the
///   [`ParamsPredicate`] extension trait to chain onto an existing predicate.
#[derive(Debug)]
pub struct Params<P> {
    mode: ParamsMode,
    inner: P,
}

impl<S> Params<Neutral<S>> {
    /// Creates a standalone parameter policy predicate.
    pub fn new(mode: ParamsMode) -> Self {
        Self {
            mode,
            inner: Neutral::new(),
        }
    }
}

/// Extension trait for adding a parameter policy to a predicate chain.
pub trait ParamsPredicate: Sized {
    /// Adds a parameter policy check to this predicate chain.
    fn params(self, mode: ParamsMode) -> Params<Self>;
}

impl<P> ParamsPredicate for P
where
    P: Predicate,
{
    fn params(self, mode: ParamsMode) -> Params<Self> {
        Params { mode, inner: self }
    }
}

#[async_trait]
impl<P> Predicate for Params<P>
where
    P: Predicate<Subject = FilterableRequest> + Send + Sync,
{
    type Subject = P::Subject;

    async fn check(&self, request: Self::Subject) -> PredicateResult<Self::Subject> {
        match self.inner.check(request).await {
            PredicateResult::Apply(request) => {
                if self.mode.allows(&request.param_names()) {
                    PredicateResult::Apply(request)
                } else {
                    PredicateResult::Skip(request)
                }
            }
            PredicateResult::Skip(request) => PredicateResult::Skip(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn request(path: &str) -> FilterableRequest {
        let (parts, ()) = Request::get(path).body(()).unwrap().into_parts();
        FilterableRequest::from_parts(parts)
    }

    fn names(raw: &[&str]) -> HashSet<String> {
        raw.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_deny_listed_blocks_named_param() {
        let predicate = Params::new(ParamsMode::DenyListed(names(&["wcmmode"])));

        assert!(predicate.check(request("/page")).await.is_apply());
        assert!(predicate.check(request("/page?foo=1")).await.is_apply());
        assert!(!predicate.check(request("/page?wcmmode=edit")).await.is_apply());
        // One blocked parameter denies, regardless of the others
        assert!(
            !predicate
                .check(request("/page?foo=1&wcmmode=edit&bar=2"))
                .await
                .is_apply()
        );
    }

    #[tokio::test]
    async fn test_allow_listed_requires_every_param_known() {
        let predicate = Params::new(ParamsMode::AllowListed(names(&["page"])));

        assert!(predicate.check(request("/list")).await.is_apply());
        assert!(predicate.check(request("/list?page=2")).await.is_apply());
        assert!(!predicate.check(request("/list?page=2&debug=1")).await.is_apply());
        assert!(!predicate.check(request("/list?debug=1")).await.is_apply());
    }

    #[tokio::test]
    async fn test_deny_listed_blocks_repeated_param() {
        let predicate = Params::new(ParamsMode::DenyListed(names(&["wcmmode"])));

        assert!(
            !predicate
                .check(request("/page?wcmmode=edit&wcmmode=disabled"))
                .await
                .is_apply()
        );
    }

    #[tokio::test]
    async fn test_allow_listed_sees_repeated_unknown_param() {
        let predicate = Params::new(ParamsMode::AllowListed(names(&["page"])));

        assert!(!predicate.check(request("/list?a=1&a=2")).await.is_apply());
        assert!(
            predicate
                .check(request("/list?page=1&page=2"))
                .await
                .is_apply()
        );
    }

    #[tokio::test]
    async fn test_empty_allow_list_denies_any_param() {
        let predicate = Params::new(ParamsMode::AllowListed(HashSet::new()));

        assert!(predicate.check(request("/page")).await.is_apply());
        assert!(!predicate.check(request("/page?x=1")).await.is_apply());
    }

    #[test]
    fn test_no_params_allowed_in_both_modes() {
        let empty = HashSet::new();
        assert!(ParamsMode::DenyListed(names(&["a"])).allows(&empty));
        assert!(ParamsMode::AllowListed(HashSet::new()).allows(&empty));
    }
}
