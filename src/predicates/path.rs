//! Path pattern matching predicate.
//!
//! Provides [`Path`] predicate for matching request paths against a set of
//! anchored regular expressions.

use async_trait::async_trait;
use regex::Regex;
use tracing::warn;

use crate::error::ConfigError;
use crate::predicate::{Neutral, Predicate, PredicateResult};
use crate::request::FilterableRequest;

/// Compiles raw pattern strings into full-path anchored regexes.
///
/// Each pattern must match the entire request path; partial matching has to
/// be requested explicitly in the pattern itself (e.g. a `.*` suffix).
/// Invalid syntax fails here, at activation time, so the per-request match
/// can never error.
pub fn compile(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            if pattern.is_empty() {
                // Request paths always start with '/', so this pattern can
                // never match anything.
                warn!("empty path pattern will never match a request path");
            }
            Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })
        })
        .collect()
}

/// A predicate that matches the request path against a pattern set.
///
/// Returns [`Apply`](PredicateResult::Apply) when the path matches **any**
/// of the patterns (logical OR, short-circuiting on the first match). An
/// empty pattern set matches every path.
///
/// # Type Parameters
///
/// * `P` - The inner predicate to chain with. Use [`Path::new`] to start
///   a new predicate chain (uses [`Neutral`] internally), or use the
///   [`PathPredicate`] extension trait to chain onto an existing predicate.
#[derive(Debug)]
pub struct Path<P> {
    patterns: Vec<Regex>,
    inner: P,
}

impl<S> Path<Neutral<S>> {
    /// Creates a path predicate from already compiled patterns.
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self {
            patterns,
            inner: Neutral::new(),
        }
    }

    /// Creates a path predicate from raw pattern strings.
    ///
    /// Fails with [`ConfigError::InvalidPattern`] on the first pattern that
    /// does not compile.
    pub fn try_new(patterns: &[String]) -> Result<Self, ConfigError> {
        Ok(Self::new(compile(patterns)?))
    }
}

impl<P> Path<P> {
    fn matches(&self, path: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|pattern| pattern.is_match(path))
    }
}

/// Extension trait for adding path matching to a predicate chain.
pub trait PathPredicate: Sized {
    /// Adds a path pattern match to this predicate chain.
    fn path(self, patterns: Vec<Regex>) -> Path<Self>;
}

impl<P> PathPredicate for P
where
    P: Predicate,
{
    fn path(self, patterns: Vec<Regex>) -> Path<Self> {
        Path {
            patterns,
            inner: self,
        }
    }
}

#[async_trait]
impl<P> Predicate for Path<P>
where
    P: Predicate<Subject = FilterableRequest> + Send + Sync,
{
    type Subject = P::Subject;

    async fn check(&self, request: Self::Subject) -> PredicateResult<Self::Subject> {
        match self.inner.check(request).await {
            PredicateResult::Apply(request) => {
                if self.matches(request.path()) {
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

    fn patterns(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|p| p.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_pattern_set_matches_all() {
        let predicate = Path::try_new(&[]).unwrap();
        let result = predicate.check(request("/etc/anything")).await;
        assert!(result.is_apply());
    }

    #[tokio::test]
    async fn test_any_pattern_matches() {
        let predicate =
            Path::try_new(&patterns(&["/content/.*", "/apps/.*"])).unwrap();
        assert!(predicate.check(request("/apps/site/page")).await.is_apply());
        assert!(predicate.check(request("/content/x")).await.is_apply());
        assert!(!predicate.check(request("/etc/foo")).await.is_apply());
    }

    #[tokio::test]
    async fn test_pattern_is_anchored() {
        // "/content" must not match "/a/content/b" as a substring
        let predicate = Path::try_new(&patterns(&["/content"])).unwrap();
        assert!(predicate.check(request("/content")).await.is_apply());
        assert!(!predicate.check(request("/a/content/b")).await.is_apply());
        assert!(!predicate.check(request("/content/deep")).await.is_apply());
    }

    #[test]
    fn test_invalid_pattern_fails_at_compile() {
        let error = compile(&patterns(&["/content/["])).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidPattern { .. }));
    }
}
