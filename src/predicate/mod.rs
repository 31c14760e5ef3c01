//! Header-injection decision predicates.
//!
//! This module provides the [`Predicate`] trait and [`PredicateResult`] enum
//! for deciding whether a response should receive an injected header.
//!
//! ## Overview
//!
//! Predicates are the core decision mechanism of the filter. They evaluate a
//! request view and return whether the header should be applied to the
//! response or the response should pass through untouched.
//!
//! ## Composability
//!
//! Predicates are designed to be composed using logical combinators:
//!
//! - [`Not`] - Inverts a predicate result
//! - [`Or`] - Either predicate returning `Apply` is sufficient
//! - [`And`] - Both predicates must return `Apply`
//!
//! Chaining predicates sequentially provides AND semantics by default.

pub mod combinators;
pub mod neutral;

use std::sync::Arc;

use async_trait::async_trait;

pub use combinators::{And, Not, Or, PredicateExt};
pub use neutral::Neutral;

/// Result of a predicate evaluation.
///
/// Indicates whether the header should be applied or the request skipped,
/// while preserving ownership of the subject for further processing.
#[derive(Debug)]
pub enum PredicateResult<S> {
    /// The response for this subject should receive the header.
    Apply(S),
    /// The response for this subject should pass through untouched.
    Skip(S),
}

impl<S> PredicateResult<S> {
    /// Chains predicate checks.
    ///
    /// If `Apply`, applies the function which may return `Apply` or `Skip`.
    /// If already `Skip`, short-circuits and stays `Skip` without calling the
    /// function.
    ///
    /// This enables predicate chaining where `Skip` is "sticky":
    ///
    /// ```ignore
    /// predicate1.check(request).await
    ///     .and_then(|req| predicate2.check(req)).await
    ///     .and_then(|req| predicate3.check(req)).await
    /// ```
    pub async fn and_then<F, Fut>(self, f: F) -> PredicateResult<S>
    where
        F: FnOnce(S) -> Fut,
        Fut: std::future::Future<Output = PredicateResult<S>>,
    {
        match self {
            PredicateResult::Apply(value) => f(value).await,
            PredicateResult::Skip(value) => PredicateResult::Skip(value),
        }
    }

    /// Returns `true` if the result is `Apply`.
    pub fn is_apply(&self) -> bool {
        matches!(self, PredicateResult::Apply(_))
    }

    /// Consumes the result, returning the subject either way.
    pub fn into_subject(self) -> S {
        match self {
            PredicateResult::Apply(value) | PredicateResult::Skip(value) => value,
        }
    }
}

/// Trait for evaluating whether a subject should receive the header.
///
/// Predicates are the core abstraction of the decision logic. They are
/// independent of any concrete header: the same chain can gate a
/// `Cache-Control` stamp or any other response directive.
///
/// # Type Parameters
///
/// The `Subject` associated type defines what this predicate evaluates,
/// typically [`FilterableRequest`](crate::FilterableRequest).
///
/// # Ownership
///
/// The `check` method takes ownership of the subject and returns it wrapped
/// in a [`PredicateResult`]. This allows the subject to flow through a chain
/// of predicates without cloning.
#[async_trait]
pub trait Predicate {
    /// The type being evaluated by this predicate.
    type Subject;

    /// Evaluate whether the subject should receive the header.
    ///
    /// Returns [`PredicateResult::Apply`] if the header should be set on the
    /// response, or [`PredicateResult::Skip`] if the response should pass
    /// through untouched.
    async fn check(&self, subject: Self::Subject) -> PredicateResult<Self::Subject>;
}

#[async_trait]
impl<T> Predicate for Box<T>
where
    T: Predicate + ?Sized + Sync,
    T::Subject: Send,
{
    type Subject = T::Subject;

    async fn check(&self, subject: T::Subject) -> PredicateResult<T::Subject> {
        self.as_ref().check(subject).await
    }
}

#[async_trait]
impl<T> Predicate for &T
where
    T: Predicate + ?Sized + Sync,
    T::Subject: Send,
{
    type Subject = T::Subject;

    async fn check(&self, subject: T::Subject) -> PredicateResult<T::Subject> {
        (*self).check(subject).await
    }
}

#[async_trait]
impl<T> Predicate for Arc<T>
where
    T: Predicate + Send + Sync + ?Sized,
    T::Subject: Send,
{
    type Subject = T::Subject;

    async fn check(&self, subject: T::Subject) -> PredicateResult<T::Subject> {
        self.as_ref().check(subject).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_predicate_ext_with_box_dyn() {
        let p1: Box<dyn Predicate<Subject = i32> + Send + Sync> = Box::new(Neutral::<i32>::new());
        let p2: Box<dyn Predicate<Subject = i32> + Send + Sync> = Box::new(Neutral::<i32>::new());

        // PredicateExt works on Box<dyn Predicate> because Box<T> is Sized
        let combined = p1.or(p2);

        let result = combined.check(42).await;
        assert!(matches!(result, PredicateResult::Apply(42)));
    }

    #[tokio::test]
    async fn test_predicate_ext_chaining_with_box_dyn() {
        let p1: Box<dyn Predicate<Subject = i32> + Send + Sync> = Box::new(Neutral::<i32>::new());
        let p2: Box<dyn Predicate<Subject = i32> + Send + Sync> = Box::new(Neutral::<i32>::new());
        let p3: Box<dyn Predicate<Subject = i32> + Send + Sync> = Box::new(Neutral::<i32>::new());

        // Chain: p1.and(p2).or(p3).not()
        let combined = p1.and(p2).or(p3).not();

        let result = combined.check(42).await;
        // Neutral returns Apply, so: Apply AND Apply = Apply, OR Apply = Apply, NOT = Skip
        assert!(matches!(result, PredicateResult::Skip(42)));
    }

    #[tokio::test]
    async fn test_sticky_skip_in_and_then() {
        let skip: PredicateResult<i32> = PredicateResult::Skip(7);
        let result = skip
            .and_then(|value| async move { PredicateResult::Apply(value) })
            .await;
        assert!(matches!(result, PredicateResult::Skip(7)));
    }

    #[tokio::test]
    async fn test_predicate_ext_boxed_in_vec() {
        // Store heterogeneous predicates in a Vec
        let predicates: Vec<Box<dyn Predicate<Subject = i32> + Send + Sync>> = vec![
            Neutral::<i32>::new().boxed(),
            Neutral::<i32>::new().not().boxed(),
        ];

        let result1 = predicates[0].check(1).await;
        let result2 = predicates[1].check(2).await;

        assert!(matches!(result1, PredicateResult::Apply(1)));
        assert!(matches!(result2, PredicateResult::Skip(2)));
    }
}
