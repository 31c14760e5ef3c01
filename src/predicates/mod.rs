//! Concrete request predicates gating header injection.
//!
//! Each predicate wraps an inner predicate and evaluates it first, so a
//! chain built as `Neutral → Path → … → Params` checks its conditions in
//! construction order, short-circuiting on the first
//! [`Skip`](crate::predicate::PredicateResult::Skip).
//!
//! # Available Predicates
//!
//! | Predicate | Description |
//! |-----------|-------------|
//! | [`Path`] | Match the request path against anchored regex patterns |
//! | [`Authorized`] | Detect evidence of authentication (header or cookie) |
//! | [`Params`] | Evaluate query parameter names against an allow/block policy |
//!
//! # Combining Predicates
//!
//! Use the extension traits to chain, or the combinators in
//! [`predicate`](crate::predicate) for free-form composition:
//!
//! ```
//! use cacheward::predicate::PredicateExt;
//! use cacheward::predicates::{Authorized, ParamsMode, ParamsPredicate, Path};
//! use cacheward::FilterableRequest;
//! use std::collections::HashSet;
//!
//! let chain = Path::try_new(&["/content/.*".to_string()])
//!     .unwrap()
//!     .and(Authorized::new().not())
//!     .params(ParamsMode::AllowListed(HashSet::new()));
//! # let _: &dyn cacheward::predicate::Predicate<Subject = FilterableRequest> = &chain;
//! ```

pub mod authorized;
pub mod params;
pub mod path;

pub use authorized::{AUTHORIZATION_COOKIE, Authorized, AuthorizedPredicate, LOGIN_TOKEN_COOKIE};
pub use params::{Params, ParamsMode, ParamsPredicate};
pub use path::{Path, PathPredicate};
