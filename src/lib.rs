#![warn(missing_docs)]
//! # cacheward
//!
//! Predicate-gated response header injection for Tower services.
//!
//! `cacheward` decides, once per request, whether the response flowing back
//! through it should receive an injected header — canonically
//! `Cache-Control: max-age=N` to drive TTL support in fronting caches — and
//! stamps it when the decision is apply. The decision combines three
//! independently configured rules with fixed precedence:
//!
//! 1. **Path**: the request path must match one of the configured anchored
//!    regex patterns (an empty set matches every path).
//! 2. **Authentication**: when `allow_authorized` is off, any request
//!    carrying a non-empty `Authorization` header or a `login-token` /
//!    `authorization` cookie is skipped. Detection is presence-based; the
//!    filter signals cacheability, it does not enforce access control.
//! 3. **Parameters**: query parameter names are checked against a deny-list
//!    (`allow_all_params = true`) or an allow-list
//!    (`allow_all_params = false`); a request with no parameters always
//!    passes.
//!
//! Checks run in that order and short-circuit, so the common "not my path"
//! case costs one pattern scan and nothing else. Evaluation is a pure
//! function of the request head and the configuration snapshot: no I/O, no
//! shared mutable state, deterministic under re-evaluation.
//!
//! # Quick Start
//!
//! ```
//! use cacheward::{FilterConfig, HeaderFilter, MaxAge};
//! use tower::ServiceBuilder;
//!
//! # fn main() -> Result<(), cacheward::ConfigError> {
//! let filter = HeaderFilter::builder()
//!     .config(
//!         FilterConfig::builder()
//!             .pattern("/content/site/.*")
//!             .allow_authorized(false)
//!             .allow_all_params(true)
//!             .block_param("wcmmode")
//!             .build(),
//!     )
//!     .provider(MaxAge::new(600)?)
//!     .build()?;
//!
//! let service = ServiceBuilder::new()
//!     .layer(filter)
//!     .service(tower::service_fn(|_req: http::Request<()>| async {
//!         Ok::<_, std::convert::Infallible>(http::Response::new(()))
//!     }));
//! # let _ = service;
//! # Ok(())
//! # }
//! ```
//!
//! # Errors and failure behavior
//!
//! All validation is front-loaded: malformed patterns and a zero max-age
//! fail [`HeaderFilter`] construction with [`ConfigError`] before any
//! request is processed. The request path never errors — parameter names
//! are extracted lexically so every name present in the query string
//! reaches the policy, and if request handling aborts the header is
//! simply never set.
//!
//! # Live reconfiguration
//!
//! [`ConfigHandle`] holds the compiled configuration behind an atomic swap.
//! [`ConfigHandle::store`] compiles the replacement first and publishes it
//! only on success; requests that already loaded a snapshot finish on it.
//!
//! # Extending
//!
//! The injected directive comes from a [`HeaderProvider`] — implement it to
//! stamp a different header or compute the value from the request view.
//! Custom decision rules implement [`predicate::Predicate`] and compose
//! with the bundled ones through [`predicate::PredicateExt`].

pub mod config;
pub mod error;
pub mod future;
pub mod layer;
pub mod predicate;
pub mod predicates;
pub mod provider;
pub mod query;
mod request;
pub mod service;

pub use config::{ArcPredicate, ConfigHandle, ConfigSnapshot, FilterConfig, FilterConfigBuilder};
pub use error::ConfigError;
pub use future::HeaderFilterFuture;
pub use layer::{ApplyMode, HeaderFilter, HeaderFilterBuilder};
pub use provider::{HeaderProvider, MaxAge};
pub use request::FilterableRequest;
pub use service::HeaderFilterService;
