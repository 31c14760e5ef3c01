//! Pluggable header-value providers.
//!
//! The filter machinery decides *whether* a header is injected; a
//! [`HeaderProvider`] decides *what* is injected. Providers must be pure
//! functions of the request view so that re-processing the same request
//! yields the same directive.

use http::header::CACHE_CONTROL;
use http::{HeaderName, HeaderValue};

use crate::error::ConfigError;
use crate::request::FilterableRequest;

/// Capability interface producing the injected header directive.
pub trait HeaderProvider: Send + Sync {
    /// Name of the header to inject.
    fn header_name(&self) -> HeaderName;

    /// Value of the header for this request.
    ///
    /// Must be deterministic for a given request view; providers perform no
    /// I/O and hold no mutable state.
    fn header_value(&self, request: &FilterableRequest) -> HeaderValue;
}

/// Value prefix of the directive emitted by [`MaxAge`].
pub const MAX_AGE_PREFIX: &str = "max-age=";

/// Provider emitting `Cache-Control: max-age=N`.
///
/// The value is fixed at construction; [`MaxAge::new`] rejects a zero
/// max-age so a misconfigured filter fails activation instead of stamping a
/// meaningless directive on live traffic.
#[derive(Debug, Clone)]
pub struct MaxAge {
    max_age: u64,
    value: HeaderValue,
}

impl MaxAge {
    /// Creates a provider for the given max-age in seconds.
    ///
    /// Fails with [`ConfigError::NonPositiveMaxAge`] when `seconds` is 0.
    pub fn new(seconds: u64) -> Result<Self, ConfigError> {
        if seconds == 0 {
            return Err(ConfigError::NonPositiveMaxAge(seconds));
        }
        let value = HeaderValue::from_str(&format!("{MAX_AGE_PREFIX}{seconds}"))?;
        Ok(Self {
            max_age: seconds,
            value,
        })
    }

    /// The configured max-age in seconds.
    pub fn max_age(&self) -> u64 {
        self.max_age
    }
}

impl HeaderProvider for MaxAge {
    fn header_name(&self) -> HeaderName {
        CACHE_CONTROL
    }

    fn header_value(&self, _request: &FilterableRequest) -> HeaderValue {
        self.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    #[test]
    fn test_zero_max_age_is_rejected() {
        assert!(matches!(
            MaxAge::new(0),
            Err(ConfigError::NonPositiveMaxAge(0))
        ));
    }

    #[test]
    fn test_directive_format() {
        let provider = MaxAge::new(600).unwrap();
        let (parts, ()) = Request::get("/").body(()).unwrap().into_parts();
        let request = FilterableRequest::from_parts(parts);

        assert_eq!(provider.header_name(), CACHE_CONTROL);
        assert_eq!(provider.header_value(&request), "max-age=600");
    }

    #[test]
    fn test_value_is_stable_across_requests() {
        let provider = MaxAge::new(60).unwrap();
        let (parts, ()) = Request::get("/a").body(()).unwrap().into_parts();
        let first = FilterableRequest::from_parts(parts);
        let (parts, ()) = Request::get("/b?x=1").body(()).unwrap().into_parts();
        let second = FilterableRequest::from_parts(parts);

        assert_eq!(provider.header_value(&first), provider.header_value(&second));
    }
}
