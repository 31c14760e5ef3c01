use std::collections::HashSet;

use http::header::{AUTHORIZATION, COOKIE};
use http::request::Parts;
use http::{HeaderMap, HeaderValue};

use crate::query;

/// Read-only projection of an inbound request.
///
/// Owns the request head ([`Parts`]) while the decision is being made and
/// exposes exactly the facts the predicates consult: path, headers, cookies
/// and the set of query parameter names. The body is never touched; the
/// service holds it aside and reattaches it after the decision.
#[derive(Debug)]
pub struct FilterableRequest {
    parts: Parts,
}

impl FilterableRequest {
    /// Wraps a request head for predicate evaluation.
    pub fn from_parts(parts: Parts) -> Self {
        Self { parts }
    }

    /// Releases the request head so the request can be reassembled.
    pub fn into_parts(self) -> Parts {
        self.parts
    }

    /// Borrows the underlying request head.
    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    /// The request path, without query string.
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// All request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// The `Authorization` header value, if present.
    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.parts.headers.get(AUTHORIZATION)
    }

    /// Looks up a cookie by name across all `Cookie` headers.
    ///
    /// Cookie names are matched exactly; headers that are not valid UTF-8
    /// are ignored.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| {
                let (cookie_name, cookie_value) = pair.split_once('=')?;
                (cookie_name.trim() == name).then(|| cookie_value.trim())
            })
            .next()
    }

    /// Returns `true` if a cookie with the given name is present.
    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookie(name).is_some()
    }

    /// Names of the query parameters carried by the request.
    ///
    /// Extraction is lexical and total: every name present in the query
    /// string is reported, repeated names count once, and only a request
    /// without a query string has no parameters.
    pub fn param_names(&self) -> HashSet<String> {
        self.parts
            .uri
            .query()
            .map(query::names)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn view(builder: http::request::Builder) -> FilterableRequest {
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        FilterableRequest::from_parts(parts)
    }

    #[test]
    fn test_path_strips_query() {
        let request = view(Request::get("/content/site/page.html?foo=1"));
        assert_eq!(request.path(), "/content/site/page.html");
    }

    #[test]
    fn test_cookie_lookup() {
        let request = view(
            Request::get("/").header(COOKIE, "session=abc; login-token=xyz; theme=dark"),
        );
        assert_eq!(request.cookie("login-token"), Some("xyz"));
        assert_eq!(request.cookie("theme"), Some("dark"));
        assert_eq!(request.cookie("missing"), None);
    }

    #[test]
    fn test_cookie_across_multiple_headers() {
        let request = view(
            Request::get("/")
                .header(COOKIE, "a=1")
                .header(COOKIE, "authorization=token"),
        );
        assert!(request.has_cookie("authorization"));
        assert!(request.has_cookie("a"));
    }

    #[test]
    fn test_param_names() {
        let request = view(Request::get("/search?page=2&debug=1"));
        let names = request.param_names();
        assert!(names.contains("page"));
        assert!(names.contains("debug"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_repeated_param_counts_once_by_name() {
        let request = view(Request::get("/search?a=1&a=2"));
        let names = request.param_names();
        assert!(names.contains("a"));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_no_query_means_no_params() {
        let request = view(Request::get("/search"));
        assert!(request.param_names().is_empty());
    }
}
