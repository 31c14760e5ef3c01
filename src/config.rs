//! Filter configuration and predicate chain assembly.
//!
//! [`FilterConfig`] is the immutable configuration bundle an operator
//! supplies; [`FilterConfig::compile`] turns it into the predicate chain the
//! service evaluates per request. [`ConfigHandle`] wraps a compiled snapshot
//! behind an atomic swap so configuration can be replaced at runtime without
//! in-flight requests ever observing a partially updated state.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::predicate::{Predicate, PredicateExt};
use crate::predicates::{Authorized, ParamsMode, ParamsPredicate, Path};
use crate::request::FilterableRequest;

/// Arc'd type-erased predicate over request views.
pub type ArcPredicate = Arc<dyn Predicate<Subject = FilterableRequest> + Send + Sync>;

/// Boxed type-erased predicate over request views.
pub type BoxPredicate = Box<dyn Predicate<Subject = FilterableRequest> + Send + Sync>;

/// Immutable configuration bundle for one filter instance.
///
/// Field semantics mirror the decision rules:
///
/// - `patterns`: path patterns the request must match (empty means every
///   path matches); anchored regular expressions, validated at activation.
/// - `allow_authorized`: when `false`, requests carrying authentication
///   evidence are skipped.
/// - `allow_all_params` selects the parameter mode: `true` uses
///   `block_params` as a deny-list, `false` uses `pass_through_params` as an
///   allow-list. The list belonging to the inactive mode is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Path patterns; any match qualifies the request.
    pub patterns: Vec<String>,
    /// Whether authenticated requests may receive the header.
    pub allow_authorized: bool,
    /// Selects deny-list (`true`) or allow-list (`false`) parameter mode.
    pub allow_all_params: bool,
    /// Parameter names that disqualify a request in deny-list mode.
    pub block_params: HashSet<String>,
    /// Parameter names permitted in allow-list mode.
    pub pass_through_params: HashSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            allow_authorized: true,
            allow_all_params: false,
            block_params: HashSet::new(),
            pass_through_params: HashSet::new(),
        }
    }
}

impl FilterConfig {
    /// Creates a builder with the default configuration.
    pub fn builder() -> FilterConfigBuilder {
        FilterConfigBuilder::default()
    }

    /// The parameter mode selected by `allow_all_params`.
    pub fn params_mode(&self) -> ParamsMode {
        if self.allow_all_params {
            ParamsMode::DenyListed(self.block_params.clone())
        } else {
            ParamsMode::AllowListed(self.pass_through_params.clone())
        }
    }

    /// Compiles the configuration into the decision predicate chain.
    ///
    /// Evaluation order is path, then the authentication gate (only present
    /// when `allow_authorized` is `false`), then the parameter policy, each
    /// short-circuiting on the first skip. Invalid pattern syntax fails
    /// here, before the filter sees any request.
    pub fn compile(&self) -> Result<ArcPredicate, ConfigError> {
        let path = Path::try_new(&self.patterns)?;
        let gated: BoxPredicate = if self.allow_authorized {
            path.boxed()
        } else {
            path.and(Authorized::new().not()).boxed()
        };
        Ok(Arc::new(gated.params(self.params_mode())))
    }
}

/// Fluent builder for [`FilterConfig`].
#[derive(Debug, Default)]
pub struct FilterConfigBuilder {
    config: FilterConfig,
}

impl FilterConfigBuilder {
    /// Adds a single path pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.patterns.push(pattern.into());
        self
    }

    /// Adds several path patterns.
    pub fn patterns<I>(mut self, patterns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.config
            .patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets whether authenticated requests may receive the header.
    pub fn allow_authorized(mut self, allow: bool) -> Self {
        self.config.allow_authorized = allow;
        self
    }

    /// Selects deny-list (`true`) or allow-list (`false`) parameter mode.
    pub fn allow_all_params(mut self, allow: bool) -> Self {
        self.config.allow_all_params = allow;
        self
    }

    /// Adds a parameter name to the deny-list.
    pub fn block_param(mut self, name: impl Into<String>) -> Self {
        self.config.block_params.insert(name.into());
        self
    }

    /// Adds a parameter name to the allow-list.
    pub fn pass_through_param(mut self, name: impl Into<String>) -> Self {
        self.config.pass_through_params.insert(name.into());
        self
    }

    /// Finalizes the configuration.
    pub fn build(self) -> FilterConfig {
        self.config
    }
}

/// A compiled configuration snapshot.
///
/// Pairs the raw [`FilterConfig`] with its compiled predicate chain so a
/// request evaluated against a snapshot sees one consistent configuration
/// from start to finish.
pub struct ConfigSnapshot {
    config: FilterConfig,
    predicate: ArcPredicate,
}

impl ConfigSnapshot {
    fn from_config(config: FilterConfig) -> Result<Self, ConfigError> {
        let predicate = config.compile()?;
        Ok(Self { config, predicate })
    }

    /// The configuration this snapshot was compiled from.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// The compiled predicate chain.
    pub fn predicate(&self) -> ArcPredicate {
        Arc::clone(&self.predicate)
    }
}

impl Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSnapshot")
            .field("config", &self.config)
            .field("predicate", &"...")
            .finish()
    }
}

/// Atomically swappable configuration reference.
///
/// Single writer, many readers: [`store`](Self::store) compiles the new
/// configuration first and swaps the snapshot only on success, so a failed
/// update leaves the previous configuration serving. Requests that already
/// loaded a snapshot keep using it until their decision completes.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<ConfigSnapshot>>,
}

impl ConfigHandle {
    /// Compiles the configuration and creates the handle.
    pub fn new(config: FilterConfig) -> Result<Self, ConfigError> {
        let snapshot = ConfigSnapshot::from_config(config)?;
        Ok(Self {
            inner: Arc::new(ArcSwap::from_pointee(snapshot)),
        })
    }

    /// Replaces the active configuration.
    ///
    /// Compilation errors leave the current snapshot untouched.
    pub fn store(&self, config: FilterConfig) -> Result<(), ConfigError> {
        let snapshot = ConfigSnapshot::from_config(config)?;
        self.inner.store(Arc::new(snapshot));
        Ok(())
    }

    /// Loads the current snapshot for one request's evaluation.
    pub fn load(&self) -> Arc<ConfigSnapshot> {
        self.inner.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;
    use http::header::AUTHORIZATION;
    use pretty_assertions::assert_eq;

    fn view(builder: http::request::Builder) -> FilterableRequest {
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        FilterableRequest::from_parts(parts)
    }

    #[test]
    fn test_defaults_match_conservative_policy() {
        let config = FilterConfig::default();
        assert!(config.allow_authorized);
        assert!(!config.allow_all_params);
        assert!(config.patterns.is_empty());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: FilterConfig =
            serde_json::from_str(r#"{"patterns": ["/content/.*"]}"#).unwrap();
        let expected = FilterConfig::builder().pattern("/content/.*").build();
        assert_eq!(config, expected);
    }

    #[test]
    fn test_invalid_pattern_fails_compile() {
        let config = FilterConfig::builder().pattern("/content/[").build();
        assert!(matches!(
            config.compile(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[tokio::test]
    async fn test_path_mismatch_skips_before_other_checks() {
        let config = FilterConfig::builder()
            .pattern("/content/.*")
            .allow_authorized(false)
            .build();
        let predicate = config.compile().unwrap();

        let request = view(Request::get("/etc/foo").header(AUTHORIZATION, "Bearer x"));
        assert!(!predicate.check(request).await.is_apply());
    }

    #[tokio::test]
    async fn test_auth_gate_present_only_when_disallowed() {
        let authed = || view(Request::get("/content/a").header(AUTHORIZATION, "Bearer x"));

        let lenient = FilterConfig::builder()
            .pattern("/content/.*")
            .allow_authorized(true)
            .build()
            .compile()
            .unwrap();
        assert!(lenient.check(authed()).await.is_apply());

        let strict = FilterConfig::builder()
            .pattern("/content/.*")
            .allow_authorized(false)
            .build()
            .compile()
            .unwrap();
        assert!(!strict.check(authed()).await.is_apply());
    }

    #[tokio::test]
    async fn test_handle_store_swaps_behavior() {
        let handle = ConfigHandle::new(
            FilterConfig::builder().pattern("/content/.*").build(),
        )
        .unwrap();

        let before = handle.load();
        assert!(
            before
                .predicate()
                .check(view(Request::get("/content/a")))
                .await
                .is_apply()
        );

        handle
            .store(FilterConfig::builder().pattern("/apps/.*").build())
            .unwrap();

        let after = handle.load();
        assert!(
            !after
                .predicate()
                .check(view(Request::get("/content/a")))
                .await
                .is_apply()
        );
        // The earlier snapshot is unaffected by the swap
        assert!(
            before
                .predicate()
                .check(view(Request::get("/content/a")))
                .await
                .is_apply()
        );
    }

    #[test]
    fn test_store_rejects_invalid_config_and_keeps_current() {
        let handle = ConfigHandle::new(
            FilterConfig::builder().pattern("/content/.*").build(),
        )
        .unwrap();

        let result = handle.store(FilterConfig::builder().pattern("(").build());
        assert!(result.is_err());
        assert_eq!(handle.load().config().patterns, vec!["/content/.*"]);
    }
}
