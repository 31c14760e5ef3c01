//! Tower layer and builder for the header filter.

use std::sync::Arc;

use tower::Layer;

use crate::config::{ConfigHandle, FilterConfig};
use crate::error::ConfigError;
use crate::provider::{HeaderProvider, MaxAge};
use crate::service::HeaderFilterService;

/// How an injected header interacts with one already set upstream.
///
/// [`Overwrite`](Self::Overwrite) treats the filter as the single
/// authoritative source of the directive and is the default; either mode
/// never appends, so a response carries at most one value for the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Replace any existing value (the default).
    #[default]
    Overwrite,
    /// Leave a header already present on the response untouched.
    IfAbsent,
}

/// Tower [`Layer`] injecting a header into qualifying responses.
///
/// Wraps an upstream service with [`HeaderFilterService`]. Construction
/// validates the whole configuration: invalid path patterns or provider
/// preconditions fail here, before a single request is processed.
///
/// ```
/// use cacheward::{FilterConfig, HeaderFilter, MaxAge};
///
/// # fn main() -> Result<(), cacheward::ConfigError> {
/// let filter = HeaderFilter::builder()
///     .config(
///         FilterConfig::builder()
///             .pattern("/content/.*")
///             .allow_authorized(false)
///             .build(),
///     )
///     .provider(MaxAge::new(600)?)
///     .build()?;
/// # let _ = filter;
/// # Ok(())
/// # }
/// ```
pub struct HeaderFilter<H> {
    handle: ConfigHandle,
    provider: Arc<H>,
    mode: ApplyMode,
}

impl<H> Clone for HeaderFilter<H> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            provider: Arc::clone(&self.provider),
            mode: self.mode,
        }
    }
}

impl<H> HeaderFilter<H>
where
    H: HeaderProvider,
{
    /// Creates a filter from a configuration and a provider.
    pub fn new(config: FilterConfig, provider: H) -> Result<Self, ConfigError> {
        Ok(Self {
            handle: ConfigHandle::new(config)?,
            provider: Arc::new(provider),
            mode: ApplyMode::default(),
        })
    }

    /// Creates a filter sharing an existing configuration handle.
    ///
    /// Useful when several filter instances should follow the same
    /// live-updated configuration.
    pub fn with_handle(handle: ConfigHandle, provider: H) -> Self {
        Self {
            handle,
            provider: Arc::new(provider),
            mode: ApplyMode::default(),
        }
    }

    /// The handle through which the configuration can be swapped at runtime.
    pub fn config_handle(&self) -> ConfigHandle {
        self.handle.clone()
    }
}

impl HeaderFilter<MaxAge> {
    /// Creates a builder for the filter layer.
    pub fn builder() -> HeaderFilterBuilder<NotSet> {
        HeaderFilterBuilder::default()
    }
}

impl<S, H> Layer<S> for HeaderFilter<H> {
    type Service = HeaderFilterService<S, H>;

    fn layer(&self, upstream: S) -> Self::Service {
        HeaderFilterService::new(
            upstream,
            self.handle.clone(),
            Arc::clone(&self.provider),
            self.mode,
        )
    }
}

/// Marker for a builder slot that has not been filled yet.
#[derive(Debug, Default)]
pub struct NotSet;

/// Fluent builder for [`HeaderFilter`].
///
/// The provider slot is enforced at the type level: [`build`] is only
/// available once [`provider`](Self::provider) has been called.
///
/// [`build`]: HeaderFilterBuilder::build
#[derive(Debug)]
pub struct HeaderFilterBuilder<H> {
    config: FilterConfig,
    handle: Option<ConfigHandle>,
    provider: H,
    mode: ApplyMode,
}

impl Default for HeaderFilterBuilder<NotSet> {
    fn default() -> Self {
        Self {
            config: FilterConfig::default(),
            handle: None,
            provider: NotSet,
            mode: ApplyMode::default(),
        }
    }
}

impl<H> HeaderFilterBuilder<H> {
    /// Sets the filter configuration.
    ///
    /// Ignored when [`handle`](Self::handle) is also set.
    pub fn config(mut self, config: FilterConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses an existing configuration handle instead of a fresh one.
    pub fn handle(mut self, handle: ConfigHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Sets the header-value provider.
    pub fn provider<NH: HeaderProvider>(self, provider: NH) -> HeaderFilterBuilder<NH> {
        HeaderFilterBuilder {
            config: self.config,
            handle: self.handle,
            provider,
            mode: self.mode,
        }
    }

    /// Sets the injection mode for headers already present on the response.
    pub fn apply_mode(mut self, mode: ApplyMode) -> Self {
        self.mode = mode;
        self
    }
}

impl<H> HeaderFilterBuilder<H>
where
    H: HeaderProvider,
{
    /// Validates the configuration and builds the layer.
    pub fn build(self) -> Result<HeaderFilter<H>, ConfigError> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => ConfigHandle::new(self.config)?,
        };
        Ok(HeaderFilter {
            handle,
            provider: Arc::new(self.provider),
            mode: self.mode,
        })
    }
}
