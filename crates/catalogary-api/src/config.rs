// ── Client configuration ──
//
// Describes *how* to reach one remote API. Carries the base URL, the
// versioned path prefix, credentials, and transport tuning, but never
// touches disk. `catalogary-config` builds one from a profile.

use std::time::Duration;

use crate::auth::Credentials;
use crate::transport::{ProxyConfig, TlsMode, TransportConfig};

/// Whether HTTP error statuses raise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseMode {
    /// Statuses in `[400, 600)` become [`Error::Http`](crate::Error::Http).
    #[default]
    Strict,
    /// Every response is handed back for caller inspection.
    Advanced,
}

/// Configuration for one API client. Immutable once handed to a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `https://nina.api.proxy.bund.dev/`.
    pub base_url: String,
    /// Path segment between the base URL and the version (often absent).
    pub api_root: Option<String>,
    /// Version segment. Left `None`, each API family fills in its default.
    pub api_version: Option<String>,
    pub credentials: Option<Credentials>,
    pub transport: TransportConfig,
    pub mode: ResponseMode,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_root: None,
            api_version: None,
            credentials: None,
            transport: TransportConfig::default(),
            mode: ResponseMode::Strict,
        }
    }

    pub fn api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = Some(root.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = timeout;
        self
    }

    pub fn tls(mut self, tls: TlsMode) -> Self {
        self.transport.tls = tls;
        self
    }

    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.transport.proxy = proxy;
        self
    }

    /// Return raw responses instead of raising on error statuses.
    pub fn advanced(mut self) -> Self {
        self.mode = ResponseMode::Advanced;
        self
    }

    /// Fill in the family's version default when the caller left it unset.
    pub(crate) fn with_default_version(mut self, version: &str) -> Self {
        if self.api_version.is_none() {
            self.api_version = Some(version.to_owned());
        }
        self
    }
}
