// NINA API client
//
// Thin wrapper over the request engine with the NINA defaults (`api31`, no
// api root). Endpoint methods live in `warnings.rs`; the composite join in
// `complete.rs`.

use crate::config::ClientConfig;
use crate::error::Error;
use crate::rest::RestClient;

/// Public proxy of the federal warning app backend.
pub const DEFAULT_URL: &str = "https://nina.api.proxy.bund.dev/";

pub const DEFAULT_API_VERSION: &str = "api31";

/// Client for the NINA public-warning API.
pub struct NinaClient {
    rest: RestClient,
}

impl NinaClient {
    /// Build a client with its own session. An unset api version defaults
    /// to [`DEFAULT_API_VERSION`].
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let rest = RestClient::new(config.with_default_version(DEFAULT_API_VERSION))?;
        Ok(Self { rest })
    }

    /// Build a client around a caller-managed `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Result<Self, Error> {
        let rest =
            RestClient::with_client(http, config.with_default_version(DEFAULT_API_VERSION))?;
        Ok(Self { rest })
    }

    /// Client for the public proxy with default settings.
    pub fn public() -> Result<Self, Error> {
        Self::new(ClientConfig::new(DEFAULT_URL))
    }

    /// The request engine, for calls not covered by a typed method.
    pub fn rest(&self) -> &RestClient {
        &self.rest
    }
}
