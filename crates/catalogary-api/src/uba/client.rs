// UBA air-quality API client
//
// Same shape as the NINA client: a `RestClient` carrying the UBA defaults
// (`v2`, no api root). Endpoints live in `endpoints.rs`, the matrix builds
// in `aggregate.rs`.

use crate::config::ClientConfig;
use crate::error::Error;
use crate::rest::RestClient;

/// Public proxy of the Umweltbundesamt air data service.
pub const DEFAULT_URL: &str = "https://umweltbundesamt.api.proxy.bund.dev/api/air_data/";

pub const DEFAULT_API_VERSION: &str = "v2";

/// Client for the Umweltbundesamt air-quality API.
pub struct UbaClient {
    rest: RestClient,
}

impl UbaClient {
    /// Build a client with its own session. An unset api version defaults
    /// to [`DEFAULT_API_VERSION`].
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let rest = RestClient::new(config.with_default_version(DEFAULT_API_VERSION))?;
        Ok(Self { rest })
    }

    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Result<Self, Error> {
        let rest =
            RestClient::with_client(http, config.with_default_version(DEFAULT_API_VERSION))?;
        Ok(Self { rest })
    }

    /// Client for the public proxy with default settings.
    pub fn public() -> Result<Self, Error> {
        Self::new(ClientConfig::new(DEFAULT_URL))
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }
}
