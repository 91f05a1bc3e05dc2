// UBA endpoints
//
// Every resource is served as `{version}/{name}/json`. Typed helpers on top
// (`component_catalog`, `station_index`) always run strict, since they need
// a well-formed body to unpack.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::rest::{Payload, Request, Response};
use crate::uba::client::UbaClient;
use crate::uba::descriptor::{ComponentCatalog, Station, parse_stations};
use crate::uba::query::{MeasureQuery, TimeWindow};

const JSON: &str = "json";
const DEFAULT_LANG: &str = "en";

/// Which data set the `meta` endpoint describes.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MetaUse {
    /// Stations and components with limit-value exceedances.
    #[default]
    Transgression,
    /// Stations and components with measurements.
    Measure,
    /// Stations and components with air-quality index values.
    Airquality,
    /// Annual balances.
    Annualbalance,
}

impl UbaClient {
    /// Measurements of one component at one scope.
    ///
    /// `GET {version}/measures/json`
    pub async fn measures(&self, query: &MeasureQuery) -> Result<Response, Error> {
        self.rest().request(&self.measures_request(query)).await
    }

    /// All measurable components.
    ///
    /// `GET {version}/components/json?lang=..` (default `en`)
    pub async fn components(&self, lang: Option<&str>) -> Result<Response, Error> {
        self.rest().request(&self.components_request(lang)).await
    }

    /// Station and component metadata for a window.
    ///
    /// `GET {version}/meta/json`
    pub async fn meta(
        &self,
        window: &TimeWindow,
        use_: MetaUse,
        lang: Option<&str>,
    ) -> Result<Response, Error> {
        self.rest()
            .request(&self.meta_request(window, use_, lang))
            .await
    }

    /// All measuring stations.
    ///
    /// `GET {version}/stations/json`
    pub async fn stations(&self, expand: Option<&str>) -> Result<Response, Error> {
        let path = self.rest().resource("stations").path_with(JSON);
        self.rest()
            .request(&Request::get(path).param_opt("expand", expand))
            .await
    }

    /// Fetch and unpack the component listing.
    pub async fn component_catalog(&self, lang: Option<&str>) -> Result<ComponentCatalog, Error> {
        let payload = self
            .rest()
            .request(&self.components_request(lang).strict())
            .await?
            .into_payload();
        let catalog = ComponentCatalog::from_value(&require_json("components", payload)?)?;
        debug!(count = catalog.len(), "component catalog loaded");
        Ok(catalog)
    }

    /// Fetch `meta` and unpack its `stations` member.
    pub async fn station_index(
        &self,
        window: &TimeWindow,
        use_: MetaUse,
        lang: Option<&str>,
    ) -> Result<IndexMap<String, Station>, Error> {
        let payload = self
            .rest()
            .request(&self.meta_request(window, use_, lang).strict())
            .await?
            .into_payload();
        let meta = require_json("meta", payload)?;
        let stations = meta.get("stations").ok_or(Error::MissingField {
            resource: "meta",
            field: "stations",
        })?;
        let index = parse_stations(stations)?;
        debug!(count = index.len(), "station index loaded");
        Ok(index)
    }

    pub(crate) fn measures_request(&self, query: &MeasureQuery) -> Request {
        let path = self.rest().resource("measures").path_with(JSON);
        let mut req = Request::get(path);
        for (key, value) in query.window.params() {
            req = req.param(key, value);
        }
        req.param("component", query.component.as_str())
            .param("scope", query.scope.code())
            .param_opt("station", query.station.as_deref())
    }

    fn components_request(&self, lang: Option<&str>) -> Request {
        let path = self.rest().resource("components").path_with(JSON);
        Request::get(path).param("lang", lang.unwrap_or(DEFAULT_LANG))
    }

    fn meta_request(&self, window: &TimeWindow, use_: MetaUse, lang: Option<&str>) -> Request {
        let path = self.rest().resource("meta").path_with(JSON);
        let mut req = Request::get(path).param("use", use_.as_ref());
        for (key, value) in window.params() {
            req = req.param(key, value);
        }
        req.param("lang", lang.unwrap_or(DEFAULT_LANG))
    }
}

/// Unwrap a payload that must be JSON.
pub(crate) fn require_json(resource: &str, payload: Payload) -> Result<Value, Error> {
    payload.into_json().ok_or_else(|| Error::UnexpectedShape {
        resource: resource.to_owned(),
        expected: "a JSON document",
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ClientConfig;
    use crate::uba::scope::Scope;

    fn client() -> UbaClient {
        UbaClient::with_client(reqwest::Client::new(), ClientConfig::new("https://uba.test/api/air_data/"))
            .expect("valid config")
    }

    #[test]
    fn measures_url_carries_all_filters_in_order() {
        let c = client();
        let window = TimeWindow::parse("2026-10-01").expect("valid date");
        let query = MeasureQuery::new(window)
            .component("5")
            .scope(Scope::DailyMean)
            .station("1146");
        assert_eq!(
            c.rest().url_for(&c.measures_request(&query)),
            "https://uba.test/api/air_data/v2/measures/json?date_from=2026-10-01&time_from=24\
             &date_to=2999-12-31&time_to=24&component=5&scope=1&station=1146"
        );
    }

    #[test]
    fn station_filter_is_omitted_when_absent() {
        let c = client();
        let query = MeasureQuery::new(TimeWindow::parse("2026-10-01").expect("valid date"));
        assert!(!c.rest().url_for(&c.measures_request(&query)).contains("station"));
    }

    #[test]
    fn meta_defaults_to_transgression_in_english() {
        let c = client();
        let window = TimeWindow::parse("2026-10-01").expect("valid date");
        let url = c.rest().url_for(&c.meta_request(&window, MetaUse::default(), None));
        assert!(url.starts_with("https://uba.test/api/air_data/v2/meta/json?use=transgression&"));
        assert!(url.ends_with("&lang=en"));
    }
}
