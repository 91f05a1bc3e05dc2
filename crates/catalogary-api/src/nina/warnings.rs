// NINA warning endpoints
//
// Six provider feeds share one path template (`{version}/{source}/mapData.json`);
// detail and geo documents hang off `{version}/warnings/{id}`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::nina::client::NinaClient;
use crate::resource::path_segment;
use crate::rest::{Request, Response};

/// A warning provider feed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WarningSource {
    /// Modular warning system of the federal civil protection.
    Mowas,
    /// Civil protection alerts (KATWARN).
    Katwarn,
    /// German weather service.
    Dwd,
    /// Citizen info and warning app.
    Biwapp,
    /// Police warnings.
    Police,
    /// Flood portal (Länderübergreifendes Hochwasserportal).
    Lhp,
}

impl WarningSource {
    /// Resource name under the versioned root.
    pub fn resource(self) -> &'static str {
        match self {
            Self::Mowas => "mowas",
            Self::Katwarn => "katwarn",
            Self::Dwd => "dwd",
            Self::Biwapp => "biwapp",
            Self::Police => "police",
            Self::Lhp => "lhp",
        }
    }
}

const MAP_DATA: &str = "mapData.json";
const WARNINGS: &str = "warnings";

impl NinaClient {
    /// List the current warnings of one provider.
    ///
    /// `GET {version}/{source}/mapData.json`
    pub async fn warnings(
        &self,
        source: WarningSource,
        expand: Option<&str>,
    ) -> Result<Response, Error> {
        debug!(%source, "fetching warnings");
        self.rest().request(&self.list_request(source, expand)).await
    }

    pub async fn mowas_warnings(&self, expand: Option<&str>) -> Result<Response, Error> {
        self.warnings(WarningSource::Mowas, expand).await
    }

    pub async fn katwarn_warnings(&self, expand: Option<&str>) -> Result<Response, Error> {
        self.warnings(WarningSource::Katwarn, expand).await
    }

    pub async fn dwd_warnings(&self, expand: Option<&str>) -> Result<Response, Error> {
        self.warnings(WarningSource::Dwd, expand).await
    }

    pub async fn biwapp_warnings(&self, expand: Option<&str>) -> Result<Response, Error> {
        self.warnings(WarningSource::Biwapp, expand).await
    }

    pub async fn police_warnings(&self, expand: Option<&str>) -> Result<Response, Error> {
        self.warnings(WarningSource::Police, expand).await
    }

    pub async fn lhp_warnings(&self, expand: Option<&str>) -> Result<Response, Error> {
        self.warnings(WarningSource::Lhp, expand).await
    }

    /// Full CAP document of a warning.
    ///
    /// `GET {version}/warnings/{id}.json`
    pub async fn warning_detail(&self, id: &str, expand: Option<&str>) -> Result<Response, Error> {
        debug!(id, "fetching warning detail");
        self.rest().request(&self.detail_request(id, expand)).await
    }

    /// GeoJSON feature collection of a warning.
    ///
    /// `GET {version}/warnings/{id}.geojson`
    pub async fn warning_geo(&self, id: &str, expand: Option<&str>) -> Result<Response, Error> {
        debug!(id, "fetching warning geometry");
        self.rest().request(&self.geo_request(id, expand)).await
    }

    pub(crate) fn list_request(&self, source: WarningSource, expand: Option<&str>) -> Request {
        let path = self.rest().resource(source.resource()).path_with(MAP_DATA);
        Request::get(path).param_opt("expand", expand)
    }

    pub(crate) fn detail_request(&self, id: &str, expand: Option<&str>) -> Request {
        let path = self
            .rest()
            .resource(WARNINGS)
            .path_with(&format!("{}.json", path_segment(id)));
        Request::get(path).param_opt("expand", expand)
    }

    pub(crate) fn geo_request(&self, id: &str, expand: Option<&str>) -> Request {
        let path = self
            .rest()
            .resource(WARNINGS)
            .path_with(&format!("{}.geojson", path_segment(id)));
        Request::get(path).param_opt("expand", expand)
    }
}
