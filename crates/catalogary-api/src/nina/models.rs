// NINA response contracts
//
// Typed shapes of the documents the warning endpoints return. The client
// itself hands back raw JSON; these are for consumers that want typed access
// and for conformance checks in tests. Unknown fields are rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a provider feed (`{source}/mapData.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WarningSummary {
    pub id: String,
    pub version: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_date: Option<String>,
    pub severity: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub i18n_title: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trans_keys: Option<Value>,
}

/// CAP document behind `warnings/{id}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WarningDetail {
    pub identifier: String,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub sent: String,
    pub status: String,
    pub msg_type: String,
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    pub code: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incidents: Option<String>,
    pub info: Vec<Value>,
}

/// GeoJSON feature collection behind `warnings/{id}.geojson`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarningGeo {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Value>,
}
