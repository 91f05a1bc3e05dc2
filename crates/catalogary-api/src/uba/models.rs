// UBA response contracts
//
// Envelope shapes of the four endpoints. The client returns raw JSON; these
// exist for consumers and conformance tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `measures/json`. `data` is an object keyed by station, or `[]` when
/// nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeasuresEnvelope {
    pub request: Map<String, Value>,
    pub indices: Value,
    pub data: Value,
}

/// `components/json`: `count`, `indices`, and one positional entry per
/// component keyed `"1"..`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentsEnvelope {
    pub count: u64,
    pub indices: Vec<Value>,
    #[serde(flatten)]
    pub entries: BTreeMap<String, Value>,
}

/// `meta/json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaEnvelope {
    pub components: Value,
    pub networks: Map<String, Value>,
    pub stations: Map<String, Value>,
    pub request: Map<String, Value>,
    pub indices: Map<String, Value>,
}

/// `stations/json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationsEnvelope {
    pub request: Map<String, Value>,
    pub indices: Vec<Value>,
    pub data: Map<String, Value>,
    pub count: u64,
}
