// Measurement matrices
//
// Two nested, insertion-ordered views over many `measures` responses:
//
// - `ComponentMatrix`:   station → timestamp → component id → reading
// - `MeasurementMatrix`: station → timestamp → component code → scope → value
//
// Both are first-write-wins: a cell that is already filled keeps its value,
// and the rejected write is counted.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::uba::descriptor::{Component, Station};
use crate::uba::scope::Scope;

/// Offset of the measured value in a `measures` data row
/// `[component, scope, value, date_end, index]`.
const VALUE_OFFSET: usize = 2;

type Cells<V> = IndexMap<String, IndexMap<String, V>>;

/// A component descriptor paired with the raw data row it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentReading {
    pub component: Component,
    pub value: Value,
}

/// station → timestamp → component id → reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentMatrix {
    #[serde(flatten)]
    cells: Cells<IndexMap<String, ComponentReading>>,
    #[serde(skip)]
    duplicates: usize,
}

impl ComponentMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reading unless the cell is taken. Returns whether it was stored.
    pub fn insert(
        &mut self,
        station: &str,
        timestamp: &str,
        component: &Component,
        value: Value,
    ) -> bool {
        let slot = self
            .cells
            .entry(station.to_owned())
            .or_default()
            .entry(timestamp.to_owned())
            .or_default()
            .entry(component.id.clone());
        match slot {
            Entry::Occupied(_) => {
                debug!(station, timestamp, component = %component.id, "duplicate reading dropped");
                self.duplicates += 1;
                false
            }
            Entry::Vacant(v) => {
                v.insert(ComponentReading {
                    component: component.clone(),
                    value,
                });
                true
            }
        }
    }

    /// Fold the `data` member of one `measures` response for `component`.
    pub fn merge(&mut self, component: &Component, data: &Value) -> Result<usize, Error> {
        let mut stored = 0;
        for (station, timestamp, row) in data_rows(data)? {
            if self.insert(station, timestamp, component, row.clone()) {
                stored += 1;
            }
        }
        Ok(stored)
    }

    pub fn get(&self, station: &str, timestamp: &str, component_id: &str) -> Option<&ComponentReading> {
        self.cells.get(station)?.get(timestamp)?.get(component_id)
    }

    pub fn stations(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn timestamps(&self, station: &str) -> impl Iterator<Item = &str> {
        self.cells
            .get(station)
            .into_iter()
            .flat_map(|by_time| by_time.keys().map(String::as_str))
    }

    /// Every stored reading as `(station, timestamp, reading)`, in insertion order.
    pub fn readings(&self) -> impl Iterator<Item = (&str, &str, &ComponentReading)> {
        self.cells.iter().flat_map(|(station, by_time)| {
            by_time.iter().flat_map(move |(timestamp, by_component)| {
                by_component
                    .values()
                    .map(move |reading| (station.as_str(), timestamp.as_str(), reading))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.cells
            .values()
            .flat_map(IndexMap::values)
            .map(IndexMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes rejected because the cell was already filled.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// station → timestamp → component code → scope label → value, plus the
/// station metadata used to annotate flattened records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasurementMatrix {
    values: Cells<IndexMap<String, IndexMap<String, Value>>>,
    stations: IndexMap<String, Station>,
    #[serde(skip)]
    duplicates: usize,
}

impl MeasurementMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the station index used for record annotations.
    pub fn with_stations(stations: IndexMap<String, Station>) -> Self {
        Self {
            stations,
            ..Self::default()
        }
    }

    pub fn stations(&self) -> &IndexMap<String, Station> {
        &self.stations
    }

    /// Store a value unless the cell is taken. Returns whether it was stored.
    pub fn insert(
        &mut self,
        station: &str,
        timestamp: &str,
        component: &str,
        scope: &str,
        value: Value,
    ) -> bool {
        let slot = self
            .values
            .entry(station.to_owned())
            .or_default()
            .entry(timestamp.to_owned())
            .or_default()
            .entry(component.to_owned())
            .or_default()
            .entry(scope.to_owned());
        match slot {
            Entry::Occupied(_) => {
                debug!(station, timestamp, component, scope, "duplicate measurement dropped");
                self.duplicates += 1;
                false
            }
            Entry::Vacant(v) => {
                v.insert(value);
                true
            }
        }
    }

    /// Fold the `data` member of one `measures` response taken for
    /// `component` at `scope`.
    pub fn merge(&mut self, component: &Component, scope: Scope, data: &Value) -> Result<usize, Error> {
        let mut stored = 0;
        for (station, timestamp, row) in data_rows(data)? {
            if self.insert(station, timestamp, &component.code, scope.label(), measured_value(row)) {
                stored += 1;
            }
        }
        Ok(stored)
    }

    pub fn get(&self, station: &str, timestamp: &str, component: &str, scope: &str) -> Option<&Value> {
        self.values
            .get(station)?
            .get(timestamp)?
            .get(component)?
            .get(scope)
    }

    pub fn len(&self) -> usize {
        self.values
            .values()
            .flat_map(IndexMap::values)
            .flat_map(IndexMap::values)
            .map(IndexMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Flatten into one record per cell, in insertion order.
    pub fn records(&self) -> Vec<MeasurementRecord> {
        let mut out = Vec::with_capacity(self.len());
        for (station_id, by_time) in &self.values {
            let station = self.stations.get(station_id);
            for (timestamp, by_component) in by_time {
                for (component, by_scope) in by_component {
                    for (scope, value) in by_scope {
                        out.push(MeasurementRecord {
                            station_id: station_id.clone(),
                            timestamp: timestamp.clone(),
                            component: component.clone(),
                            scope: scope.clone(),
                            value: value.clone(),
                            active_from: station.map(|s| s.active_from.clone()),
                            active_to: station.and_then(|s| s.active_to.clone()),
                            lon: station.map(|s| s.lon),
                            lat: station.map(|s| s.lat),
                        });
                    }
                }
            }
        }
        out
    }
}

/// One flattened matrix cell, annotated with its station's active range and
/// coordinates when the station is known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRecord {
    pub station_id: String,
    pub timestamp: String,
    pub component: String,
    pub scope: String,
    pub value: Value,
    pub active_from: Option<String>,
    pub active_to: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

/// Walk `station → timestamp → row` in a `measures` `data` member. The API
/// sends `[]` instead of `{}` when nothing matched.
fn data_rows(data: &Value) -> Result<Vec<(&str, &str, &Value)>, Error> {
    let stations = match data {
        Value::Object(map) => map,
        _ if data.is_null() || data.as_array().is_some_and(Vec::is_empty) => {
            return Ok(Vec::new());
        }
        _ => {
            return Err(Error::UnexpectedShape {
                resource: "measures".into(),
                expected: "a data object keyed by station",
            });
        }
    };

    let mut rows = Vec::new();
    for (station, by_time) in stations {
        let by_time: &Map<String, Value> = match by_time {
            Value::Object(map) => map,
            Value::Array(items) if items.is_empty() => continue,
            _ => {
                return Err(Error::UnexpectedShape {
                    resource: format!("measures/{station}"),
                    expected: "an object keyed by timestamp",
                });
            }
        };
        rows.extend(
            by_time
                .iter()
                .map(|(ts, row)| (station.as_str(), ts.as_str(), row)),
        );
    }
    Ok(rows)
}

fn measured_value(row: &Value) -> Value {
    match row {
        Value::Array(fields) if fields.len() > VALUE_OFFSET => fields[VALUE_OFFSET].clone(),
        other => other.clone(),
    }
}
