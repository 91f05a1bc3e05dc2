// Positional descriptors
//
// The UBA ships components and stations as bare JSON arrays whose meaning
// is given by offset. They are unpacked here into named records, with the
// array length checked first.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

const COMPONENT_FIELDS: usize = 5;
const STATION_FIELDS: usize = 9;

/// A measured pollutant, from a `components` entry
/// `[id, code, symbol, unit, name]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub code: String,
    pub symbol: String,
    pub unit: String,
    pub name: String,
}

impl Component {
    pub fn from_fields(key: &str, raw: &Value) -> Result<Self, Error> {
        let fields = positional("component", key, raw, COMPONENT_FIELDS)?;
        let text = |i: usize| required_text("component", key, fields, i);
        Ok(Self {
            id: text(0)?,
            code: text(1)?,
            symbol: text(2)?,
            unit: text(3)?,
            name: text(4)?,
        })
    }
}

/// The `components` listing: a `count` plus entries keyed `"1"..="count"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentCatalog {
    components: Vec<Component>,
}

impl ComponentCatalog {
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let obj = value.as_object().ok_or(Error::UnexpectedShape {
            resource: "components".into(),
            expected: "a JSON object",
        })?;
        let count = obj
            .get("count")
            .and_then(|c| {
                c.as_u64()
                    .or_else(|| c.as_str().and_then(|s| s.parse().ok()))
            })
            .ok_or(Error::MissingField {
                resource: "components",
                field: "count",
            })?;

        let components = (1..=count)
            .map(|i| {
                let key = i.to_string();
                let raw = obj.get(&key).ok_or_else(|| Error::Descriptor {
                    kind: "component",
                    key: key.clone(),
                    reason: format!("entry missing although count is {count}"),
                })?;
                Component::from_fields(&key, raw)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Keep only the listed component ids or codes.
    pub fn retain(&mut self, wanted: &[String]) {
        self.components
            .retain(|c| wanted.iter().any(|w| *w == c.id || w.eq_ignore_ascii_case(&c.code)));
    }
}

impl FromIterator<Component> for ComponentCatalog {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ComponentCatalog {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A measuring station. Offsets 0-4 identify it, 5-8 are
/// `active_from`, `active_to`, `lon`, `lat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub code: String,
    pub name: String,
    pub city: String,
    pub synonym: Option<String>,
    pub active_from: String,
    pub active_to: Option<String>,
    pub lon: f64,
    pub lat: f64,
}

impl Station {
    pub fn from_fields(key: &str, raw: &Value) -> Result<Self, Error> {
        let fields = positional("station", key, raw, STATION_FIELDS)?;
        let text = |i: usize| required_text("station", key, fields, i);
        let coord = |i: usize| coordinate(key, fields, i);
        Ok(Self {
            id: text(0)?,
            code: text(1)?,
            name: text(2)?,
            city: text(3)?,
            synonym: optional_text(fields, 4),
            active_from: text(5)?,
            active_to: optional_text(fields, 6),
            lon: coord(7)?,
            lat: coord(8)?,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active_to.is_none()
    }
}

/// Unpack a `{station_key: [...]}` object, keeping its order.
pub fn parse_stations(value: &Value) -> Result<IndexMap<String, Station>, Error> {
    let obj = value.as_object().ok_or(Error::UnexpectedShape {
        resource: "stations".into(),
        expected: "a JSON object keyed by station id",
    })?;
    obj.iter()
        .map(|(key, raw)| Ok((key.clone(), Station::from_fields(key, raw)?)))
        .collect()
}

fn positional<'v>(
    kind: &'static str,
    key: &str,
    raw: &'v Value,
    min: usize,
) -> Result<&'v [Value], Error> {
    let fields = raw.as_array().ok_or_else(|| Error::Descriptor {
        kind,
        key: key.to_owned(),
        reason: "not an array".into(),
    })?;
    if fields.len() < min {
        return Err(Error::Descriptor {
            kind,
            key: key.to_owned(),
            reason: format!("expected at least {min} fields, got {}", fields.len()),
        });
    }
    Ok(fields)
}

fn optional_text(fields: &[Value], i: usize) -> Option<String> {
    match fields.get(i)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_text(
    kind: &'static str,
    key: &str,
    fields: &[Value],
    i: usize,
) -> Result<String, Error> {
    match fields.get(i) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        other => Err(Error::Descriptor {
            kind,
            key: key.to_owned(),
            reason: format!("field {i} is not text: {}", other.unwrap_or(&Value::Null)),
        }),
    }
}

fn coordinate(key: &str, fields: &[Value], i: usize) -> Result<f64, Error> {
    let parsed = match fields.get(i) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| Error::Descriptor {
        kind: "station",
        key: key.to_owned(),
        reason: format!("field {i} is not a coordinate"),
    })
}
