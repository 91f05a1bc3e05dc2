// Composite warning join
//
// A feed lists warning summaries; the detail (CAP) and geometry documents
// must be fetched one by one with the summary `id`, since the detail is keyed
// by its own `identifier`. The join issues two calls per summary, strictly in
// sequence, and keeps the input order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::Error;
use crate::nina::client::NinaClient;
use crate::nina::warnings::WarningSource;
use crate::rest::Payload;

/// A top-level field selection applied to each part of a composite record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated field list, ignoring blanks.
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|f| f == field)
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Keep the selected keys of a JSON object, in source order.
    ///
    /// Anything but an object is rejected.
    pub fn project(&self, part: &'static str, value: &Value) -> Result<Value, Error> {
        match value {
            Value::Object(obj) => Ok(Value::Object(self.filter(obj))),
            _ => Err(Error::UnexpectedShape {
                resource: part.into(),
                expected: "a JSON object",
            }),
        }
    }

    /// Like [`project`](Self::project), but a missing or non-object document
    /// projects to an empty object instead of failing.
    pub fn project_lenient(&self, value: &Value) -> Value {
        Value::Object(value.as_object().map(|obj| self.filter(obj)).unwrap_or_default())
    }

    fn filter(&self, obj: &Map<String, Value>) -> Map<String, Value> {
        obj.iter()
            .filter(|(k, _)| self.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// One warning joined with its detail and geometry documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeWarning {
    pub warning: Value,
    pub warning_detail: Value,
    pub warning_geo: Value,
}

impl NinaClient {
    /// Join each summary with its detail and geometry documents.
    ///
    /// Issues exactly two calls per summary and returns one record per
    /// summary, in input order, without deduplication. With a selection, the
    /// summary and detail are projected strictly (they must be objects) and
    /// the geometry leniently. Any failed call aborts the whole join.
    pub async fn generic_complete(
        &self,
        warnings: &[Value],
        selection: Option<&Selection>,
    ) -> Result<Vec<CompositeWarning>, Error> {
        info!(count = warnings.len(), "completing warnings");
        let mut out = Vec::with_capacity(warnings.len());

        for warning in warnings {
            let id = warning
                .get("id")
                .and_then(Value::as_str)
                .ok_or(Error::MissingField {
                    resource: "warning summary",
                    field: "id",
                })?;

            let detail = self
                .rest()
                .request(&self.detail_request(id, None).strict())
                .await?
                .into_payload()
                .into_value();
            let geo = self
                .rest()
                .request(&self.geo_request(id, None).strict())
                .await?
                .into_payload()
                .into_value();
            debug!(id, "joined warning");

            let record = match selection {
                None => CompositeWarning {
                    warning: warning.clone(),
                    warning_detail: detail,
                    warning_geo: geo,
                },
                Some(sel) => CompositeWarning {
                    warning: sel.project("warning", warning)?,
                    warning_detail: sel.project("warning_detail", &detail)?,
                    warning_geo: sel.project_lenient(&geo),
                },
            };
            out.push(record);
        }

        Ok(out)
    }

    /// Fetch a provider feed and complete every warning in it.
    pub async fn complete_source(
        &self,
        source: WarningSource,
        selection: Option<&Selection>,
    ) -> Result<Vec<CompositeWarning>, Error> {
        let list = self
            .rest()
            .request(&self.list_request(source, None).strict())
            .await?
            .into_payload();

        let warnings = match list {
            Payload::Empty => Vec::new(),
            Payload::Json(Value::Array(items)) => items,
            _ => {
                return Err(Error::UnexpectedShape {
                    resource: source.to_string(),
                    expected: "a JSON array of warnings",
                });
            }
        };

        self.generic_complete(&warnings, selection).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_trims_and_skips_blanks() {
        let sel = Selection::parse(" id, severity,,info ");
        assert_eq!(sel.fields(), ["id", "severity", "info"]);
    }

    #[test]
    fn projection_keeps_only_selected_existing_keys() {
        let sel = Selection::new(["id", "severity", "features"]);
        let summary = json!({"id": "a", "version": 2, "severity": "Minor"});
        let projected = sel.project("warning", &summary).ok();
        assert_eq!(projected, Some(json!({"id": "a", "severity": "Minor"})));
    }

    #[test]
    fn projection_preserves_source_order() {
        let sel = Selection::new(["b", "a"]);
        let projected = sel.project("warning", &json!({"a": 1, "b": 2})).ok();
        let keys: Vec<String> = projected
            .as_ref()
            .and_then(Value::as_object)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn strict_projection_rejects_non_objects() {
        let sel = Selection::new(["id"]);
        assert!(matches!(
            sel.project("warning_detail", &Value::Null),
            Err(Error::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn lenient_projection_tolerates_missing_documents() {
        let sel = Selection::new(["features"]);
        assert_eq!(sel.project_lenient(&Value::Null), json!({}));
        assert_eq!(
            sel.project_lenient(&json!({"type": "FeatureCollection", "features": []})),
            json!({"features": []})
        );
    }
}
