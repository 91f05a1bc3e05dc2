//! Air-quality command handlers.

use std::time::Duration;

use serde_json::Value;
use tabled::Tabled;
use tracing::debug;

use catalogary_api::uba::{ComponentReading, parse_stations};
use catalogary_api::{
    Component, MatrixOptions, MeasureQuery, MeasurementRecord, Scope, Station, UbaClient,
};
use catalogary_config::Config;

use crate::cli::{
    ComponentsArgs, GlobalOpts, MatrixArgs, MeasuresArgs, MetaArgs, OutputFormat, StationsArgs,
};
use crate::error::CliError;
use crate::output;

use super::into_document;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Component> for ComponentRow {
    fn from(c: &Component) -> Self {
        Self {
            id: c.id.clone(),
            code: c.code.clone(),
            symbol: c.symbol.clone(),
            unit: c.unit.clone(),
            name: c.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct StationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Lon")]
    lon: f64,
    #[tabled(rename = "Lat")]
    lat: f64,
}

impl From<&Station> for StationRow {
    fn from(s: &Station) -> Self {
        Self {
            id: s.id.clone(),
            code: s.code.clone(),
            name: s.name.clone(),
            city: s.city.clone(),
            active: format!(
                "{} - {}",
                s.active_from,
                s.active_to.as_deref().unwrap_or_default()
            ),
            lon: s.lon,
            lat: s.lat,
        }
    }
}

#[derive(Tabled)]
struct MeasureRow {
    #[tabled(rename = "Station")]
    station: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

impl MeasureRow {
    fn from_reading(station: &str, timestamp: &str, reading: &ComponentReading) -> Self {
        Self {
            station: station.to_owned(),
            timestamp: timestamp.to_owned(),
            component: reading.component.code.clone(),
            value: cell(reading.value.get(2).unwrap_or(&reading.value)),
            unit: reading.component.unit.clone(),
        }
    }
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Station")]
    station: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Lon")]
    lon: String,
    #[tabled(rename = "Lat")]
    lat: String,
}

impl From<&MeasurementRecord> for RecordRow {
    fn from(r: &MeasurementRecord) -> Self {
        Self {
            station: r.station_id.clone(),
            timestamp: r.timestamp.clone(),
            component: r.component.clone(),
            scope: r.scope.clone(),
            value: cell(&r.value),
            lon: output::opt(r.lon.as_ref()),
            lat: output::opt(r.lat.as_ref()),
        }
    }
}

fn cell(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Rows of a raw `measures` document: `data` is station → timestamp → row.
fn measure_rows(doc: &Value, component: &str) -> Vec<MeasureRow> {
    let Some(stations) = doc.get("data").and_then(Value::as_object) else {
        return Vec::new();
    };
    stations
        .iter()
        .filter_map(|(station, by_time)| Some((station, by_time.as_object()?)))
        .flat_map(|(station, by_time)| {
            by_time.iter().map(move |(timestamp, row)| MeasureRow {
                station: station.clone(),
                timestamp: timestamp.clone(),
                component: component.to_owned(),
                value: cell(row.get(2).unwrap_or(row)),
                unit: String::new(),
            })
        })
        .collect()
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_components(
    client: &UbaClient,
    args: ComponentsArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let lang = args.lang.as_deref().unwrap_or(&cfg.defaults.lang);
    let catalog = client.component_catalog(Some(lang)).await?;
    let components: Vec<&Component> = catalog.iter().collect();
    let out = output::render_list(global.format(), &components, |c| ComponentRow::from(*c))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_stations(
    client: &UbaClient,
    args: StationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let doc = into_document(client.stations(args.expand.as_deref()).await?)?;
    let out = output::render_document(global.format(), &doc)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_meta(
    client: &UbaClient,
    args: MetaArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let window = args.window.window()?;
    let lang = args.lang.as_deref().unwrap_or(&cfg.defaults.lang);
    let doc = into_document(client.meta(&window, args.use_, Some(lang)).await?)?;

    let out = output::render_single(global.format(), &doc, |doc| {
        let stations = match doc.get("stations") {
            Some(raw) => parse_stations(raw)?,
            None => return Ok(String::new()),
        };
        let rows: Vec<StationRow> = stations.values().map(StationRow::from).collect();
        Ok(output::render_table(&rows))
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_measures(
    client: &UbaClient,
    args: MeasuresArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut query = MeasureQuery::new(args.window.window()?)
        .component(args.component.as_str())
        .scope(args.scope);
    if let Some(station) = args.station {
        query = query.station(station);
    }

    let doc = into_document(client.measures(&query).await?)?;
    let out = output::render_single(global.format(), &doc, |doc| {
        Ok(output::render_table(&measure_rows(doc, &args.component)))
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_matrix(
    client: &UbaClient,
    args: MatrixArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let window = args.window.window()?;
    let lang = args.lang.as_deref().unwrap_or(&cfg.defaults.lang);

    // the simple build fetches exactly one scope
    let simple_scope = match (args.full, args.scope.as_slice()) {
        (true, _) => None,
        (false, []) => Some(Scope::default()),
        (false, [scope]) => Some(*scope),
        (false, _) => {
            return Err(CliError::Validation {
                field: "scope".into(),
                reason: "pass a single scope, or --full for several".into(),
            });
        }
    };

    let mut catalog = client.component_catalog(Some(lang)).await?;
    if !args.component.is_empty() {
        catalog.retain(&args.component);
        debug!(kept = catalog.len(), "filtered component catalog");
        if catalog.is_empty() {
            return Err(CliError::Validation {
                field: "component".into(),
                reason: format!("no component matches {}", args.component.join(", ")),
            });
        }
    }

    let out = if let Some(scope) = simple_scope {
        let matrix = client
            .measures_components(&catalog, &window, scope)
            .await?;
        output::render_single(global.format(), &matrix, |m| {
            let rows: Vec<MeasureRow> = m
                .readings()
                .map(|(station, timestamp, reading)| {
                    MeasureRow::from_reading(station, timestamp, reading)
                })
                .collect();
            Ok(output::render_table(&rows))
        })?
    } else {
        let delay = if args.no_delay {
            None
        } else {
            Some(Duration::from_millis(
                args.delay_ms.unwrap_or(cfg.defaults.delay_ms),
            ))
        };
        let mut options = MatrixOptions::default().delay(delay);
        if !args.scope.is_empty() {
            options = options.scopes(args.scope.iter().copied());
        }
        options.lang = Some(lang.to_owned());

        let matrix = client
            .measurement_matrix(&catalog, &window, &options)
            .await?;
        match global.format() {
            OutputFormat::Table => {
                let rows: Vec<RecordRow> = matrix.records().iter().map(RecordRow::from).collect();
                output::render_table(&rows)
            }
            format => output::render_document(format, &matrix)?,
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
