//! Warning command handlers.

use serde_json::Value;
use tabled::Tabled;

use catalogary_api::{CompositeWarning, NinaClient, Selection};

use crate::cli::{GlobalOpts, WarningArgs, WarningCommand, WarningsArgs};
use crate::error::CliError;
use crate::output;

use super::into_document;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct WarningRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Title")]
    title: String,
}

impl From<&Value> for WarningRow {
    fn from(w: &Value) -> Self {
        Self {
            id: text(w, "id"),
            severity: text(w, "severity"),
            kind: text(w, "type"),
            start: text(w, "startDate"),
            title: title(w),
        }
    }
}

#[derive(Tabled)]
struct CompositeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Sender")]
    sender: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Features")]
    features: String,
}

impl From<&CompositeWarning> for CompositeRow {
    fn from(c: &CompositeWarning) -> Self {
        let event = c
            .warning_detail
            .pointer("/info/0/event")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let features = c
            .warning_geo
            .get("features")
            .and_then(Value::as_array)
            .map(Vec::len);
        Self {
            id: text(&c.warning, "id"),
            severity: text(&c.warning, "severity"),
            sender: text(&c.warning_detail, "sender"),
            event,
            features: output::opt(features.as_ref()),
        }
    }
}

fn text(v: &Value, key: &str) -> String {
    match v.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// German title if present, else the first translation.
fn title(w: &Value) -> String {
    let Some(titles) = w.get("i18nTitle").and_then(Value::as_object) else {
        return String::new();
    };
    titles
        .get("de")
        .or_else(|| titles.values().next())
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_warnings(
    client: &NinaClient,
    args: WarningsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.complete {
        let selection = args.select.as_deref().map(Selection::parse);
        let records = client
            .complete_source(args.source, selection.as_ref())
            .await?;
        let out = output::render_list(global.format(), &records, |c| CompositeRow::from(c))?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let resp = client.warnings(args.source, args.expand.as_deref()).await?;
    let out = match into_document(resp)? {
        Value::Array(items) => {
            output::render_list(global.format(), &items, |w| WarningRow::from(w))?
        }
        other => output::render_document(global.format(), &other)?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_warning(
    client: &NinaClient,
    args: WarningArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let resp = match args.command {
        WarningCommand::Detail { id, expand } => {
            client.warning_detail(&id, expand.as_deref()).await?
        }
        WarningCommand::Geo { id, expand } => client.warning_geo(&id, expand.as_deref()).await?,
    };
    let out = output::render_document(global.format(), &into_document(resp)?)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
