//! Command dispatch: bridges CLI args -> API clients -> output formatting.

pub mod config_cmd;
pub mod nina;
pub mod uba;

use catalogary_api::{ClientConfig, NinaClient, Response, UbaClient};
use catalogary_config::{Config, Service, profile_to_client_config};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Warnings(args) => {
            let client = NinaClient::new(client_config(cfg, Service::Nina, global)?)?;
            nina::handle_warnings(&client, args, global).await
        }
        Command::Warning(args) => {
            let client = NinaClient::new(client_config(cfg, Service::Nina, global)?)?;
            nina::handle_warning(&client, args, global).await
        }
        Command::Components(args) => {
            let client = UbaClient::new(client_config(cfg, Service::Uba, global)?)?;
            uba::handle_components(&client, args, cfg, global).await
        }
        Command::Stations(args) => {
            let client = UbaClient::new(client_config(cfg, Service::Uba, global)?)?;
            uba::handle_stations(&client, args, global).await
        }
        Command::Meta(args) => {
            let client = UbaClient::new(client_config(cfg, Service::Uba, global)?)?;
            uba::handle_meta(&client, args, cfg, global).await
        }
        Command::Measures(args) => {
            let client = UbaClient::new(client_config(cfg, Service::Uba, global)?)?;
            uba::handle_measures(&client, args, global).await
        }
        Command::Matrix(args) => {
            let client = UbaClient::new(client_config(cfg, Service::Uba, global)?)?;
            uba::handle_matrix(&client, args, cfg, global).await
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Resolve the profile for `service` and apply the CLI flag overrides.
fn client_config(
    cfg: &Config,
    service: Service,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let (name, mut profile) = cfg.profile_for(service, global.profile.as_deref())?;

    if let Some(ref url) = global.url {
        profile.url = Some(url.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    debug!(profile = %name, %service, url = profile.url(), "resolved profile");
    Ok(profile_to_client_config(&profile, &name, &cfg.defaults)?)
}

/// Raise on error statuses and collapse the body to a JSON value.
fn into_document(resp: Response) -> Result<Value, CliError> {
    resp.error_for_status()?;
    Ok(resp.into_payload().into_value())
}
