//! Config subcommand handlers.

use std::collections::BTreeMap;

use serde::Serialize;

use catalogary_config::{Config, Defaults, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

/// Config as shown to the user: profiles sorted, secrets masked.
#[derive(Serialize)]
struct Redacted<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    default_profile: Option<&'a str>,
    defaults: &'a Defaults,
    profiles: BTreeMap<&'a str, Profile>,
}

fn redact(cfg: &Config) -> Redacted<'_> {
    let mask = |s: &mut Option<String>| {
        if s.is_some() {
            *s = Some(MASK.into());
        }
    };
    let profiles = cfg
        .profiles
        .iter()
        .map(|(name, profile)| {
            let mut p = profile.clone();
            mask(&mut p.password);
            mask(&mut p.token);
            mask(&mut p.oauth2_token);
            if let Some(cookies) = p.cookies.as_mut() {
                cookies.values_mut().for_each(|v| *v = MASK.into());
            }
            (name.as_str(), p)
        })
        .collect();
    Redacted {
        default_profile: cfg.default_profile.as_deref(),
        defaults: &cfg.defaults,
        profiles,
    }
}

pub fn handle(args: &ConfigArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(
                &catalogary_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }
        ConfigCommand::Show => {
            let shown = redact(cfg);
            let out = match global.format() {
                OutputFormat::Table => toml::to_string_pretty(&shown)?,
                format => output::render_document(format, &shown)?,
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }
    }
}
