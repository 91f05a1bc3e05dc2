//! Shared configuration for the catalogary CLI and library consumers.
//!
//! TOML profiles, credential resolution (env + plaintext), and translation
//! to `catalogary_api::ClientConfig`. Each profile targets one service; the
//! CLI picks the profile matching the command it runs.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalogary_api::{ClientConfig, CredentialSet, Credentials, ProxyConfig, TlsMode};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    MissingProfile { name: String },

    #[error("profile '{profile}' sets a username but no password")]
    IncompleteCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Services ────────────────────────────────────────────────────────

/// The remote API a profile talks to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Service {
    /// Public warnings (NINA).
    #[default]
    Nina,
    /// Air quality (Umweltbundesamt).
    Uba,
}

impl Service {
    /// Base URL of the public proxy.
    pub fn default_url(self) -> &'static str {
        match self {
            Self::Nina => catalogary_api::nina::client::DEFAULT_URL,
            Self::Uba => catalogary_api::uba::client::DEFAULT_URL,
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Pause between matrix calls in milliseconds; 0 disables pacing.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    #[serde(default = "default_lang")]
    pub lang: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            delay_ms: default_delay_ms(),
            lang: default_lang(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    75
}
fn default_delay_ms() -> u64 {
    500
}
fn default_lang() -> String {
    "en".into()
}

/// A named profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Which API this profile targets.
    #[serde(default)]
    pub service: Service,

    /// Base URL; the service's public proxy when unset.
    pub url: Option<String>,

    pub api_root: Option<String>,
    pub api_version: Option<String>,

    /// Username for basic auth.
    pub username: Option<String>,

    /// Password for basic auth (plaintext, prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Bearer token (plaintext, prefer `token_env`).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// OAuth 2 access token, sent with `oauth2_token_type`.
    pub oauth2_token: Option<String>,
    pub oauth2_token_type: Option<String>,

    /// Session cookies.
    pub cookies: Option<BTreeMap<String, String>>,

    pub proxy_http: Option<String>,
    pub proxy_https: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Return error responses instead of raising.
    #[serde(default)]
    pub advanced: bool,
}

impl Profile {
    /// A credential-less profile for the service's public proxy.
    pub fn public(service: Service) -> Self {
        Self {
            service,
            ..Self::default()
        }
    }

    pub fn url(&self) -> &str {
        self.url
            .as_deref()
            .unwrap_or_else(|| self.service.default_url())
    }
}

impl Config {
    /// Pick the profile for `service`.
    ///
    /// An explicit name must exist and target that service. Without one, the
    /// default profile is used if it fits, then the first profile (by name)
    /// for the service, then the built-in public profile.
    pub fn profile_for(
        &self,
        service: Service,
        name: Option<&str>,
    ) -> Result<(String, Profile), ConfigError> {
        if let Some(name) = name {
            let profile = self
                .profiles
                .get(name)
                .ok_or_else(|| ConfigError::MissingProfile { name: name.into() })?;
            if profile.service != service {
                return Err(ConfigError::Validation {
                    field: "service".into(),
                    reason: format!(
                        "profile '{name}' targets {}, this command needs {service}",
                        profile.service
                    ),
                });
            }
            return Ok((name.to_owned(), profile.clone()));
        }

        if let Some(ref default) = self.default_profile {
            if let Some(profile) = self.profiles.get(default).filter(|p| p.service == service) {
                return Ok((default.clone(), profile.clone()));
            }
        }

        let first = self
            .profiles
            .iter()
            .filter(|(_, p)| p.service == service)
            .min_by(|(a, _), (b, _)| a.cmp(b));
        if let Some((name, profile)) = first {
            return Ok((name.clone(), profile.clone()));
        }

        Ok((service.to_string(), Profile::public(service)))
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "catalogary", "catalogary").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("catalogary");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + `CATALOGARY_*` environment variables.
///
/// Nested keys use a double underscore, e.g. `CATALOGARY_DEFAULTS__TIMEOUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CATALOGARY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

fn secret_from(env_name: Option<&String>, plaintext: Option<&String>) -> Option<SecretString> {
    // 1. Env var named by the profile
    if let Some(val) = env_name.and_then(|name| std::env::var(name).ok()) {
        return Some(SecretString::from(val));
    }
    // 2. Plaintext in config
    plaintext.map(|s| SecretString::from(s.clone()))
}

/// Resolve a profile's credentials.
///
/// Gathers every configured input, then picks one by the fixed precedence
/// basic > token > oauth2 > cookies. `Ok(None)` means anonymous access.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<Credentials>, ConfigError> {
    let password = secret_from(profile.password_env.as_ref(), profile.password.as_ref());
    let token = secret_from(profile.token_env.as_ref(), profile.token.as_ref());

    let set = CredentialSet {
        username: profile.username.clone(),
        password,
        token,
        oauth2: profile.oauth2_token.as_ref().map(|t| {
            (
                SecretString::from(t.clone()),
                profile
                    .oauth2_token_type
                    .clone()
                    .unwrap_or_else(|| "Bearer".into()),
            )
        }),
        cookies: profile.cookies.clone().filter(|c| !c.is_empty()),
        ..CredentialSet::default()
    };

    if set.username.is_some() && set.password.is_none() {
        return Err(ConfigError::IncompleteCredentials {
            profile: profile_name.into(),
        });
    }

    Ok(set.resolve())
}

/// Build a `ClientConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url = profile.url();
    url::Url::parse(url).map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url}"),
    })?;

    for proxy in [&profile.proxy_http, &profile.proxy_https].into_iter().flatten() {
        url::Url::parse(proxy).map_err(|_| ConfigError::Validation {
            field: "proxy".into(),
            reason: format!("invalid URL: {proxy}"),
        })?;
    }

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    let mut config = ClientConfig::new(url)
        .tls(tls)
        .timeout(timeout)
        .proxy(ProxyConfig {
            http: profile.proxy_http.clone(),
            https: profile.proxy_https.clone(),
        });
    if let Some(ref root) = profile.api_root {
        config = config.api_root(root.as_str());
    }
    if let Some(ref version) = profile.api_version {
        config = config.api_version(version.as_str());
    }
    if let Some(credentials) = resolve_credentials(profile, profile_name)? {
        config = config.credentials(credentials);
    }
    if profile.advanced {
        config = config.advanced();
    }

    Ok(config)
}
