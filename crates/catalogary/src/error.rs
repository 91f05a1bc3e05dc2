//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with actionable
//! help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use catalogary_api::Error as ApiError;
use catalogary_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the API: {message}")]
    #[diagnostic(
        code(catalogary::connection_failed),
        help(
            "Check network access and the base URL.\n\
             Override it with --url or the profile's `url` key."
        )
    )]
    ConnectionFailed { message: String },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(catalogary::tls_error),
        help("Use --insecure (-k) to skip verification, or set ca_cert in your profile.")
    )]
    TlsError { message: String },

    #[error("Request timed out: {message}")]
    #[diagnostic(
        code(catalogary::timeout),
        help("Increase the timeout with --timeout or the profile's `timeout` key.")
    )]
    Timeout { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(catalogary::auth_failed),
        help("Verify the credentials of the active profile (run: catalogary config show).")
    )]
    AuthFailed { message: String },

    #[error("Profile '{profile}' has incomplete credentials")]
    #[diagnostic(
        code(catalogary::incomplete_credentials),
        help("Set `password` or `password_env` next to `username`.")
    )]
    IncompleteCredentials { profile: String },

    #[error("Access denied: {message}")]
    #[diagnostic(code(catalogary::forbidden))]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(
        code(catalogary::not_found),
        help("Warning identifiers come from `catalogary warnings <source>`.")
    )]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(catalogary::api_error))]
    Api { status: u16, message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(
        code(catalogary::payload),
        help("Re-run with -vvv to log the response bodies.")
    )]
    Payload { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(catalogary::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(catalogary::profile_not_found),
        help("Available profiles: {available}\nConfig file: {path}")
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(catalogary::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(catalogary::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(catalogary::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Could not render TOML: {0}")]
    #[diagnostic(code(catalogary::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::IncompleteCredentials { .. } => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ApiError → CliError mapping ─────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Transport(ref e) if e.is_timeout() => Self::Timeout { message },
            ApiError::Transport(ref e) if e.is_connect() => Self::ConnectionFailed { message },
            ApiError::Tls(_) => Self::TlsError { message },
            ApiError::Authentication { .. } => Self::AuthFailed { message },
            ApiError::InvalidParameter { name, reason } => Self::Validation {
                field: name.into(),
                reason,
            },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },
            ApiError::Descriptor { .. }
            | ApiError::UnexpectedShape { .. }
            | ApiError::MissingField { .. }
            | ApiError::Deserialization { .. } => Self::Payload { message },
            other => match other.status() {
                Some(401) => Self::AuthFailed { message },
                Some(403) => Self::Forbidden { message },
                Some(404) => Self::NotFound { message },
                Some(status) => Self::Api { status, message },
                None => Self::ConnectionFailed { message },
            },
        }
    }
}

// ── ConfigError → CliError mapping ──────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::MissingProfile { name } => {
                let cfg = catalogary_config::load_config_or_default();
                let mut names: Vec<_> = cfg.profiles.into_keys().collect();
                names.sort();
                Self::ProfileNotFound {
                    name,
                    available: if names.is_empty() {
                        "(none)".into()
                    } else {
                        names.join(", ")
                    },
                    path: catalogary_config::config_path().display().to_string(),
                }
            }
            ConfigError::IncompleteCredentials { profile } => {
                Self::IncompleteCredentials { profile }
            }
            other => Self::Config(Box::new(other)),
        }
    }
}
