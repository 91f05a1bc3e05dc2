// Credential strategies
//
// Exactly one strategy is active per client. It is chosen once, when the
// client is built, and applied by the request engine to every outgoing call.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;

use crate::error::Error;

/// A pluggable token exchange (OAuth 1 two/three-legged flows, Kerberos/SPNEGO).
///
/// The exchange runs once at client construction and yields the full
/// `Authorization` header value (e.g. `"OAuth oauth_token=..."` or
/// `"Negotiate YII..."`), which is then attached to every request.
pub trait TokenExchange: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Produce the `Authorization` header value.
    fn authorization(&self) -> Result<SecretString, Error>;
}

/// Which credential strategy a client uses.
///
/// Marker enum (no data) -- useful for logging and branching without
/// carrying secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    Basic,
    Bearer,
    OAuth,
    OAuth2,
    Kerberos,
    Cookies,
}

/// Credentials for a remote API.
///
/// Each variant carries the secret material needed for its flow.
#[derive(Clone)]
pub enum Credentials {
    /// HTTP basic auth.
    Basic {
        username: String,
        password: SecretString,
    },
    /// Personal access / bearer token.
    Bearer { token: SecretString },
    /// OAuth 1 token exchange.
    OAuth(Arc<dyn TokenExchange>),
    /// OAuth 2 access token, sent with its token type (usually `Bearer`).
    OAuth2 {
        access_token: SecretString,
        token_type: String,
    },
    /// Kerberos / SPNEGO negotiation.
    Kerberos(Arc<dyn TokenExchange>),
    /// Cookies preloaded into the session jar.
    Cookies(BTreeMap<String, String>),
}

impl Credentials {
    pub fn strategy(&self) -> AuthStrategy {
        match self {
            Self::Basic { .. } => AuthStrategy::Basic,
            Self::Bearer { .. } => AuthStrategy::Bearer,
            Self::OAuth(_) => AuthStrategy::OAuth,
            Self::OAuth2 { .. } => AuthStrategy::OAuth2,
            Self::Kerberos(_) => AuthStrategy::Kerberos,
            Self::Cookies(_) => AuthStrategy::Cookies,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Bearer { .. } => f.write_str("Bearer(..)"),
            Self::OAuth(x) => write!(f, "OAuth({})", x.name()),
            Self::OAuth2 { token_type, .. } => f
                .debug_struct("OAuth2")
                .field("token_type", token_type)
                .finish_non_exhaustive(),
            Self::Kerberos(x) => write!(f, "Kerberos({})", x.name()),
            Self::Cookies(c) => f
                .debug_tuple("Cookies")
                .field(&c.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Every credential input a caller may supply, before selection.
///
/// [`resolve`](Self::resolve) picks exactly one in fixed precedence:
/// basic > token > oauth > oauth2 > kerberos > cookies. Basic auth requires
/// both username and password; a lone username is ignored.
#[derive(Default, Clone)]
pub struct CredentialSet {
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub token: Option<SecretString>,
    pub oauth: Option<Arc<dyn TokenExchange>>,
    pub oauth2: Option<(SecretString, String)>,
    pub kerberos: Option<Arc<dyn TokenExchange>>,
    pub cookies: Option<BTreeMap<String, String>>,
}

impl CredentialSet {
    pub fn resolve(self) -> Option<Credentials> {
        if let (Some(username), Some(password)) = (self.username, self.password) {
            return Some(Credentials::Basic { username, password });
        }
        if let Some(token) = self.token {
            return Some(Credentials::Bearer { token });
        }
        if let Some(x) = self.oauth {
            return Some(Credentials::OAuth(x));
        }
        if let Some((access_token, token_type)) = self.oauth2 {
            return Some(Credentials::OAuth2 {
                access_token,
                token_type,
            });
        }
        if let Some(x) = self.kerberos {
            return Some(Credentials::Kerberos(x));
        }
        self.cookies.map(Credentials::Cookies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl TokenExchange for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn authorization(&self) -> Result<SecretString, Error> {
            Ok(SecretString::from("Negotiate abc"))
        }
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    #[test]
    fn basic_wins_over_everything() {
        let set = CredentialSet {
            username: Some("alice".into()),
            password: Some(secret("pw")),
            token: Some(secret("tok")),
            cookies: Some(BTreeMap::from([("a".into(), "b".into())])),
            ..CredentialSet::default()
        };
        assert_eq!(set.resolve().map(|c| c.strategy()), Some(AuthStrategy::Basic));
    }

    #[test]
    fn username_without_password_falls_through() {
        let set = CredentialSet {
            username: Some("alice".into()),
            token: Some(secret("tok")),
            ..CredentialSet::default()
        };
        assert_eq!(set.resolve().map(|c| c.strategy()), Some(AuthStrategy::Bearer));
    }

    #[test]
    fn oauth_precedes_oauth2_and_kerberos() {
        let set = CredentialSet {
            oauth: Some(Arc::new(Fixed)),
            oauth2: Some((secret("at"), "Bearer".into())),
            kerberos: Some(Arc::new(Fixed)),
            ..CredentialSet::default()
        };
        assert_eq!(set.resolve().map(|c| c.strategy()), Some(AuthStrategy::OAuth));

        let set = CredentialSet {
            oauth2: Some((secret("at"), "Bearer".into())),
            kerberos: Some(Arc::new(Fixed)),
            ..CredentialSet::default()
        };
        assert_eq!(set.resolve().map(|c| c.strategy()), Some(AuthStrategy::OAuth2));
    }

    #[test]
    fn cookies_are_the_last_resort() {
        let set = CredentialSet {
            cookies: Some(BTreeMap::from([("session".into(), "1".into())])),
            ..CredentialSet::default()
        };
        assert_eq!(set.resolve().map(|c| c.strategy()), Some(AuthStrategy::Cookies));
        assert!(CredentialSet::default().resolve().is_none());
    }

    #[test]
    fn debug_never_prints_secrets() {
        let creds = Credentials::Basic {
            username: "alice".into(),
            password: secret("hunter2"),
        };
        let out = format!("{creds:?}");
        assert!(out.contains("alice"));
        assert!(!out.contains("hunter2"));
    }
}
