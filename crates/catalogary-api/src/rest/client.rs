// Request engine
//
// Wraps `reqwest::Client` with URL assembly, credential decoration, and the
// error-status policy shared by every resource client. Resource modules
// (`nina`, `uba`) only build `Request` values and hand them here.

use std::collections::BTreeMap;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::config::{ClientConfig, ResponseMode};
use crate::error::Error;
use crate::resource::{Resource, append_query, url_joiner};
use crate::rest::request::{Body, Request};
use crate::rest::response::Response;

/// How the selected credential decorates each outgoing request.
///
/// Resolved once at construction. Cookie credentials given to a fresh client
/// go into its jar for the base host and ride as a header everywhere else.
enum SessionAuth {
    None,
    Jar {
        host: Option<String>,
        cookie: HeaderValue,
    },
    Basic {
        username: String,
        password: SecretString,
    },
    Bearer(SecretString),
    Header(HeaderValue),
    Cookie(HeaderValue),
}

/// Shared HTTP engine for both API families.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_root: Option<String>,
    api_version: Option<String>,
    mode: ResponseMode,
    auth: SessionAuth,
}

impl RestClient {
    /// Build a client and its own session from a `ClientConfig`.
    ///
    /// Cookie credentials are loaded into a fresh jar for the base URL, so
    /// cookies the server sets alongside them are kept. Absolute requests to
    /// another host get the credential cookies as a `Cookie` header.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let base = Url::parse(&config.base_url)?;

        let mut transport = config.transport.clone();
        let auth = match config.credentials {
            Some(Credentials::Cookies(ref cookies)) => {
                transport = transport.with_cookie_jar();
                if let Some(ref jar) = transport.cookie_jar {
                    for (name, value) in cookies {
                        jar.add_cookie_str(&format!("{name}={value}"), &base);
                    }
                }
                debug!(count = cookies.len(), "loaded session cookies");
                SessionAuth::Jar {
                    host: base.host_str().map(str::to_owned),
                    cookie: cookie_header(cookies)?,
                }
            }
            Some(ref creds) => session_auth(creds)?,
            None => SessionAuth::None,
        };

        let http = transport.build_client(HeaderMap::new())?;
        Ok(Self::assemble(http, config, auth))
    }

    /// Wrap a caller-managed `reqwest::Client`.
    ///
    /// Credentials from the config are still applied; cookies are sent as a
    /// `Cookie` header since the caller's jar is out of reach.
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Result<Self, Error> {
        Url::parse(&config.base_url)?;
        let auth = match config.credentials {
            Some(ref creds) => session_auth(creds)?,
            None => SessionAuth::None,
        };
        Ok(Self::assemble(http, config, auth))
    }

    fn assemble(http: reqwest::Client, config: ClientConfig, auth: SessionAuth) -> Self {
        Self {
            http,
            base_url: config.base_url,
            api_root: config.api_root,
            api_version: config.api_version,
            mode: config.mode,
            auth,
        }
    }

    /// The underlying HTTP session.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_root(&self) -> Option<&str> {
        self.api_root.as_deref()
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Descriptor for `name` under this client's root and version.
    pub fn resource<'a>(&'a self, name: &'a str) -> Resource<'a> {
        Resource::new(name, self.api_root(), self.api_version())
    }

    /// Relative path `{root}/{version}/{name}`.
    pub fn resource_url(&self, name: &str) -> String {
        self.resource(name).path()
    }

    /// Relative path with per-call root/version overrides.
    pub fn resource_url_with(
        &self,
        name: &str,
        api_root: Option<&str>,
        api_version: Option<&str>,
    ) -> String {
        Resource::new(
            name,
            api_root.or(self.api_root()),
            api_version.or(self.api_version()),
        )
        .path()
    }

    /// The full URL a request will be sent to.
    pub fn url_for(&self, req: &Request) -> String {
        let base = (!req.absolute).then_some(self.base_url.as_str());
        let url = url_joiner(base, &req.path, req.trailing);
        append_query(url, &req.params, &req.flags)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Perform the call and return the response whatever its status.
    pub async fn send(&self, req: &Request) -> Result<Response, Error> {
        let url = Url::parse(&self.url_for(req))?;
        debug!("{} {}", req.method, url);

        let mut headers = req.headers.clone().unwrap_or_else(default_headers);
        let off_base = self.off_base(&url);
        let mut builder = self.http.request(req.method.clone(), url);

        match req.body() {
            Some(Body::Files(parts)) => {
                // multipart sets its own boundary content type
                headers.remove(CONTENT_TYPE);
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    let mut p = reqwest::multipart::Part::bytes(part.content.to_vec())
                        .file_name(part.file_name.clone());
                    if let Some(ref mime) = part.mime {
                        p = p.mime_str(mime)?;
                    }
                    form = form.part(part.field.clone(), p);
                }
                builder = builder.multipart(form);
            }
            Some(Body::Data(data)) => {
                let raw = serde_json::to_string(data).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: String::new(),
                })?;
                builder = builder.body(raw);
            }
            Some(Body::Json(json)) => {
                builder = builder.json(json);
            }
            None => {}
        }

        builder = self.apply_auth(builder.headers(headers), off_base);

        let resp = builder.send().await?;
        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let final_url = resp.url().clone();
        let body = resp.bytes().await?;

        debug!(
            "HTTP: {} {} -> {} {}",
            req.method,
            req.path,
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        trace!(body = %String::from_utf8_lossy(&body), "HTTP: response text");

        Ok(Response::new(status, resp_headers, final_url, body))
    }

    /// Perform the call, raising on error statuses unless the effective
    /// mode is [`ResponseMode::Advanced`].
    pub async fn request(&self, req: &Request) -> Result<Response, Error> {
        let resp = self.send(req).await?;
        if req.mode.unwrap_or(self.mode) == ResponseMode::Strict {
            resp.error_for_status()?;
        }
        Ok(resp)
    }

    /// GET `path` with `params` under the client's mode.
    ///
    /// Strict clients raise on error statuses; advanced clients hand back the
    /// response as received.
    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Response, Error> {
        let mut req = Request::get(path);
        for (k, v) in params {
            req = req.param(*k, *v);
        }
        self.request(&req).await
    }

    /// Whether the jar, scoped to the base host, would skip `url`.
    fn off_base(&self, url: &Url) -> bool {
        match &self.auth {
            SessionAuth::Jar { host, .. } => url.host_str() != host.as_deref(),
            _ => false,
        }
    }

    fn apply_auth(
        &self,
        builder: reqwest::RequestBuilder,
        off_base: bool,
    ) -> reqwest::RequestBuilder {
        match &self.auth {
            SessionAuth::Jar { cookie, .. } if off_base => builder.header(COOKIE, cookie.clone()),
            SessionAuth::None | SessionAuth::Jar { .. } => builder,
            SessionAuth::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
            SessionAuth::Bearer(token) => builder.bearer_auth(token.expose_secret()),
            SessionAuth::Header(value) => builder.header(AUTHORIZATION, value.clone()),
            SessionAuth::Cookie(value) => builder.header(COOKIE, value.clone()),
        }
    }
}

/// Default headers when a request doesn't bring its own.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn session_auth(creds: &Credentials) -> Result<SessionAuth, Error> {
    debug!(strategy = ?creds.strategy(), "configuring credentials");
    Ok(match creds {
        Credentials::Basic { username, password } => SessionAuth::Basic {
            username: username.clone(),
            password: password.clone(),
        },
        Credentials::Bearer { token } => SessionAuth::Bearer(token.clone()),
        Credentials::OAuth2 {
            access_token,
            token_type,
        } => SessionAuth::Header(sensitive(&format!(
            "{token_type} {}",
            access_token.expose_secret()
        ))?),
        Credentials::OAuth(exchange) | Credentials::Kerberos(exchange) => {
            let value = exchange.authorization().map_err(|e| Error::Authentication {
                message: format!("{} token exchange failed: {e}", exchange.name()),
            })?;
            SessionAuth::Header(sensitive(value.expose_secret())?)
        }
        Credentials::Cookies(cookies) => SessionAuth::Cookie(cookie_header(cookies)?),
    })
}

fn cookie_header(cookies: &BTreeMap<String, String>) -> Result<HeaderValue, Error> {
    let line = cookies
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ");
    let mut value =
        HeaderValue::from_str(&line).map_err(|e| Error::InvalidHeader(format!("cookie: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

fn sensitive(raw: &str) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(raw)
        .map_err(|e| Error::InvalidHeader(format!("authorization: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}
