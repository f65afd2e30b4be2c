// Cockpit API HTTP client
//
// Wraps `reqwest::Client` with `/api` URL construction, bearer token
// handling, and error extraction. Endpoint groups (auth, dashboard,
// tasks, interface4) are implemented as inherent methods in separate
// files to keep this module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Shape of an error body. FastAPI puts the reason in `detail`, which is
/// either a string or a list of validation problems.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidationProblem {
    msg: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        let detail = match self.detail {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(value @ serde_json::Value::Array(_)) => {
                serde_json::from_value::<Vec<ValidationProblem>>(value)
                    .ok()
                    .map(|problems| {
                        problems
                            .into_iter()
                            .filter_map(|p| p.msg)
                            .collect::<Vec<_>>()
                            .join("; ")
                    })
            }
            _ => None,
        };
        detail
            .filter(|s| !s.is_empty())
            .or_else(|| self.message.filter(|s| !s.is_empty()))
    }
}

/// Extract the server's explanation from an error body, if it has one.
pub(crate) fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
}

/// First 200 characters of a body, for error messages.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Raw HTTP client for the cockpit REST API.
///
/// Holds the bearer token for the active session. Every endpoint except
/// login goes through [`ApiClient::authorized_request`], which attaches
/// the token and classifies failures: 401 becomes
/// [`Error::SessionExpired`], any other non-2xx becomes [`Error::Api`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the server root (e.g. `http://10.0.0.5:8000`); the
    /// `/api` prefix is added per request.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Bearer token ──────────────────────────────────────────────────

    /// Adopt a bearer token for subsequent authorized calls.
    pub fn set_token(&self, token: SecretString) {
        debug!("bearer token set");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the bearer token.
    pub fn clear_token(&self) {
        debug!("bearer token cleared");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authorized request and return the raw response.
    ///
    /// `customize` adds query parameters or a body. The caller decides
    /// whether to read the response as JSON or bytes.
    pub async fn authorized_request<F>(
        &self,
        method: Method,
        path: &str,
        customize: F,
    ) -> Result<Response, Error>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.api_url(path)?;
        debug!("{method} {url}");

        let builder = {
            let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
            let token = guard.as_ref().ok_or(Error::NotAuthenticated)?;
            self.http
                .request(method, url)
                .bearer_auth(token.expose_secret())
        };

        let resp = customize(builder).send().await?;
        let status = resp.status();
        trace!(%status, "response received");

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            return Err(Self::api_error(resp).await);
        }
        Ok(resp)
    }

    /// Authorized GET returning a decoded JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let resp = self
            .authorized_request(Method::GET, path, |b| {
                if query.is_empty() { b } else { b.query(query) }
            })
            .await?;
        Self::decode(resp).await
    }

    /// Authorized POST with a JSON body, returning a decoded JSON body.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let resp = self
            .authorized_request(Method::POST, path, |b| b.json(body))
            .await?;
        Self::decode(resp).await
    }

    /// Decode a successful response body.
    pub(crate) async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    /// Build an [`Error::Api`] from a non-2xx response.
    ///
    /// Prefers `detail`, then `message`, then the HTTP reason phrase.
    pub(crate) async fn api_error(resp: Response) -> Error {
        let status = resp.status();
        let fallback = status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned);
        let body = resp.text().await.unwrap_or_default();
        Error::Api {
            status: status.as_u16(),
            message: server_message(&body).unwrap_or(fallback),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_without_double_slashes() {
        let client = ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://plant.local:8000/").unwrap(),
        );
        assert_eq!(
            client.api_url("/tasks").unwrap().as_str(),
            "http://plant.local:8000/api/tasks"
        );
    }

    #[test]
    fn api_url_keeps_a_path_prefix() {
        let client = ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://gateway.example/unet").unwrap(),
        );
        assert_eq!(
            client.api_url("interface4/events").unwrap().as_str(),
            "https://gateway.example/unet/api/interface4/events"
        );
    }

    #[test]
    fn detail_string_wins_over_message() {
        let msg = server_message(r#"{"detail":"用户名或密码错误","message":"ignored"}"#);
        assert_eq!(msg.as_deref(), Some("用户名或密码错误"));
    }

    #[test]
    fn empty_detail_falls_back_to_message() {
        let msg = server_message(r#"{"detail":"","message":"quota exceeded"}"#);
        assert_eq!(msg.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn validation_detail_is_joined() {
        let msg = server_message(concat!(
            r#"{"detail":[{"loc":["body","quantity"],"msg":"field required"},"#,
            r#"{"msg":"value is not a valid integer"}]}"#,
        ));
        assert_eq!(
            msg.as_deref(),
            Some("field required; value is not a valid integer")
        );
    }

    #[test]
    fn non_json_body_has_no_message() {
        assert_eq!(server_message("<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn preview_is_char_safe() {
        let body = "报".repeat(300);
        assert_eq!(preview(&body).chars().count(), 200);
    }
}
