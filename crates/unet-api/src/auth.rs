// Login endpoint
//
// The only unauthenticated call. The response carries the bearer token;
// holding on to it is the caller's job (see `ApiClient::set_token`).

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::client::{ApiClient, server_message};
use crate::error::Error;

/// Generic message used when the server gives no reason for a failed login.
pub const LOGIN_FAILED: &str = "登录失败";

/// `POST /auth/login` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl ApiClient {
    /// Exchange username/password for a bearer token.
    ///
    /// `POST /api/auth/login`. Any non-2xx answer is reported as
    /// [`Error::Authentication`] with the server's `detail` message, or a
    /// generic one when the body has none.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.api_url("auth/login")?;
        debug!(username, "logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(%status, "login rejected");
            return Err(Error::Authentication {
                message: server_message(&body).unwrap_or_else(|| LOGIN_FAILED.to_owned()),
            });
        }

        let login: LoginResponse = Self::decode(resp).await?;
        debug!(role = %login.role, "login successful");
        Ok(login)
    }
}
