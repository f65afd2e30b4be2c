// ── Core error types ──
//
// User-facing errors from unet-core. Front ends show `to_string()` of
// these inline. The `From<unet_api::Error>` impl translates
// transport-layer errors into the cockpit's error taxonomy:
// authentication, expired session, API, and network failures.

use thiserror::Error;

/// Message shown when an authorized action is attempted while signed out.
pub const NOT_SIGNED_IN: &str = "未登录";

/// Message shown after a forced logout.
pub const SESSION_EXPIRED: &str = "登录状态已过期，请重新登录";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    /// Bad credentials; carries the server's explanation.
    #[error("{message}")]
    AuthenticationFailed { message: String },

    /// The server rejected the bearer token. The session has been cleared.
    #[error("{}", SESSION_EXPIRED)]
    SessionExpired,

    #[error("{}", NOT_SIGNED_IN)]
    NotAuthenticated,

    // ── Server errors ────────────────────────────────────────────────
    /// Non-2xx answer with the server's explanation.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport failure: the server could not be reached or timed out.
    #[error("Cannot reach server: {reason}")]
    Network { reason: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("{message}")]
    ValidationFailed { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Session storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<unet_api::Error> for CoreError {
    fn from(err: unet_api::Error) -> Self {
        match err {
            unet_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            unet_api::Error::NotAuthenticated => CoreError::NotAuthenticated,
            unet_api::Error::SessionExpired => CoreError::SessionExpired,
            unet_api::Error::Api { status, message } => CoreError::Api { status, message },
            unet_api::Error::Transport(e) => CoreError::Network {
                reason: if e.is_timeout() {
                    "request timed out".into()
                } else if e.is_connect() {
                    "connection failed".into()
                } else {
                    e.to_string()
                },
            },
            unet_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            unet_api::Error::Tls(msg) => CoreError::Network {
                reason: format!("TLS error: {msg}"),
            },
            unet_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_session_renders_the_forced_logout_message() {
        let err = CoreError::from(unet_api::Error::SessionExpired);
        assert!(matches!(err, CoreError::SessionExpired));
        assert_eq!(err.to_string(), "登录状态已过期，请重新登录");
    }

    #[test]
    fn api_error_renders_only_the_server_message() {
        let err = CoreError::from(unet_api::Error::Api {
            status: 409,
            message: "任务编号冲突".into(),
        });
        assert_eq!(err.to_string(), "任务编号冲突");
    }

    #[test]
    fn auth_error_keeps_server_detail() {
        let err = CoreError::from(unet_api::Error::Authentication {
            message: "用户名或密码错误".into(),
        });
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert_eq!(err.to_string(), "用户名或密码错误");
    }
}
