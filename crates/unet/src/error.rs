//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use unet_config::ConfigError;
use unet_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const SESSION: i32 = 4;
    pub const API: i32 = 5;
    pub const NETWORK: i32 = 6;
    pub const VALIDATION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the cockpit server: {reason}")]
    #[diagnostic(
        code(unet::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Override the address with --server, or use --insecure for self-signed TLS."
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed: {message}")]
    #[diagnostic(
        code(unet::auth_failed),
        help("Verify the username and password, then run: unet login")
    )]
    AuthFailed { message: String },

    #[error("No password available for profile '{profile}'")]
    #[diagnostic(
        code(unet::no_credentials),
        help(
            "Pass --password, set UNET_PASSWORD, or store one with:\n\
             unet config set-password --profile {profile}"
        )
    )]
    NoCredentials { profile: String },

    #[error("No username given")]
    #[diagnostic(
        code(unet::no_username),
        help("Pass --username or set `username` on the profile: unet config set username <name>")
    )]
    NoUsername,

    // ── Session ──────────────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(code(unet::not_logged_in), help("Run: unet login"))]
    NotLoggedIn,

    #[error("The session has expired")]
    #[diagnostic(
        code(unet::session_expired),
        help("The stored session was cleared. Run: unet login")
    )]
    SessionExpired,

    // ── API ──────────────────────────────────────────────────────────
    #[error("Server error ({status}): {message}")]
    #[diagnostic(code(unet::api_error))]
    ApiError { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(unet::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: unet config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(unet::config))]
    Config { message: String },

    // ── Local ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(unet::storage))]
    Storage { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(unet::internal))]
    Internal { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(unet::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(unet::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::NETWORK,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::NoUsername => {
                exit_code::AUTH
            }
            Self::NotLoggedIn | Self::SessionExpired => exit_code::SESSION,
            Self::ApiError { .. } => exit_code::API,
            Self::Validation { .. } => exit_code::VALIDATION,
            Self::ProfileNotFound { .. } | Self::Config { .. } => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::SessionExpired => CliError::SessionExpired,
            CoreError::NotAuthenticated => CliError::NotLoggedIn,
            CoreError::Api { status, message } => CliError::ApiError { status, message },
            CoreError::Network { reason } => CliError::ConnectionFailed { reason },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Storage { message } => CliError::Storage { message },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see: unet config profiles)".into(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_taxonomy() {
        let cases = [
            (CoreError::AuthenticationFailed { message: "x".into() }, exit_code::AUTH),
            (CoreError::SessionExpired, exit_code::SESSION),
            (CoreError::NotAuthenticated, exit_code::SESSION),
            (
                CoreError::Api {
                    status: 500,
                    message: "boom".into(),
                },
                exit_code::API,
            ),
            (CoreError::Network { reason: "down".into() }, exit_code::NETWORK),
            (
                CoreError::ValidationFailed {
                    message: "bad".into(),
                },
                exit_code::VALIDATION,
            ),
            (CoreError::Config { message: "x".into() }, exit_code::CONFIG),
            (CoreError::Internal("x".into()), exit_code::GENERAL),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn unknown_profile_is_a_config_error() {
        let err = CliError::from(ConfigError::UnknownProfile {
            name: "plant".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONFIG);
        assert!(err.to_string().contains("plant"));
    }
}
