use thiserror::Error;

/// Top-level error type for the `unet-api` crate.
///
/// Covers every failure mode of the cockpit REST surface: login,
/// bearer-authorized calls, transport, and response decoding.
/// `unet-core` maps these into the user-facing taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected by the server (bad credentials, disabled user).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An authorized call was attempted without a bearer token.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The server answered 401 to an authorized call.
    #[error("Session expired -- sign in again")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response other than 401. `message` comes from the body's
    /// `detail` or `message` field, or the HTTP reason phrase.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
