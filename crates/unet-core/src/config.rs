// ── Runtime client configuration ──
//
// These types describe *how* to talk to a cockpit server. They carry
// connection tuning and polling behaviour, but never touch disk.
// The CLI/TUI constructs a `ClientConfig` and hands it in.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// Default polling period of the dashboard refresh loop.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Default interface4 page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed plant servers).
    DangerAcceptInvalid,
}

/// How a refresh pass treats a failing endpoint.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RefreshPolicy {
    /// All six panels update together or not at all. The first error is
    /// reported and every panel keeps its previous content.
    #[default]
    FailFast,
    /// Each panel updates on its own; failures are reported but do not
    /// hold back the endpoints that succeeded.
    Isolated,
}

/// Configuration for talking to a single cockpit server.
///
/// Built by CLI/TUI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root (e.g., `http://10.20.0.5:8000`). `/api` is appended.
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Period of the dashboard refresh loop. Zero disables the loop.
    pub refresh_interval: Duration,
    /// Interface4 page size.
    pub page_size: u32,
    pub refresh_policy: RefreshPolicy,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            page_size: DEFAULT_PAGE_SIZE,
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn refresh_policy_parses_kebab_case() {
        assert_eq!(
            RefreshPolicy::from_str("isolated").unwrap(),
            RefreshPolicy::Isolated
        );
        assert_eq!(RefreshPolicy::FailFast.to_string(), "fail-fast");
    }

    #[test]
    fn defaults_match_cockpit_polling() {
        let cfg = ClientConfig::new("http://127.0.0.1:8000".parse().unwrap());
        assert_eq!(cfg.refresh_interval, Duration::from_secs(5));
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.refresh_policy, RefreshPolicy::FailFast);
    }
}
