//! Shared configuration for the UNET CLI and TUI.
//!
//! TOML profiles, the session directory, password resolution
//! (env + keyring + plaintext), and translation to
//! `unet_core::ClientConfig`. The CLI layers its global flags on top.

use std::collections::HashMap;
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

use unet_core::{ClientConfig, DEFAULT_PAGE_SIZE, RefreshPolicy, TlsVerification};

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "unet";

/// Env var that overrides the session directory.
pub const SESSION_DIR_ENV: &str = "UNET_SESSION_DIR";

/// Env var consulted before the keyring for a password.
pub const PASSWORD_ENV: &str = "UNET_PASSWORD";

/// Server used when a profile does not name one.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: the explicit name, else `default_profile`,
    /// else "default".
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
            .to_owned()
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Dashboard polling period in seconds. `0` disables polling.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Rows per interface4 page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            refresh_interval_secs: default_refresh_interval(),
            page_size: default_page_size(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    5
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_server() -> String {
    DEFAULT_SERVER.into()
}

/// A named server profile. Unset fields fall back to [`Defaults`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Cockpit base URL (e.g., "http://10.0.8.20:8000").
    #[serde(default = "default_server")]
    pub server: String,

    /// Login name.
    pub username: Option<String>,

    /// Password (plaintext, prefer keyring).
    pub password: Option<String>,

    /// Skip TLS verification.
    #[serde(default)]
    pub insecure: bool,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override polling period.
    pub refresh_interval_secs: Option<u64>,

    /// Override interface4 page size.
    pub page_size: Option<u32>,

    /// How a refresh pass treats a failing endpoint.
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server: default_server(),
            username: None,
            password: None,
            insecure: false,
            ca_cert: None,
            timeout: None,
            refresh_interval_secs: None,
            page_size: None,
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "unet", "unet")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "unet", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Per-user data directory (session files, TUI log).
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "unet"]),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Where `unet_token` / `unet_user` live. An explicit path wins, then
/// `UNET_SESSION_DIR`, then `<data dir>/session`.
pub fn session_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    match std::env::var_os(SESSION_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => data_dir().join("session"),
    }
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UNET_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str, username: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/{username}"),
    )?)
}

/// Resolve a password from the credential chain (no CLI flag step):
/// `UNET_PASSWORD`, then the keyring, then the plaintext profile field.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    username: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring_entry(profile_name, username) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring.
pub fn store_password(
    profile_name: &str,
    username: &str,
    password: &str,
) -> Result<(), ConfigError> {
    keyring_entry(profile_name, username)?.set_password(password)?;
    Ok(())
}

/// Remove a stored password. A missing entry is not an error.
pub fn forget_password(profile_name: &str, username: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name, username)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Client config ───────────────────────────────────────────────────

/// Parse and check a server URL.
pub fn parse_server(server: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = server.trim().parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Build a `ClientConfig` from a profile and the global defaults -- no
/// CLI flag overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url = parse_server(&profile.server)?;

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    let tls = if profile.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ClientConfig::new(url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh_interval = Duration::from_secs(
        profile
            .refresh_interval_secs
            .unwrap_or(defaults.refresh_interval_secs),
    );
    config.page_size = page_size;
    config.refresh_policy = profile.refresh_policy;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
default_profile = "plant"

[defaults]
output = "json"
refresh_interval_secs = 10

[profiles.plant]
server = "https://cockpit.plant.local"
username = "dispatcher"
page_size = 20
refresh_policy = "isolated"

[profiles.lab]
server = "http://10.0.8.20:8000"
insecure = true
"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults, Defaults::default());
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        assert_eq!(cfg.active_profile_name(None), "plant");
        assert_eq!(cfg.active_profile_name(Some("lab")), "lab");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.page_size, 10);

        let plant = cfg.profile("plant").unwrap();
        assert_eq!(plant.username.as_deref(), Some("dispatcher"));
        assert_eq!(plant.refresh_policy, RefreshPolicy::Isolated);

        let lab = cfg.profile("lab").unwrap();
        assert!(lab.insecure);
        assert_eq!(lab.refresh_policy, RefreshPolicy::FailFast);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("nope"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                username: Some("admin".into()),
                page_size: Some(25),
                ..Profile::default()
            },
        );

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn client_config_merges_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        let plant = cfg.profile("plant").unwrap();
        let client = profile_to_client_config(plant, &cfg.defaults).unwrap();
        assert_eq!(client.url.as_str(), "https://cockpit.plant.local/");
        assert_eq!(client.page_size, 20);
        assert_eq!(client.refresh_interval, Duration::from_secs(10));
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.tls, TlsVerification::SystemDefaults);
        assert_eq!(client.refresh_policy, RefreshPolicy::Isolated);

        let lab = profile_to_client_config(cfg.profile("lab").unwrap(), &cfg.defaults).unwrap();
        assert_eq!(lab.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(lab.page_size, 10);
    }

    #[test]
    fn rejects_bad_server_and_page_size() {
        let defaults = Defaults::default();
        let bad_url = Profile {
            server: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&bad_url, &defaults),
            Err(ConfigError::Validation { .. })
        ));

        let ftp = Profile {
            server: "ftp://plant.local".into(),
            ..Profile::default()
        };
        assert!(profile_to_client_config(&ftp, &defaults).is_err());

        let zero = Profile {
            page_size: Some(0),
            ..Profile::default()
        };
        assert!(profile_to_client_config(&zero, &defaults).is_err());
    }

    #[test]
    fn explicit_session_dir_wins() {
        let dir = Path::new("/tmp/unet-session-test");
        assert_eq!(session_dir(Some(dir)), dir);
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        use secrecy::ExposeSecret;

        // Only meaningful when neither env nor keyring hold a value.
        if std::env::var(PASSWORD_ENV).is_ok() {
            return;
        }
        let profile = Profile {
            password: Some("plain".into()),
            ..Profile::default()
        };
        let pw = resolve_password(&profile, "unet-test-no-keyring", "nobody").unwrap();
        assert_eq!(pw.expose_secret(), "plain");
    }
}
