//! CLI configuration -- thin wrapper around `unet_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--server, --insecure, --timeout, --session-dir).

use std::time::Duration;

use unet_core::{ClientConfig, FileSessionStore, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use unet_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// The profile a command runs against, with CLI overrides applied.
#[derive(Debug)]
pub struct Resolved {
    pub name: String,
    pub profile: Profile,
    pub client: ClientConfig,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Look up the active profile and translate it into a `ClientConfig`.
///
/// A missing profile is fine unless it was asked for by name: the
/// built-in defaults (local server) apply. CLI flags win over the profile.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(&cfg),
                name,
            });
        }
        None => Profile::default(),
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.insecure {
        profile.insecure = true;
    }

    let client = unet_config::profile_to_client_config(&profile, &cfg.defaults)?;
    Ok(Resolved {
        name,
        profile,
        client,
    })
}

/// One-shot commands never poll.
pub fn one_shot(mut client: ClientConfig) -> ClientConfig {
    client.refresh_interval = Duration::ZERO;
    client
}

/// The session store under `--session-dir`, `UNET_SESSION_DIR`, or the
/// data directory.
pub fn session_store(global: &GlobalOpts) -> FileSessionStore {
    FileSessionStore::new(unet_config::session_dir(global.session_dir.as_deref()))
}

/// Human-readable TLS mode for `config show`.
pub fn tls_summary(tls: &TlsVerification) -> String {
    match tls {
        TlsVerification::SystemDefaults => "system".into(),
        TlsVerification::CustomCa(path) => format!("ca {}", path.display()),
        TlsVerification::DangerAcceptInvalid => "insecure".into(),
    }
}
