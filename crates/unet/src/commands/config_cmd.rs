//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Select};

use unet_config::DEFAULT_SERVER;
use unet_core::RefreshPolicy;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

fn show_detail(cfg: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Config file:     {}", config::config_path().display());
    let _ = writeln!(
        out,
        "Default profile: {}",
        cfg.default_profile.as_deref().unwrap_or("default")
    );
    let _ = writeln!(
        out,
        "Defaults:        output={} color={} timeout={}s refresh={}s page_size={}",
        cfg.defaults.output,
        cfg.defaults.color,
        cfg.defaults.timeout,
        cfg.defaults.refresh_interval_secs,
        cfg.defaults.page_size,
    );

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let Some(profile) = cfg.profiles.get(name) else {
            continue;
        };
        let _ = writeln!(out, "\n[{name}]");
        let _ = writeln!(out, "  server:   {}", profile.server);
        let _ = writeln!(
            out,
            "  username: {}",
            profile.username.as_deref().unwrap_or("--")
        );
        let _ = writeln!(
            out,
            "  password: {}",
            if profile.password.is_some() { "(plaintext)" } else { "(keyring / prompt)" }
        );
        match unet_config::profile_to_client_config(profile, &cfg.defaults) {
            Ok(client) => {
                let _ = writeln!(out, "  tls:      {}", config::tls_summary(&client.tls));
                let _ = writeln!(
                    out,
                    "  refresh:  {}s ({})",
                    client.refresh_interval.as_secs(),
                    client.refresh_policy
                );
                let _ = writeln!(out, "  page:     {} rows", client.page_size);
            }
            Err(e) => {
                let _ = writeln!(out, "  invalid:  {e}");
            }
        }
    }
    out.trim_end().to_owned()
}

fn parse_value<T: std::str::FromStr>(
    key: &str,
    value: &str,
    expected: &str,
) -> Result<T, CliError> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::validation(key, format!("must be {expected}")))
}

fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => {
            unet_config::parse_server(&value)?;
            profile.server = value;
        }
        "username" => profile.username = Some(value),
        "insecure" => profile.insecure = parse_value(key, &value, "'true' or 'false'")?,
        "timeout" => profile.timeout = Some(parse_value(key, &value, "a number (seconds)")?),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "refresh_interval_secs" | "refresh-interval" => {
            profile.refresh_interval_secs =
                Some(parse_value(key, &value, "a number (seconds, 0 disables)")?);
        }
        "page_size" | "page-size" => {
            let size: u32 = parse_value(key, &value, "a positive number")?;
            if size == 0 {
                return Err(CliError::validation(key, "must be a positive number"));
            }
            profile.page_size = Some(size);
        }
        "refresh_policy" | "refresh-policy" => {
            profile.refresh_policy =
                parse_value::<RefreshPolicy>(key, &value, "'fail-fast' or 'isolated'")?;
        }
        other => {
            return Err(CliError::validation(
                other,
                format!(
                    "unknown config key '{other}'. Valid keys: server, username, insecure, \
                     timeout, ca_cert, refresh_interval_secs, page_size, refresh_policy"
                ),
            ));
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("UNET cockpit CLI configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Server URL")
                .default(DEFAULT_SERVER.into())
                .validate_with(|s: &String| {
                    unet_config::parse_server(s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(prompt_err)?;
            let username = username.trim().to_owned();
            if username.is_empty() {
                return Err(CliError::validation("username", "cannot be empty"));
            }

            let store_choices = &[
                "Store password in system keyring (recommended)",
                "Save to config file (plaintext)",
                "Ask at every login",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to keep the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password = match store_selection {
                0 | 1 => {
                    let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
                    if pass.is_empty() {
                        return Err(CliError::validation("password", "cannot be empty"));
                    }
                    if store_selection == 0 {
                        unet_config::store_password(&profile_name, &username, &pass)?;
                        eprintln!("   Password stored in system keyring");
                        None
                    } else {
                        Some(pass)
                    }
                }
                _ => None,
            };
            if store_selection != 0 {
                // Leftover keyring entry would shadow the new choice.
                if let Err(e) = unet_config::forget_password(&profile_name, &username) {
                    tracing::debug!(error = %e, "no keyring entry removed");
                }
            }

            let insecure = server.starts_with("https")
                && Confirm::new()
                    .with_prompt("Accept self-signed certificates?")
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    server,
                    username: Some(username),
                    password,
                    insecure,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;
            output::success(global, &format!("Configuration written to {}", path.display()));
            output::note(global, &format!("  Active profile: {profile_name}"));
            output::note(global, "  Sign in with: unet login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(global.output, &cfg, show_detail, |c| {
                c.default_profile.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            set_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::success(global, &format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                output::note(global, "No profiles configured. Run: unet config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                let lines: Vec<String> = names
                    .into_iter()
                    .map(|name| {
                        let marker = if name == default { " *" } else { "" };
                        format!("{name}{marker}")
                    })
                    .collect();
                output::print_output(&lines.join("\n"), global.quiet);
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(global, &format!("Default profile set to '{name}'"));
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name =
                profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            let prof = cfg
                .profiles
                .get(&profile_name)
                .ok_or_else(|| CliError::ProfileNotFound {
                    name: profile_name.clone(),
                    available: config::available_profiles(&cfg),
                })?;
            let username = prof.username.as_deref().ok_or(CliError::NoUsername)?;

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::validation("password", "value cannot be empty"));
            }

            unet_config::store_password(&profile_name, username, &secret)?;
            output::success(
                global,
                &format!("Password stored in system keyring for profile '{profile_name}'"),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_key_parses_typed_values() {
        let mut profile = Profile::default();
        set_key(&mut profile, "page-size", "25".into()).unwrap();
        set_key(&mut profile, "refresh_policy", "isolated".into()).unwrap();
        set_key(&mut profile, "insecure", "true".into()).unwrap();
        set_key(&mut profile, "server", "https://cockpit.plant.local".into()).unwrap();

        assert_eq!(profile.page_size, Some(25));
        assert_eq!(profile.refresh_policy, RefreshPolicy::Isolated);
        assert!(profile.insecure);
        assert_eq!(profile.server, "https://cockpit.plant.local");
    }

    #[test]
    fn set_key_rejects_bad_input() {
        let mut profile = Profile::default();
        assert!(set_key(&mut profile, "page_size", "0".into()).is_err());
        assert!(set_key(&mut profile, "timeout", "soon".into()).is_err());
        assert!(set_key(&mut profile, "server", "not a url".into()).is_err());
        assert!(set_key(&mut profile, "color", "red".into()).is_err());
    }
}
