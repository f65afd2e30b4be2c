//! Session command handlers: login, logout, whoami.

use dialoguer::Input;
use secrecy::SecretString;

use unet_config::ConfigError;
use unet_core::{Controller, LogoutReason, UserProfile};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

fn resolve_username(args: &LoginArgs, resolved: &Resolved) -> Result<String, CliError> {
    if let Some(name) = args
        .username
        .as_deref()
        .or(resolved.profile.username.as_deref())
    {
        return Ok(name.trim().to_owned());
    }
    if !util::interactive() {
        return Err(CliError::NoUsername);
    }
    let name: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(util::prompt_err)?;
    Ok(name.trim().to_owned())
}

/// Flag/env, then keyring, then plaintext profile field, then prompt.
fn resolve_password(
    args: &LoginArgs,
    resolved: &Resolved,
    username: &str,
) -> Result<SecretString, CliError> {
    if let Some(ref pw) = args.password {
        return Ok(SecretString::from(pw.clone()));
    }
    match unet_config::resolve_password(&resolved.profile, &resolved.name, username) {
        Ok(pw) => Ok(pw),
        Err(ConfigError::NoCredentials { .. }) if util::interactive() => {
            let pw = rpassword::prompt_password("Password: ").map_err(util::prompt_err)?;
            Ok(SecretString::from(pw))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login(
    controller: &Controller,
    args: LoginArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = resolve_username(&args, resolved)?;
    let password = resolve_password(&args, resolved, &username)?;

    let spinner = util::spinner(global, &format!("Signing in to {}", resolved.client.url));
    let result = controller.login(&username, &password).await;
    spinner.finish_and_clear();
    let user = result?;

    if args.save_password {
        use secrecy::ExposeSecret;
        unet_config::store_password(&resolved.name, &username, password.expose_secret())?;
        output::note(global, "Password stored in system keyring");
    }

    output::success(
        global,
        &format!("Signed in as {} ({})", display_name(&user), user.role),
    );
    Ok(())
}

pub async fn logout(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    if controller.resume()?.is_none() {
        output::note(global, "Not signed in");
        return Ok(());
    }
    controller.logout(LogoutReason::Manual).await;
    output::success(global, "Signed out");
    Ok(())
}

pub fn whoami(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let user = util::require_session(controller)?;
    let out = output::render_single(global.output, &user, detail, |u| u.username.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn display_name(user: &UserProfile) -> &str {
    if user.name.is_empty() {
        &user.username
    } else {
        &user.name
    }
}

fn detail(user: &UserProfile) -> String {
    let permissions = if user.permissions.is_empty() {
        "--".to_owned()
    } else {
        user.permissions.join(", ")
    };
    format!(
        "User:        {} ({})\nRole:        {}\nPermissions: {permissions}",
        display_name(user),
        user.username,
        user.role,
    )
}
