use dialoguer::{theme::ColorfulTheme, Input, Password};

use crate::app::AppContext;
use crate::cli::{CredentialsArgs, CredentialsSetArgs, CredentialsSubcommand};
use crate::credentials;
use crate::errors::CliError;
use crate::ui::{badge, kv, print, Badge};

pub fn handle_credentials(ctx: &AppContext, args: &CredentialsArgs) -> anyhow::Result<()> {
    match &args.command {
        CredentialsSubcommand::Set(set) => handle_set(ctx, set),
        CredentialsSubcommand::Clear => handle_clear(ctx),
        CredentialsSubcommand::Status => handle_status(ctx),
    }
}

fn handle_set(ctx: &AppContext, args: &CredentialsSetArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    if !ui_ctx.is_interactive() {
        return Err(CliError::invalid_input(
            "`credentials set` needs an interactive terminal",
        )
        .into());
    }

    let theme = ColorfulTheme::default();
    let email = match &args.email {
        Some(email) => email.clone(),
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Garmin email")
            .interact_text()?,
    };
    if email.trim().is_empty() {
        return Err(CliError::invalid_input("Email cannot be empty").into());
    }
    let password = Password::with_theme(&theme)
        .with_prompt("Garmin password")
        .interact()?;
    if password.is_empty() {
        return Err(CliError::invalid_input("Password cannot be empty").into());
    }

    credentials::store(email.trim(), &password)?;
    tracing::info!("credentials stored in keychain");
    print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Credentials saved to the keychain"));
    Ok(())
}

fn handle_clear(ctx: &AppContext) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    credentials::clear()?;
    print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Keychain credentials removed"));
    Ok(())
}

fn handle_status(ctx: &AppContext) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    match credentials::lookup()? {
        Some((email, _, source)) => {
            print(&ui_ctx, &kv(&ui_ctx, "Source", source.label()));
            print(&ui_ctx, &kv(&ui_ctx, "Email", &email));
        }
        None => print(
            &ui_ctx,
            &badge(&ui_ctx, Badge::Warn, "No credentials configured"),
        ),
    }
    Ok(())
}
