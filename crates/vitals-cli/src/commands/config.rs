use crate::app::{resolve_config_path, AppContext};
use crate::cli::{ConfigArgs, ConfigInitArgs, ConfigSubcommand};
use crate::config::{to_toml, write_config, VitalsConfig};
use crate::errors::CliError;
use crate::ui::{badge, print, Badge};

pub fn handle_config(ctx: &AppContext, args: &ConfigArgs) -> anyhow::Result<()> {
    match &args.command {
        ConfigSubcommand::Init(init) => handle_init(ctx, init),
        ConfigSubcommand::Show => {
            print!("{}", to_toml(ctx.config())?);
            Ok(())
        }
        ConfigSubcommand::Path => {
            println!("{}", resolve_config_path()?.display());
            Ok(())
        }
    }
}

fn handle_init(ctx: &AppContext, args: &ConfigInitArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let path = resolve_config_path()?;
    if path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))
        .into());
    }
    write_config(&path, &VitalsConfig::default())?;
    tracing::info!(path = %path.display(), "config written");
    print(
        &ui_ctx,
        &badge(
            &ui_ctx,
            Badge::Ok,
            &format!("Wrote {}", path.display()),
        ),
    );
    Ok(())
}
