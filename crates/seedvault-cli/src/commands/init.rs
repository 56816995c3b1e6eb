use std::path::PathBuf;

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{default_state_path, write_config, SeedVaultConfig};
use crate::errors::CliError;
use crate::ui::{badge, kv, print, Badge};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = ctx.config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nHint: Pass --force to overwrite it.",
            config_path.display()
        ))
        .into());
    }

    let state_path = match ctx.cli().state.as_deref() {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => default_state_path()?,
    };
    write_config(&config_path, &SeedVaultConfig::new(state_path.clone()))?;
    tracing::debug!(path = %config_path.display(), "wrote config");

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Config written"));
        print(
            &ui_ctx,
            &kv(&ui_ctx, "Config", &config_path.display().to_string()),
        );
        print(
            &ui_ctx,
            &kv(&ui_ctx, "State", &state_path.display().to_string()),
        );
    }

    Ok(())
}
