use std::path::Path;

use secrecy::ExposeSecret;

use crate::app::AppContext;
use crate::cli::EncryptArgs;
use crate::errors::CliError;
use crate::helpers::{prompt_new_password, read_seed, write_private_file};
use crate::ui::{badge, hint, Badge, Spinner};

pub async fn handle_encrypt(ctx: &AppContext<'_>, args: &EncryptArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let interactive = !args.no_input && ui_ctx.is_interactive();

    let seed = read_seed(args.seed.clone(), interactive)?;
    let password = prompt_new_password(interactive)?;
    let mut vault = ctx.open_vault()?;

    let spinner = Spinner::start(&ui_ctx, "Sealing recovery phrase");
    let result = vault.protect(&seed, password.expose_secret()).await;
    spinner.finish();
    vault.shutdown();

    let envelope = result.map_err(CliError::from)?;

    match args.output.as_deref() {
        Some(path) => {
            write_private_file(Path::new(path), &envelope)?;
            if !ctx.quiet() {
                eprintln!(
                    "{}",
                    badge(
                        &ui_ctx,
                        Badge::Ok,
                        &format!("Envelope written to {}", path)
                    )
                );
            }
        }
        None => {
            println!("{}", envelope);
            if !ctx.quiet() && ui_ctx.mode.is_pretty() {
                eprintln!(
                    "{}",
                    hint(
                        &ui_ctx,
                        "Store the envelope and password separately; both are needed to recover."
                    )
                );
            }
        }
    }

    Ok(())
}
