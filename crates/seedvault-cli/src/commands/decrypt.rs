use secrecy::ExposeSecret;

use seedvault_core::SeedVaultError;

use crate::app::AppContext;
use crate::cli::DecryptArgs;
use crate::errors::CliError;
use crate::helpers::{prompt_password, read_envelope};
use crate::ui::{badge, Badge, Spinner};

pub async fn handle_decrypt(ctx: &AppContext<'_>, args: &DecryptArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let interactive = !args.no_input && ui_ctx.is_interactive();

    let text = read_envelope(args.envelope.clone(), args.input.as_deref())?;
    let mut vault = ctx.open_vault()?;
    vault.check_lockout().map_err(CliError::from)?;
    let password = prompt_password(interactive)?;

    let spinner = Spinner::start(&ui_ctx, "Opening envelope");
    let result = vault.recover(&text, password.expose_secret()).await;
    spinner.finish();
    vault.shutdown();

    let phrase = match result {
        Ok(phrase) => phrase,
        Err(SeedVaultError::Authentication) => {
            let remaining = vault
                .lockout_status()
                .map(|status| status.attempts_remaining)
                .unwrap_or(0);
            let hint = if remaining == 0 {
                "Hint: Decryption is now locked; run `seedvault status` to see when it reopens."
                    .to_string()
            } else {
                format!(
                    "Hint: {} attempt(s) left before a temporary lockout.",
                    remaining
                )
            };
            return Err(CliError::auth_failed_with_hint(
                SeedVaultError::Authentication.to_string(),
                hint,
            )
            .into());
        }
        Err(err) => return Err(CliError::from(err).into()),
    };

    println!("{}", phrase.as_str());
    if !ctx.quiet() && ui_ctx.mode.is_pretty() {
        eprintln!(
            "{}",
            badge(
                &ui_ctx,
                Badge::Ok,
                &format!("Recovered {}-word phrase", phrase.word_count())
            )
        );
    }

    Ok(())
}
