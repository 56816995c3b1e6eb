use crate::app::AppContext;
use crate::cli::StatusArgs;
use crate::ui::theme::{styled, styles};
use crate::ui::{badge, kv, print, Badge};

pub fn handle_status(ctx: &AppContext, args: &StatusArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let vault = ctx.open_vault()?;
    let status = vault.lockout_status()?;

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    if ui_ctx.mode.is_pretty() {
        let line = if status.locked {
            badge(&ui_ctx, Badge::Warn, "Decryption locked")
        } else {
            badge(&ui_ctx, Badge::Ok, "Decryption available")
        };
        print(&ui_ctx, &line);
    } else {
        print(&ui_ctx, &kv(&ui_ctx, "Locked", &status.locked.to_string()));
    }
    print(
        &ui_ctx,
        &kv(&ui_ctx, "Failed attempts", &status.attempts.to_string()),
    );
    print(
        &ui_ctx,
        &kv(
            &ui_ctx,
            "Attempts remaining",
            &styled(
                &status.attempts_remaining.to_string(),
                styles::bold(),
                ui_ctx.color,
            ),
        ),
    );
    if status.locked {
        print(
            &ui_ctx,
            &kv(
                &ui_ctx,
                "Retry in seconds",
                &status.remaining_ms.div_ceil(1000).to_string(),
            ),
        );
    }

    Ok(())
}
