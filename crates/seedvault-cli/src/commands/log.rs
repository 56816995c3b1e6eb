use chrono::SecondsFormat;

use crate::app::AppContext;
use crate::cli::LogArgs;
use crate::ui::theme::{styled, styles};
use crate::ui::{badge, print, table, Badge, Column};

const COLUMNS: [Column; 3] = [
    Column::new("Time"),
    Column::new("Event"),
    Column::new("Context"),
];

pub fn handle_log(ctx: &AppContext, args: &LogArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let mut vault = ctx.open_vault()?;

    if args.clear {
        vault.clear_security_log()?;
        if !ctx.quiet() {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Security log cleared"));
        }
        return Ok(());
    }

    let mut events = vault.security_events()?;
    if let Some(limit) = args.limit {
        let skip = events.len().saturating_sub(limit);
        events.drain(..skip);
    }

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        if !ctx.quiet() {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "No security events"));
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|event| {
            vec![
                event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                if event.event_type.is_failure() {
                    styled(event.event_type.as_str(), styles::warning(), ui_ctx.color)
                } else {
                    event.event_type.to_string()
                },
                event.context.clone(),
            ]
        })
        .collect();
    print(&ui_ctx, &table(&ui_ctx, &COLUMNS, &rows));

    Ok(())
}
