use crate::app::AppContext;
use crate::cli::WordsArgs;
use crate::ui::{badge, print, Badge};

pub fn handle_words(ctx: &AppContext, args: &WordsArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let words = ctx.word_set()?;
    let suggestions = words.suggestions(&args.prefix, args.limit);

    if suggestions.is_empty() {
        if !ctx.quiet() && ui_ctx.mode.is_pretty() {
            eprintln!(
                "{}",
                badge(
                    &ui_ctx,
                    Badge::Info,
                    &format!("No words start with '{}'", args.prefix.trim())
                )
            );
        }
        return Ok(());
    }

    for word in suggestions {
        print(&ui_ctx, word);
    }
    Ok(())
}
