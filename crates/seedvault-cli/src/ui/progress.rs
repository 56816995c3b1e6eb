//! Progress indicators for long-running operations using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::time::Duration;

use super::context::UiContext;

/// A spinner for indeterminate progress, drawn on stderr.
///
/// Outside pretty TTY mode it draws nothing.
pub struct Spinner {
    bar: Option<IndicatifBar>,
}

impl Spinner {
    /// Create and start a spinner with the given message.
    pub fn start(ctx: &UiContext, message: &str) -> Self {
        if !ctx.allows_animation() {
            return Self { bar: None };
        }

        let pb = IndicatifBar::new_spinner();
        let template = if ctx.unicode {
            "{spinner:.cyan} {msg}..."
        } else {
            "{spinner} {msg}..."
        };
        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            pb.set_style(style.tick_strings(if ctx.unicode {
                &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]
            } else {
                &["|", "/", "-", "\\", ""]
            }));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));

        Self { bar: Some(pb) }
    }

    /// Stop and erase the spinner.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}
