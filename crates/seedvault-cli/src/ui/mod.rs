//! UI primitives for the SeedVault CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and styles
//! - **Render**: Tables, key-value lines, badges, hints, errors
//! - **Progress**: Spinner for the slow key derivation

mod context;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{badge, hint, kv, print, print_error, table, Column};

pub use progress::Spinner;
