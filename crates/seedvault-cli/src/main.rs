//! SeedVault CLI - password-protected backups of BIP39 recovery phrases
//!
//! This is the command-line interface for SeedVault. It reads input, renders
//! output and maps failures to exit codes; the work happens in the core library.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{decrypt, encrypt, init, log, misc, status, words};
use crate::errors::exit_code_for;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false);

        let error_msg = format!("{}", e);
        let (message, hint) = split_hint(&error_msg);

        print_error(&ui_ctx, message, hint);
        std::process::exit(exit_code_for(&e));
    }
}

/// Split a trailing "Hint: ..." line off an error message.
fn split_hint(error: &str) -> (&str, Option<&str>) {
    match error.find("\nHint: ") {
        Some(idx) => (&error[..idx], Some(&error[idx + "\nHint: ".len()..])),
        None => (error, None),
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init(args) => init::handle_init(ctx, args),
        Commands::Encrypt(args) => block_on(encrypt::handle_encrypt(ctx, args)),
        Commands::Decrypt(args) => block_on(decrypt::handle_decrypt(ctx, args)),
        Commands::Status(args) => status::handle_status(ctx, args),
        Commands::Log(args) => log::handle_log(ctx, args),
        Commands::Words(args) => words::handle_words(ctx, args),
        Commands::Completions { shell } => misc::handle_completions(*shell),
    }
}

/// Drive a command on a single-threaded runtime.
fn block_on<F: std::future::Future<Output = anyhow::Result<()>>>(
    future: F,
) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(future)
}
