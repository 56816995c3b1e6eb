use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use seedvault_core::VERSION;

use crate::constants::env;

/// SeedVault - password-protected backups of BIP39 recovery phrases
#[derive(Parser)]
#[command(name = "seedvault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = env::CONFIG)]
    pub config: Option<String>,

    /// Path to the state file (lockout counters and security log)
    #[arg(long, global = true, env = env::STATE)]
    pub state: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init(InitArgs),

    /// Seal a recovery phrase into an envelope
    Encrypt(EncryptArgs),

    /// Recover a recovery phrase from an envelope
    Decrypt(DecryptArgs),

    /// Show the decryption lockout status
    Status(StatusArgs),

    /// Show or clear the security log
    Log(LogArgs),

    /// Suggest words from the active word list
    Words(WordsArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `encrypt` command
#[derive(Args)]
pub struct EncryptArgs {
    /// Recovery phrase (overrides stdin/prompt)
    #[arg(long, value_name = "WORDS")]
    pub seed: Option<String>,

    /// Write the envelope to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Envelope text (overrides --input/stdin)
    #[arg(value_name = "ENVELOPE")]
    pub envelope: Option<String>,

    /// Read the envelope from a file
    #[arg(short, long, value_name = "FILE", conflicts_with = "envelope")]
    pub input: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `log` command
#[derive(Args)]
pub struct LogArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show only the most recent N events
    #[arg(long)]
    pub limit: Option<usize>,

    /// Remove all events
    #[arg(long, conflicts_with_all = ["json", "limit"])]
    pub clear: bool,
}

/// Arguments for the `words` command
#[derive(Args)]
pub struct WordsArgs {
    /// Word prefix
    #[arg(value_name = "PREFIX")]
    pub prefix: String,

    /// Maximum number of suggestions
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}
