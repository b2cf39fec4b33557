//! dc - Google Drive command line client
//!
//! Addresses Drive objects by absolute path instead of file id, and moves
//! file content in resumable chunks. One subcommand per operation; see
//! `dc --help`.

mod commands;
mod exit_code;
mod output;
mod progress;

use clap::Parser;

use commands::Commands;
use output::OutputConfig;

#[derive(Parser, Debug)]
#[command(name = "dc", version, about, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Connection profile to use
    #[arg(long, global = true, default_value = "default", env = "DC_PROFILE")]
    profile: String,

    /// Emit strict JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    // Logs go to stderr so stdout stays clean for command output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(profile = %cli.profile, "parsed command line");

    let output = OutputConfig {
        json: cli.json,
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    let code = commands::execute(cli.command, &cli.profile, output).await;
    std::process::exit(code.into());
}
