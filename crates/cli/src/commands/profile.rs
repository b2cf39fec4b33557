//! Profile management commands
//!
//! Profiles are named references to a service account and the subject it
//! impersonates, plus transfer tuning. The remaining commands select one
//! with the global `--profile` flag.

use std::path::PathBuf;

use clap::Subcommand;
use comfy_table::{Table, presets};
use serde::Serialize;

use dc_core::{Profile, ProfileManager};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

const CHUNK_GRANULE: u64 = 256 * 1024;

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g. "default", "work")
    pub name: String,

    /// Path to the service-account JSON key file
    pub key_file: PathBuf,

    /// Email address of the user to impersonate
    pub subject: String,

    /// Transfer chunk size in bytes (multiple of 262144)
    #[arg(long, default_value_t = 8 * 1024 * 1024)]
    pub chunk_size: u64,

    /// Base backoff delay in milliseconds for transient upload failures
    #[arg(long, default_value_t = 1000)]
    pub retry_base_ms: u64,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details including key file paths
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// JSON output for profile list
#[derive(Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileInfo>,
}

#[derive(Serialize)]
struct ProfileInfo {
    name: String,
    key_file: String,
    subject: String,
    chunk_size: u64,
}

/// JSON output for profile set/remove operations
#[derive(Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

/// Execute a profile subcommand
pub async fn execute(cmd: ProfileCommands, output: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output);
    let manager = match ProfileManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to load profiles: {e}"));
            return ExitCode::GeneralError;
        }
    };

    match cmd {
        ProfileCommands::Set(args) => execute_set(args, manager, &formatter),
        ProfileCommands::List(args) => execute_list(args, &manager, &formatter),
        ProfileCommands::Remove(args) => execute_remove(args, manager, &formatter),
    }
}

fn execute_set(args: SetArgs, mut manager: ProfileManager, formatter: &Formatter) -> ExitCode {
    if args.name.is_empty() {
        formatter.error("Profile name cannot be empty");
        return ExitCode::UsageError;
    }

    if !args.subject.contains('@') {
        formatter.error(&format!("'{}' is not an email address", args.subject));
        return ExitCode::UsageError;
    }

    if args.chunk_size == 0 || args.chunk_size % CHUNK_GRANULE != 0 {
        formatter.error(&format!(
            "Chunk size must be a positive multiple of {CHUNK_GRANULE} bytes"
        ));
        return ExitCode::UsageError;
    }

    if !args.key_file.is_file() {
        formatter.warning(&format!(
            "Key file '{}' does not exist yet",
            args.key_file.display()
        ));
    }

    let mut profile = Profile::new(args.key_file, args.subject);
    profile.chunk_size = args.chunk_size;
    profile.retry_base_ms = args.retry_base_ms;

    if let Err(e) = manager.set(&args.name, profile) {
        formatter.error(&format!("Failed to save profile: {e}"));
        return ExitCode::GeneralError;
    }

    if formatter.is_json() {
        formatter.json(&ProfileOperationOutput {
            success: true,
            profile: args.name.clone(),
            message: "profile saved".to_string(),
        });
    } else {
        formatter.success(&format!("Profile '{}' saved", args.name));
    }
    ExitCode::Success
}

fn execute_list(args: ListArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profiles: Vec<(&str, &Profile)> = manager.list().collect();

    if formatter.is_json() {
        let output = ProfileListOutput {
            profiles: profiles
                .iter()
                .map(|(name, p)| ProfileInfo {
                    name: name.to_string(),
                    key_file: p.key_file.display().to_string(),
                    subject: p.subject.clone(),
                    chunk_size: p.chunk_size,
                })
                .collect(),
        };
        formatter.json(&output);
        return ExitCode::Success;
    }

    if profiles.is_empty() {
        formatter.println("No profiles configured. Add one with 'dc profile set'.");
        return ExitCode::Success;
    }

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    if args.long {
        table.set_header(["NAME", "SUBJECT", "KEY FILE", "CHUNK"]);
        for (name, p) in &profiles {
            table.add_row([
                formatter.theme().name.apply_to(name).to_string(),
                p.subject.clone(),
                p.key_file.display().to_string(),
                humansize::format_size(p.chunk_size, humansize::BINARY),
            ]);
        }
    } else {
        table.set_header(["NAME", "SUBJECT"]);
        for (name, p) in &profiles {
            table.add_row([
                formatter.theme().name.apply_to(name).to_string(),
                p.subject.clone(),
            ]);
        }
    }
    formatter.println(&table.to_string());

    ExitCode::Success
}

fn execute_remove(args: RemoveArgs, mut manager: ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: args.name.clone(),
                    message: "profile removed".to_string(),
                });
            } else {
                formatter.success(&format!("Profile '{}' removed", args.name));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to remove profile: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
