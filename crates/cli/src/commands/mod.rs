//! Subcommand implementations
//!
//! One module per user-visible verb. Every command follows the same
//! shape: parse args, load the profile, authenticate a client, call the
//! facade, format the result.

mod download;
mod ls;
mod mkdir;
mod profile;
mod resolve;
mod rm;
mod upload;

use clap::Subcommand;

use dc_core::{Profile, ProfileManager};
use dc_drive::DriveClient;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Top-level subcommands, one per facade operation
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage connection profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// List the contents of a remote folder
    Ls(ls::LsArgs),

    /// Create a remote folder
    Mkdir(mkdir::MkdirArgs),

    /// Copy a local file to Drive
    Upload(upload::UploadArgs),

    /// Copy a Drive file to the local filesystem
    Download(download::DownloadArgs),

    /// Delete a remote file or folder (folders delete recursively)
    Rm(rm::RmArgs),

    /// Print the node id behind an absolute remote path
    Resolve(resolve::ResolveArgs),
}

/// Dispatch a parsed subcommand
pub async fn execute(cmd: Commands, profile_name: &str, output: OutputConfig) -> ExitCode {
    match cmd {
        Commands::Profile(cmd) => profile::execute(cmd, output).await,
        Commands::Ls(args) => ls::execute(args, profile_name, output).await,
        Commands::Mkdir(args) => mkdir::execute(args, profile_name, output).await,
        Commands::Upload(args) => upload::execute(args, profile_name, output).await,
        Commands::Download(args) => download::execute(args, profile_name, output).await,
        Commands::Rm(args) => rm::execute(args, profile_name, output).await,
        Commands::Resolve(args) => resolve::execute(args, profile_name, output).await,
    }
}

/// Load the named profile and authenticate a client for it
fn connect(profile_name: &str, formatter: &Formatter) -> Result<(DriveClient, Profile), ExitCode> {
    let manager = match ProfileManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to load profiles: {e}"));
            return Err(ExitCode::GeneralError);
        }
    };

    let profile = match manager.get(profile_name) {
        Ok(p) => p,
        Err(_) => {
            formatter.error(&format!(
                "Profile '{profile_name}' not found; create it with 'dc profile set'"
            ));
            return Err(ExitCode::NotFound);
        }
    };

    match DriveClient::connect(&profile) {
        Ok(client) => Ok((client, profile)),
        Err(e) => {
            formatter.error(&format!("Failed to authenticate: {e}"));
            Err(ExitCode::from_error(&e))
        }
    }
}
