//! mkdir command - Create a remote folder
//!
//! The parent folder must already exist; intermediate folders are not
//! created implicitly.

use clap::Args;
use serde::Serialize;

use dc_core::ops;

use crate::commands::connect;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a remote folder
#[derive(Args, Debug)]
pub struct MkdirArgs {
    /// Absolute remote path of the folder to create
    pub path: String,
}

#[derive(Debug, Serialize)]
struct MkdirOutput {
    path: String,
    id: dc_core::NodeId,
}

/// Execute the mkdir command
pub async fn execute(args: MkdirArgs, profile_name: &str, output: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output);

    let (client, _profile) = match connect(profile_name, &formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match ops::make_directory(&client, &args.path).await {
        Ok(id) => {
            if formatter.is_json() {
                formatter.json(&MkdirOutput {
                    path: args.path,
                    id,
                });
            } else {
                formatter.success(&format!("Created folder '{}'", args.path));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to create '{}': {e}", args.path));
            ExitCode::from_error(&e)
        }
    }
}
