//! rm command - Delete a remote file or folder
//!
//! Deleting a folder removes its children as well; there is no trash
//! round trip.

use clap::Args;
use serde::Serialize;

use dc_core::ops;

use crate::commands::connect;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Delete a remote file or folder
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Absolute remote path to delete
    pub path: String,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    path: String,
    deleted: bool,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, profile_name: &str, output: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output);

    let (client, _profile) = match connect(profile_name, &formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match ops::delete(&client, &args.path).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&RmOutput {
                    path: args.path,
                    deleted: true,
                });
            } else {
                formatter.success(&format!("Deleted '{}'", args.path));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to delete '{}': {e}", args.path));
            ExitCode::from_error(&e)
        }
    }
}
