//! resolve command - Print the node id behind an absolute path
//!
//! Useful for scripting against tools that speak raw Drive file ids.

use clap::Args;
use serde::Serialize;

use dc_core::DrivePath;

use crate::commands::connect;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Print the node id behind an absolute remote path
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Absolute remote path to resolve
    pub path: String,
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    path: String,
    id: dc_core::NodeId,
}

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, profile_name: &str, output: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output);

    let path = match DrivePath::parse(&args.path) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    let (client, _profile) = match connect(profile_name, &formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match dc_core::resolve(&client, &path).await {
        Ok(id) => {
            if formatter.is_json() {
                formatter.json(&ResolveOutput {
                    path: args.path,
                    id,
                });
            } else {
                formatter.println(&formatter.theme().name.apply_to(&id).to_string());
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to resolve '{}': {e}", args.path));
            ExitCode::from_error(&e)
        }
    }
}
