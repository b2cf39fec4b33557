//! ls command - List the contents of a remote folder
//!
//! Names come back in whatever order the service yields them; no sort is
//! imposed.

use clap::Args;
use serde::Serialize;

use dc_core::ops;

use crate::commands::connect;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List the contents of a remote folder
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Absolute remote path of the folder (e.g. /backups/2026)
    pub path: String,

    /// Append a summary line with the entry count
    #[arg(short, long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct LsOutput {
    path: String,
    names: Vec<String>,
    count: usize,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, profile_name: &str, output: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output);

    let (client, _profile) = match connect(profile_name, &formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let names = match ops::list_files(&client, &args.path).await {
        Ok(names) => names,
        Err(e) => {
            formatter.error(&format!("Failed to list '{}': {e}", args.path));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&LsOutput {
            path: args.path,
            count: names.len(),
            names,
        });
    } else {
        for name in &names {
            formatter.println(name);
        }
        if args.long {
            formatter.println(&format!("\n{} entr{}", names.len(), plural_y(names.len())));
        }
    }

    ExitCode::Success
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 { "y" } else { "ies" }
}
