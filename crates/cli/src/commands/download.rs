//! download command - Copy a Drive file to the local filesystem
//!
//! Chunk failures are not retried on this side; a failed download leaves
//! a partial local file behind and reports the error.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use dc_core::ops;

use crate::commands::connect;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::progress::{PercentBar, SilentObserver};

/// Copy a Drive file to the local filesystem
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Absolute remote path of the file to download
    pub source: String,

    /// Local destination path
    pub dest: PathBuf,
}

#[derive(Debug, Serialize)]
struct DownloadOutput {
    source: String,
    dest: String,
}

/// Execute the download command
pub async fn execute(args: DownloadArgs, profile_name: &str, output: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output);

    let (client, _profile) = match connect(profile_name, &formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let show_bar = !formatter.is_json() && !formatter.is_quiet();

    let result = if show_bar {
        let mut bar = PercentBar::new(format!("↓ {}", args.source));
        let result = ops::download(&client, &args.source, &args.dest, &mut bar).await;
        match &result {
            Ok(()) => bar.finish(),
            Err(_) => bar.abandon(),
        }
        result
    } else {
        ops::download(&client, &args.source, &args.dest, &mut SilentObserver).await
    };

    match result {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&DownloadOutput {
                    source: args.source,
                    dest: args.dest.display().to_string(),
                });
            } else {
                formatter.success(&format!(
                    "Downloaded '{}' to '{}'",
                    args.source,
                    args.dest.display()
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Download failed: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
