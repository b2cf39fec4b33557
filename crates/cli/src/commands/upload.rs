//! upload command - Copy a local file to Drive
//!
//! Runs one resumable session; transient chunk failures are retried with
//! capped exponential backoff inside the engine and show up here only as
//! a stalled progress bar.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use dc_core::ops;

use crate::commands::connect;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::progress::{PercentBar, SilentObserver};

/// Copy a local file to Drive
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Local file to upload
    pub source: PathBuf,

    /// Absolute remote destination path, including the file name
    pub dest: String,
}

#[derive(Debug, Serialize)]
struct UploadOutput {
    source: String,
    dest: String,
    size_bytes: u64,
}

/// Execute the upload command
pub async fn execute(args: UploadArgs, profile_name: &str, output: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output);

    let size_bytes = match std::fs::metadata(&args.source) {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => {
            formatter.error(&format!("'{}' is not a file", args.source.display()));
            return ExitCode::UsageError;
        }
        Err(e) => {
            formatter.error(&format!("Cannot read '{}': {e}", args.source.display()));
            return ExitCode::IoError;
        }
    };

    let (client, profile) = match connect(profile_name, &formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let policy = profile.retry_policy();
    let show_bar = !formatter.is_json() && !formatter.is_quiet();

    let result = if show_bar {
        let label = format!(
            "↑ {} ({})",
            args.source.display(),
            humansize::format_size(size_bytes, humansize::BINARY)
        );
        let mut bar = PercentBar::new(label);
        let result = ops::upload(&client, &args.source, &args.dest, &policy, &mut bar).await;
        match &result {
            Ok(()) => bar.finish(),
            Err(_) => bar.abandon(),
        }
        result
    } else {
        ops::upload(
            &client,
            &args.source,
            &args.dest,
            &policy,
            &mut SilentObserver,
        )
        .await
    };

    match result {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&UploadOutput {
                    source: args.source.display().to_string(),
                    dest: args.dest,
                    size_bytes,
                });
            } else {
                formatter.success(&format!(
                    "Uploaded '{}' to '{}'",
                    args.source.display(),
                    args.dest
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Upload failed: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
