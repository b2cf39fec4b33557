//! Transfer engine: drives upload and download sessions to completion
//!
//! Uploads run as an explicit state machine over chunk outcomes: a chunk
//! either lands (`Sent`), failed transiently (`Retry`, backed off and the
//! same chunk re-stepped within the same session), or failed for good
//! (`Fatal`, surfaced immediately). Exactly one session is opened per
//! transfer call; the retry loop never re-opens a fresh session.
//!
//! Downloads propagate the first failure without retrying. The asymmetry
//! is deliberate; see DESIGN.md.

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::store::{ChunkStatus, DownloadSession, UploadSession};

/// Receives percent-complete notifications from the engine.
///
/// Injected by the caller so presentation (progress bar, log line, test
/// capture) stays out of the engine.
pub trait TransferObserver: Send {
    fn on_percent(&mut self, percent: u8);
}

impl<F: FnMut(u8) + Send> TransferObserver for F {
    fn on_percent(&mut self, percent: u8) {
        self(percent)
    }
}

/// Classified result of one upload chunk attempt
enum ChunkOutcome {
    Sent(ChunkStatus),
    Retry(Error),
    Fatal(Error),
}

fn classify(result: Result<ChunkStatus>) -> ChunkOutcome {
    match result {
        Ok(status) => ChunkOutcome::Sent(status),
        Err(e) if e.is_transient() => ChunkOutcome::Retry(e),
        Err(e) => ChunkOutcome::Fatal(e),
    }
}

fn percent_of(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0) as u8
}

/// Drive an upload session to completion.
///
/// Transient chunk failures are retried in place with capped exponential
/// backoff; the retry counter persists across chunks within the session
/// and saturates at the policy cap. Every other failure is fatal,
/// including a not-found-class response mid-upload.
pub async fn run_upload(
    session: &mut dyn UploadSession,
    policy: &RetryPolicy,
    observer: &mut dyn TransferObserver,
) -> Result<()> {
    let mut retries: u32 = 0;

    loop {
        match classify(session.step().await) {
            ChunkOutcome::Sent(status) => {
                if let Some(fraction) = status.fraction {
                    observer.on_percent(percent_of(fraction));
                }
                if status.done {
                    return Ok(());
                }
            }
            ChunkOutcome::Retry(error) => {
                let delay = policy.backoff(retries);
                tracing::warn!(
                    retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "transient upload failure, backing off"
                );
                tokio::time::sleep(delay).await;
                retries = policy.bump(retries);
            }
            ChunkOutcome::Fatal(error) => return Err(error),
        }
    }
}

/// Drive a download session to completion.
///
/// No retry policy: any failure propagates immediately.
pub async fn run_download(
    session: &mut dyn DownloadSession,
    observer: &mut dyn TransferObserver,
) -> Result<()> {
    loop {
        let status = session.step().await?;
        if let Some(fraction) = status.fraction {
            observer.on_percent(percent_of(fraction));
        }
        if status.done {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;

    /// Session that replays a scripted sequence of step results
    struct Scripted {
        steps: VecDeque<Result<ChunkStatus>>,
        calls: usize,
    }

    impl Scripted {
        fn new(steps: Vec<Result<ChunkStatus>>) -> Self {
            Self {
                steps: steps.into(),
                calls: 0,
            }
        }
    }

    #[async_trait]
    impl UploadSession for Scripted {
        async fn step(&mut self) -> Result<ChunkStatus> {
            self.calls += 1;
            self.steps.pop_front().expect("script exhausted")
        }
    }

    #[async_trait]
    impl DownloadSession for Scripted {
        async fn step(&mut self) -> Result<ChunkStatus> {
            self.calls += 1;
            self.steps.pop_front().expect("script exhausted")
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(1), 5)
    }

    #[tokio::test]
    async fn test_upload_reports_floored_percent() {
        let mut session = Scripted::new(vec![
            Ok(ChunkStatus::in_progress(0.336)),
            Ok(ChunkStatus::in_progress(0.999)),
            Ok(ChunkStatus::finished()),
        ]);
        let mut seen = Vec::new();

        run_upload(&mut session, &fast_policy(), &mut |p: u8| seen.push(p))
            .await
            .unwrap();

        assert_eq!(seen, vec![33, 99, 100]);
        assert_eq!(session.calls, 3);
    }

    #[tokio::test]
    async fn test_upload_skips_report_without_progress() {
        let mut session = Scripted::new(vec![
            Ok(ChunkStatus {
                fraction: None,
                done: false,
            }),
            Ok(ChunkStatus::finished()),
        ]);
        let mut seen = Vec::new();

        run_upload(&mut session, &fast_policy(), &mut |p: u8| seen.push(p))
            .await
            .unwrap();

        assert_eq!(seen, vec![100]);
    }

    #[tokio::test]
    async fn test_upload_retries_transient_failures_in_place() {
        let mut session = Scripted::new(vec![
            Err(Error::from_status(503, "unavailable")),
            Err(Error::from_status(500, "internal")),
            Ok(ChunkStatus::in_progress(0.5)),
            Err(Error::from_status(502, "bad gateway")),
            Ok(ChunkStatus::finished()),
        ]);
        let mut seen = Vec::new();

        run_upload(&mut session, &fast_policy(), &mut |p: u8| seen.push(p))
            .await
            .unwrap();

        // Same session stepped through every failure; no re-open exists.
        assert_eq!(session.calls, 5);
        assert_eq!(seen, vec![50, 100]);
    }

    #[tokio::test]
    async fn test_upload_not_found_is_fatal() {
        // A vanished destination must surface, not pass for success.
        let mut session = Scripted::new(vec![
            Ok(ChunkStatus::in_progress(0.2)),
            Err(Error::from_status(404, "parent disappeared")),
        ]);

        let err = run_upload(&mut session, &fast_policy(), &mut |_: u8| {})
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(session.calls, 2);
    }

    #[tokio::test]
    async fn test_upload_permanent_error_propagates_unretried() {
        let mut session = Scripted::new(vec![Err(Error::from_status(403, "forbidden"))]);

        let err = run_upload(&mut session, &fast_policy(), &mut |_: u8| {})
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Service { status: 403, .. }));
        assert_eq!(session.calls, 1);
    }

    #[tokio::test]
    async fn test_download_reports_every_chunk() {
        let mut session = Scripted::new(vec![
            Ok(ChunkStatus::in_progress(0.25)),
            Ok(ChunkStatus::in_progress(0.5)),
            Ok(ChunkStatus::finished()),
        ]);
        let mut seen = Vec::new();

        run_download(&mut session, &mut |p: u8| seen.push(p))
            .await
            .unwrap();

        assert_eq!(seen, vec![25, 50, 100]);
    }

    #[tokio::test]
    async fn test_download_propagates_first_error() {
        // No retry on the download side, even for a transient class.
        let mut session = Scripted::new(vec![
            Ok(ChunkStatus::in_progress(0.25)),
            Err(Error::from_status(503, "unavailable")),
        ]);

        let err = run_download(&mut session, &mut |_: u8| {})
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert_eq!(session.calls, 2);
    }
}
