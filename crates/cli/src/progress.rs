//! Transfer progress rendering
//!
//! Bridges the core engine's percent-complete notifications to an
//! indicatif bar. The observer seam keeps presentation out of the
//! engine, so quiet and JSON modes can swap in a no-op.

use indicatif::{ProgressBar, ProgressStyle};

use dc_core::TransferObserver;

/// Percent-complete progress bar for one transfer
pub struct PercentBar {
    bar: ProgressBar,
}

impl PercentBar {
    pub fn new(label: impl Into<String>) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos:>3}%")
                .expect("valid progress template")
                .progress_chars("=> "),
        );
        bar.set_message(label.into());
        Self { bar }
    }

    /// Complete the bar and leave it on screen
    pub fn finish(&self) {
        self.bar.set_position(100);
        self.bar.finish();
    }

    /// Drop the bar from the screen, e.g. after a failed transfer
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl TransferObserver for PercentBar {
    fn on_percent(&mut self, percent: u8) {
        self.bar.set_position(u64::from(percent));
    }
}

/// Observer that drops every notification (quiet and JSON modes)
pub struct SilentObserver;

impl TransferObserver for SilentObserver {
    fn on_percent(&mut self, _percent: u8) {}
}
