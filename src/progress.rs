//! Progress reporting for file transfers.

use std::sync::Arc;

use crate::fs::Size;

/// Progress information for uploads.
///
/// Only the start (0%) and completion (100%) of a transfer are reported.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    /// Progress in percent (0 to 100)
    pub percentage: u8,
    /// Total bytes to transfer
    pub total: Size,
    /// Bytes transferred so far
    pub transferred: Size,
    /// Name of the file being transferred
    pub filename: String,
}

impl TransferProgress {
    /// Create a new progress report.
    pub fn new(transferred: i64, total: i64, filename: impl Into<String>) -> Self {
        let percentage = if total <= 0 {
            0
        } else {
            ((transferred.clamp(0, total) as f64 / total as f64) * 100.0) as u8
        };
        Self {
            percentage,
            total: Size::new(total),
            transferred: Size::new(transferred),
            filename: filename.into(),
        }
    }

    /// Check if transfer is complete.
    pub fn is_complete(&self) -> bool {
        self.transferred.bytes() >= self.total.bytes()
    }
}

/// Type alias for progress callback function.
pub type ProgressCallback = Arc<dyn Fn(&TransferProgress) + Send + Sync>;

/// Create a simple progress callback that prints to stdout.
///
/// # Example
/// ```no_run
/// use mailrulib::progress::make_progress_printer;
///
/// let callback = make_progress_printer();
/// ```
pub fn make_progress_printer() -> ProgressCallback {
    Arc::new(|progress: &TransferProgress| {
        println!(
            "[{:>3}%] {} - {} / {}",
            progress.percentage, progress.filename, progress.transferred, progress.total
        );
    })
}
