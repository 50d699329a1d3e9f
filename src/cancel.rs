//! Session-wide cancellation of in-flight transfers.

use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use tokio::sync::watch;

use crate::error::{CloudError, Result};
use crate::http::ByteStream;

/// One-shot signal shared by every transfer of a client.
///
/// Once triggered it stays triggered: running transfers fail with
/// [`CloudError::Cancelled`] and new ones fail before sending anything.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger the signal.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the signal has been triggered.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Drive `fut` until it completes or the signal fires.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(CloudError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(CloudError::Cancelled),
            result = fut => result,
        }
    }

    /// Wrap a body stream so it yields [`CloudError::Cancelled`] and ends when the signal fires.
    pub fn guard_stream(&self, body: ByteStream) -> ByteStream {
        let signal = self.clone();
        stream::unfold(Some((body, signal)), |state| async move {
            let (mut body, signal) = state?;
            tokio::select! {
                biased;
                _ = signal.cancelled() => Some((Err(CloudError::Cancelled), None)),
                chunk = body.next() => chunk.map(|chunk| (chunk, Some((body, signal)))),
            }
        })
        .boxed()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
