//! Orchestrating cloud client.
//!
//! [`CloudClient`] composes the session, shard discovery and path resolution
//! into the cloud operations. It is cheap to clone; every clone shares one
//! cancellation signal and one progress subscriber.

mod operations;

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::info;

use crate::api::ApiClient;
use crate::cancel::CancelSignal;
use crate::error::{CloudError, Result};
use crate::progress::{ProgressCallback, TransferProgress};
use crate::session::SessionHandle;

pub use operations::Download;

/// Cloud client bound to one logged-in session.
///
/// # Example
/// ```no_run
/// use mailrulib::CloudClient;
///
/// # async fn example() -> mailrulib::Result<()> {
/// let client = CloudClient::login("user@mail.ru", "password").await?;
/// if let Some(mut root) = client.get_folder("/").await? {
///     for file in root.files().await {
///         println!("{} ({})", file.name(), file.size());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CloudClient {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    session: SessionHandle,
    cancel: CancelSignal,
    progress: Mutex<Option<ProgressCallback>>,
}

impl fmt::Debug for CloudClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudClient")
            .field("session", &self.inner.session)
            .field("cancelled", &self.inner.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl CloudClient {
    /// Wrap a session, confirming first that the server accepts it.
    pub async fn new(session: SessionHandle) -> Result<Self> {
        session.check_authorization().await?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                session,
                cancel: CancelSignal::new(),
                progress: Mutex::new(None),
            }),
        })
    }

    /// Login and wrap the new session.
    pub async fn login(identity: &str, secret: &str) -> Result<Self> {
        let session = SessionHandle::login(identity, secret).await?;
        Self::new(session).await
    }

    pub fn session(&self) -> &SessionHandle {
        &self.inner.session
    }

    pub(crate) fn api(&self) -> &ApiClient {
        self.inner.session.api()
    }

    /// Prefix every public link starts with.
    pub fn public_link_prefix(&self) -> &str {
        &self.inner.session.config().public_link_prefix
    }

    /// Register a callback for transfer progress.
    ///
    /// Uploads report their start (0%) and completion (100%).
    pub fn on_progress(&self, callback: ProgressCallback) {
        *self.inner.progress.lock() = Some(callback);
    }

    /// Remove the progress callback.
    pub fn clear_progress(&self) {
        *self.inner.progress.lock() = None;
    }

    pub(crate) fn report_progress(&self, progress: &TransferProgress) {
        let callback = self.inner.progress.lock().clone();
        if let Some(callback) = callback {
            callback(progress);
        }
    }

    /// Abort every in-flight transfer of this client.
    ///
    /// The signal stays set: transfers started afterwards fail immediately
    /// with [`CloudError::Cancelled`]. Create a new client to transfer again.
    pub fn abort_all_async_tasks(&self) {
        info!("Aborting all transfers");
        self.inner.cancel.cancel();
    }

    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.inner.cancel
    }

    pub(crate) fn downgrade(&self) -> ClientRef {
        ClientRef(Arc::downgrade(&self.inner))
    }
}

/// Non-owning link from an entry back to its client.
#[derive(Clone, Default)]
pub(crate) struct ClientRef(Weak<ClientInner>);

impl ClientRef {
    /// The owning client, or `NotAuthorized` once every client clone is gone.
    pub(crate) fn upgrade(&self) -> Result<CloudClient> {
        self.0
            .upgrade()
            .map(|inner| CloudClient { inner })
            .ok_or_else(|| CloudError::not_authorized("Cloud client has been dropped", None))
    }
}

impl fmt::Debug for ClientRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClientRef")
            .field(&(self.0.strong_count() > 0))
            .finish()
    }
}
