// Page activation lifecycle for the Projects feed
use futures::future::{AbortHandle, Abortable};
use tokio::sync::oneshot;
use tracing::debug;

use crate::{
    feed::FeedLoader,
    models::{FeedState, FeedStatus},
};

/// One activation of the Projects page.
///
/// Activating spawns a single fetch. The session starts out `Loading` and
/// picks up the settled state once the fetch finishes. Dropping the
/// session (or calling `abandon`) aborts the fetch, so a response that
/// arrives afterwards goes nowhere.
#[derive(Debug)]
pub struct PageSession {
    state: FeedState,
    pending: Option<oneshot::Receiver<FeedState>>,
    abort_handle: AbortHandle,
}

impl PageSession {
    /// Start a fresh fetch. Must be called from within a tokio runtime.
    pub fn activate(loader: FeedLoader) -> Self {
        let (tx, rx) = oneshot::channel();
        let (abort_handle, abort_registration) = AbortHandle::new_pair();
        let state = FeedState::loading(loader.request().excluded().clone());

        debug!("Activating projects page for {}", loader.request().username());

        let task = async move {
            let settled = loader.fetch_feed().await;
            // receiver is gone if the page was left
            let _ = tx.send(settled);
        };

        tokio::spawn(async move {
            let _ = Abortable::new(task, abort_registration).await;
        });

        Self {
            state,
            pending: Some(rx),
            abort_handle,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn status(&self) -> FeedStatus {
        self.state.status()
    }

    /// Pick up the fetch result if it has arrived. Returns `true` when the
    /// state changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(settled) => {
                self.pending = None;
                self.state = settled;
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                self.fail_orphaned();
                true
            }
        }
    }

    /// Wait for the fetch to settle.
    ///
    /// Cancel-safe: if this future is dropped early the receiver stays in
    /// the session and a later `poll` or `wait` still picks up the result.
    pub async fn wait(&mut self) -> &FeedState {
        if let Some(rx) = self.pending.as_mut() {
            let outcome = rx.await;
            self.pending = None;
            match outcome {
                Ok(settled) => self.state = settled,
                Err(_) => self.fail_orphaned(),
            }
        }
        &self.state
    }

    /// Leave the page. The in-flight fetch, if any, is aborted.
    pub fn abandon(self) {
        drop(self);
    }

    /// The fetch task went away without reporting (it panicked).
    fn fail_orphaned(&mut self) {
        debug!("Feed task ended without a result");
        if let Err(e) = self.state.fail() {
            debug!("Ignoring orphaned fetch: {}", e);
        }
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        if self.pending.is_some() {
            debug!("Abandoning projects page before the feed settled");
        }
        self.abort_handle.abort();
    }
}
