// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Background loops that stop on request and acknowledge when done.

use crate::error::{Result, SyncError};
use std::future::Future;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A spawned loop together with its stop signal.
///
/// The loop receives the stop receiver and is expected to exit at its next
/// suspension point once it fires (or once this handle is dropped).
pub(crate) struct BackgroundTask {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl BackgroundTask {
    pub(crate) fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(oneshot::Receiver<()>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(run(stop_rx));
        Self { stop_tx, handle }
    }

    /// Request the loop to exit and wait until it has
    pub(crate) async fn stop(self) -> Result<()> {
        // The loop may already be gone, in which case there is no one to tell
        let _ = self.stop_tx.send(());
        self.handle
            .await
            .map_err(|e| SyncError::TaskFailed(e.to_string()))
    }
}
