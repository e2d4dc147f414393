// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service watcher - turns change notifications into reconciliation requests.

use crate::constants::timing::RESYNC_INTERVAL_SECS;
use crate::error::{Result, SyncError};
use crate::kubernetes::{ChangeEvent, ServiceStore};
use crate::sync::reconciler::{Reconciler, ReconcilerHandle};
use crate::sync::task::BackgroundTask;
use crate::types::ServiceRef;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

/// Watches services in all namespaces and owns the reconciler it feeds.
///
/// Starting the watcher starts the reconciler, stopping it stops both.
pub struct Watcher<S> {
    store: Arc<S>,
    reconciler: Reconciler<S>,
    task: Option<BackgroundTask>,
}

impl<S: ServiceStore> Watcher<S> {
    pub fn new(store: Arc<S>, ambassador: ServiceRef) -> Self {
        Self {
            reconciler: Reconciler::new(store.clone(), ambassador),
            store,
            task: None,
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.task.is_some() {
            return Err(SyncError::AlreadyRunning);
        }
        self.reconciler.start()?;

        let changes = self.store.watch();
        let handle = self.reconciler.handle();
        let resync = Duration::from_secs(RESYNC_INTERVAL_SECS);
        self.task = Some(BackgroundTask::spawn(move |stop_rx| {
            watch_services(changes, handle, resync, stop_rx)
        }));

        info!("Watching services in all namespaces");
        Ok(())
    }

    /// Stop watching, then stop the reconciler once the watch loop has exited
    pub async fn stop(&mut self) -> Result<()> {
        let task = self.task.take().ok_or(SyncError::NotRunning)?;
        let watch_result = task.stop().await;
        let reconciler_result = self.reconciler.stop().await;

        info!("Watcher stopped");
        watch_result.and(reconciler_result)
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }
}

async fn watch_services(
    mut changes: BoxStream<'static, Result<ChangeEvent>>,
    reconciler: ReconcilerHandle,
    resync: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut resync_timer = interval_at(Instant::now() + resync, resync);
    let mut stream_open = true;

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            change = changes.next(), if stream_open => match change {
                Some(Ok(change)) => {
                    debug!(?change, "Service change observed");
                    reconciler.mark_pending();
                }
                Some(Err(e)) => warn!(error = %e, "Service watch error"),
                None => {
                    warn!("Service watch stream ended, relying on periodic resync");
                    stream_open = false;
                }
            },
            _ = resync_timer.tick() => {
                debug!("Periodic resync");
                reconciler.mark_pending();
            }
        }
    }

    debug!("Watch loop stopped");
}
