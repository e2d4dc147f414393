// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Debounced reconciliation of the external-dns annotation on the Ambassador service.

use crate::constants::timing::TICK_INTERVAL_SECS;
use crate::error::{Result, SyncError};
use crate::kubernetes::ServiceStore;
use crate::sync::hosts::{apply_hostname, hostname_value, scan_services, Scan};
use crate::sync::task::BackgroundTask;
use crate::types::ServiceRef;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

/// Result of one successful reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Hosts found across all services, sorted and de-duplicated
    pub hosts: Vec<String>,
    /// Whether the Ambassador service had to be written
    pub updated: bool,
}

/// What a single tick of the loop did
#[derive(Debug)]
pub enum TickOutcome {
    /// Nothing was pending
    Idle,
    /// A pass ran and the pending flag was cleared
    Reconciled(SyncOutcome),
    /// A pass ran and failed, the pending flag is still set
    Failed(SyncError),
}

/// Handle used to request a reconciliation pass
#[derive(Clone)]
pub struct ReconcilerHandle {
    pending: Arc<AtomicBool>,
}

impl ReconcilerHandle {
    /// Request a pass on the next tick. Repeated calls collapse into one pass.
    pub fn mark_pending(&self) {
        self.pending.store(true, Ordering::Release);
    }
}

struct Syncer<S> {
    store: Arc<S>,
    ambassador: ServiceRef,
    pending: Arc<AtomicBool>,
}

impl<S: ServiceStore> Syncer<S> {
    #[instrument(skip(self), fields(service = %self.ambassador))]
    async fn reconcile(&self) -> Result<SyncOutcome> {
        let services = self.store.list_all().await?;
        let Scan { hosts, ambassador } = scan_services(services, &self.ambassador);

        let value = hostname_value(&hosts);
        if value.is_empty() {
            debug!("Found zero hosts to set for external-dns, annotation will be removed");
        } else {
            debug!("Found the following hosts to update external-dns annotation: {}", value);
        }

        let Some(mut service) = ambassador else {
            return Err(SyncError::ServiceNotFound {
                service: self.ambassador.to_string(),
                hosts: hosts.into_iter().collect(),
            });
        };

        let updated = apply_hostname(&mut service, &value);
        if updated {
            self.store.update(&service).await?;
            debug!("Service {} external-dns annotation was updated", self.ambassador);
        } else {
            debug!("Service {} external-dns annotation already up to date", self.ambassador);
        }

        Ok(SyncOutcome {
            hosts: hosts.into_iter().collect(),
            updated,
        })
    }

    async fn tick(&self) -> TickOutcome {
        // Cleared before the pass so a change seen while it runs schedules another one
        if !self.pending.swap(false, Ordering::AcqRel) {
            return TickOutcome::Idle;
        }

        info!("Performing sync between annotations");
        match self.reconcile().await {
            Ok(outcome) => {
                if outcome.hosts.is_empty() {
                    warn!("No hosts found; external-dns annotation is absent");
                } else {
                    info!(
                        "Performed sync between annotations for hosts: {}",
                        outcome.hosts.join(", ")
                    );
                }
                TickOutcome::Reconciled(outcome)
            }
            Err(e) => {
                self.pending.store(true, Ordering::Release);
                error!(error = %e, "Failed to perform sync");
                TickOutcome::Failed(e)
            }
        }
    }

    async fn run(self: Arc<Self>, period: Duration, mut stop_rx: oneshot::Receiver<()>) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut stop_rx => break,
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        debug!("Reconcile loop stopped");
    }
}

/// Periodically checks for pending work and reconciles the Ambassador
/// service's external-dns annotation with the hosts declared across the
/// cluster.
pub struct Reconciler<S> {
    syncer: Arc<Syncer<S>>,
    period: Duration,
    task: Option<BackgroundTask>,
}

impl<S: ServiceStore> Reconciler<S> {
    pub fn new(store: Arc<S>, ambassador: ServiceRef) -> Self {
        Self {
            syncer: Arc::new(Syncer {
                store,
                ambassador,
                pending: Arc::new(AtomicBool::new(false)),
            }),
            period: Duration::from_secs(TICK_INTERVAL_SECS),
            task: None,
        }
    }

    /// Start the tick loop with nothing pending
    pub fn start(&mut self) -> Result<()> {
        if self.task.is_some() {
            return Err(SyncError::AlreadyRunning);
        }

        self.syncer.pending.store(false, Ordering::Release);
        let syncer = self.syncer.clone();
        let period = self.period;
        self.task = Some(BackgroundTask::spawn(move |stop_rx| syncer.run(period, stop_rx)));

        info!("Reconciler started for service {}", self.syncer.ambassador);
        Ok(())
    }

    /// Stop the tick loop, waiting for a pass in progress to finish
    pub async fn stop(&mut self) -> Result<()> {
        let task = self.task.take().ok_or(SyncError::NotRunning)?;
        task.stop().await?;

        info!("Reconciler stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn handle(&self) -> ReconcilerHandle {
        ReconcilerHandle {
            pending: self.syncer.pending.clone(),
        }
    }

    pub fn mark_pending(&self) {
        self.handle().mark_pending();
    }

    pub fn is_pending(&self) -> bool {
        self.syncer.pending.load(Ordering::Acquire)
    }

    /// Run one full pass: list all services, collect hosts and update the
    /// Ambassador service when its annotation differs.
    pub async fn reconcile(&self) -> Result<SyncOutcome> {
        self.syncer.reconcile().await
    }

    /// Run one step of the tick loop without waiting for the timer
    pub async fn tick(&self) -> TickOutcome {
        self.syncer.tick().await
    }
}
