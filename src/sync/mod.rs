// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Keeping the external-dns annotation in sync with Ambassador mappings.

pub mod hosts;
pub mod reconciler;
mod task;
pub mod watcher;

pub use reconciler::{Reconciler, ReconcilerHandle, SyncOutcome, TickOutcome};
pub use watcher::Watcher;
