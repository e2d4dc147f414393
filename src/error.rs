// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("already running")]
    AlreadyRunning,

    #[error("not running")]
    NotRunning,

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Watch stream error: {0}")]
    WatchError(#[from] kube::runtime::watcher::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    #[error("Service {service} not found, {count} hosts left unwritten", count = .hosts.len())]
    ServiceNotFound { service: String, hosts: Vec<String> },

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
