// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::ServiceRef;
use clap::Parser;
use std::path::PathBuf;

/// Connector between Ambassador and Kubernetes external-dns.
///
/// Watches for host entries in Ambassador annotations, automatically updating
/// the external-dns annotation on the Ambassador service so external-dns
/// points each host at the service's external IP.
#[derive(Parser, Debug, Clone)]
#[command(name = "external-ambassador", version)]
pub struct Config {
    /// Enable debug output
    #[arg(short, long, env = "AMBASSADOR_DEBUG")]
    pub debug: bool,

    /// Kubeconfig file to use (in-cluster or $KUBECONFIG when unset)
    #[arg(short = 'c', long, env = "KUBECONFIG_FILE")]
    pub kubeconfig: Option<PathBuf>,

    /// Namespace of the Ambassador service
    #[arg(short, long, env = "AMBASSADOR_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Name of the Ambassador service
    #[arg(short, long, env = "AMBASSADOR_SERVICE", default_value = "ambassador")]
    pub service: String,
}

impl Config {
    /// The service whose external-dns annotation is kept in sync
    pub fn ambassador_service(&self) -> ServiceRef {
        ServiceRef::new(&self.namespace, &self.service)
    }

    /// Default tracing directive when RUST_LOG is not set
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "info,external_ambassador=debug"
        } else {
            "info"
        }
    }
}
