// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes annotation keys read and written by the syncer
pub mod annotations {
    /// Ambassador configuration declared on any Service
    pub const AMBASSADOR_CONFIG: &str = "getambassador.io/config";
    /// Hostnames external-dns should point at the Ambassador service
    pub const EXTERNAL_DNS_HOSTNAME: &str = "external-dns.alpha.kubernetes.io/hostname";
}

/// Ambassador resource kind that carries a `host`
pub const MAPPING_KIND: &str = "Mapping";

/// Reconciliation loop timing
pub mod timing {
    /// Interval between checks of the pending flag
    pub const TICK_INTERVAL_SECS: u64 = 4;
    /// Forced resync interval for the service watch
    pub const RESYNC_INTERVAL_SECS: u64 = 15 * 60;
}
