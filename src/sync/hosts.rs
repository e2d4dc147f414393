// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Host discovery and external-dns annotation diffing

use crate::constants::annotations;
use crate::types::{AmbassadorConfig, ServiceRef};
use k8s_openapi::api::core::v1::Service;
use kube::ResourceExt;
use std::collections::BTreeSet;
use tracing::{debug, error};

/// Result of scanning every service in the cluster once
#[derive(Debug, Default)]
pub struct Scan {
    /// Hosts declared by Ambassador Mappings, sorted and de-duplicated
    pub hosts: BTreeSet<String>,
    /// The Ambassador service, if it was part of the listing
    pub ambassador: Option<Service>,
}

/// Collect Mapping hosts from all services and pick out the Ambassador service
pub fn scan_services(services: Vec<Service>, ambassador: &ServiceRef) -> Scan {
    let mut scan = Scan::default();

    for service in services {
        let namespace = service.namespace().unwrap_or_default();
        let name = service.name_any();

        if let Some(value) = service.annotations().get(annotations::AMBASSADOR_CONFIG) {
            match AmbassadorConfig::parse_all(value) {
                Ok(configs) => {
                    for config in &configs {
                        match config.mapped_host() {
                            Some(host) => {
                                debug!("Service {}/{} has host: {}", namespace, name, host);
                                scan.hosts.insert(host.to_string());
                            }
                            None if config.is_mapping() => {
                                debug!(
                                    "Service {}/{} has no host defined on its ambassador mapping",
                                    namespace, name
                                );
                            }
                            None => {
                                debug!(
                                    "Service {}/{} declares an ambassador {} without a mapping",
                                    namespace, name, config.kind
                                );
                            }
                        }
                    }
                }
                Err(e) => {
                    error!(
                        error = %e,
                        "Failed to parse ambassador annotation config on service {}/{}",
                        namespace, name
                    );
                }
            }
        }

        if ambassador.matches(&service) {
            scan.ambassador = Some(service);
        }
    }

    scan
}

/// Join hosts into the external-dns annotation value
pub fn hostname_value(hosts: &BTreeSet<String>) -> String {
    hosts.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Bring the external-dns annotation on `service` in line with `value`.
///
/// An empty value means the annotation must be absent. Returns whether the
/// service was changed and needs to be written back.
pub fn apply_hostname(service: &mut Service, value: &str) -> bool {
    let current = service
        .annotations()
        .get(annotations::EXTERNAL_DNS_HOSTNAME)
        .cloned();

    match (current.as_deref(), value.is_empty()) {
        (None, true) => false,
        (Some(current), false) if current == value => false,
        (_, true) => {
            service
                .annotations_mut()
                .remove(annotations::EXTERNAL_DNS_HOSTNAME);
            true
        }
        (_, false) => {
            service.annotations_mut().insert(
                annotations::EXTERNAL_DNS_HOSTNAME.to_string(),
                value.to_string(),
            );
            true
        }
    }
}
