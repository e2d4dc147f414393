// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Listing, updating and watching Services across all namespaces

use crate::error::Result;
use futures::stream::BoxStream;
use futures::{future, StreamExt};
use k8s_openapi::api::core::v1::Service;
use kube::{
    api::{ListParams, PostParams},
    runtime::{watcher, WatchStreamExt},
    Api, Client, ResourceExt,
};
use std::future::Future;
use tracing::{debug, info, instrument};

/// Something in the watched Service collection changed.
///
/// The variant is informational only, every change leads to the same full
/// rescan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A service was added or modified
    Applied,
    /// A service was deleted
    Deleted,
    /// The watch relisted the collection
    Resynced,
}

/// The operations the syncer needs from the cluster
pub trait ServiceStore: Send + Sync + 'static {
    /// List every service in every namespace
    fn list_all(&self) -> impl Future<Output = Result<Vec<Service>>> + Send;

    /// Replace a service with the given object
    fn update(&self, service: &Service) -> impl Future<Output = Result<()>> + Send;

    /// Subscribe to changes of any service in any namespace
    fn watch(&self) -> BoxStream<'static, Result<ChangeEvent>>;
}

/// `ServiceStore` backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeServiceStore {
    client: Client,
}

impl KubeServiceStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ServiceStore for KubeServiceStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Service>> {
        let services: Api<Service> = Api::all(self.client.clone());
        let service_list = services.list(&ListParams::default()).await?;
        debug!("Listed {} services", service_list.items.len());
        Ok(service_list.items)
    }

    #[instrument(skip(self, service), fields(service = %service.name_any()))]
    async fn update(&self, service: &Service) -> Result<()> {
        let namespace = service.namespace().unwrap_or_default();
        let services: Api<Service> = Api::namespaced(self.client.clone(), &namespace);
        services
            .replace(&service.name_any(), &PostParams::default(), service)
            .await?;
        Ok(())
    }

    fn watch(&self) -> BoxStream<'static, Result<ChangeEvent>> {
        let services: Api<Service> = Api::all(self.client.clone());
        watcher(services, watcher::Config::default())
            .default_backoff()
            .filter_map(|event| {
                future::ready(match event {
                    Ok(event) => change_from_event(event).map(Ok),
                    Err(e) => Some(Err(e.into())),
                })
            })
            .boxed()
    }
}

/// Normalize a watcher event, dropping the ones that carry no change
fn change_from_event(event: watcher::Event<Service>) -> Option<ChangeEvent> {
    match event {
        watcher::Event::Apply(_) | watcher::Event::InitApply(_) => Some(ChangeEvent::Applied),
        watcher::Event::Delete(_) => Some(ChangeEvent::Deleted),
        // A relist does not emit deletes for objects that vanished meanwhile
        watcher::Event::InitDone => Some(ChangeEvent::Resynced),
        watcher::Event::Init => None,
    }
}

/// Verify the service API is reachable before anything is started
pub async fn check_access<S: ServiceStore>(store: &S) -> Result<()> {
    let services = store.list_all().await?;
    info!("Service API is reachable, {} services visible", services.len());
    Ok(())
}
