// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test doubles for the Kubernetes API and the service store.

use crate::error::{Result, SyncError};
use crate::kubernetes::{ChangeEvent, ServiceStore};
use futures::channel::mpsc;
use futures::stream::BoxStream;
use futures::StreamExt;
use http::{Request, Response};
use k8s_openapi::api::core::v1::Service;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

type BoxFuture<T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send>>;
use tower::Service as TowerService;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.respond("GET", path, status, body)
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.respond("PUT", path, status, body)
    }

    fn respond(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Method and path of every request received so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl TowerService<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = BoxFuture<std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut Context<'_>,
    ) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(&(method, path))
            .cloned()
            .unwrap_or_else(|| (404, status_json(404, "NotFound")));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock Service JSON object
pub fn service_json(
    namespace: &str,
    name: &str,
    annotations: &[(&str, &str)],
) -> serde_json::Value {
    let annotations: BTreeMap<&str, &str> = annotations.iter().copied().collect();
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": format!("{}-{}-uid", namespace, name),
            "resourceVersion": "1",
            "annotations": annotations
        }
    })
}

/// Create a mock ServiceList JSON response
pub fn service_list_json(services: &[serde_json::Value]) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "ServiceList",
        "metadata": { "resourceVersion": "1" },
        "items": services
    })
    .to_string()
}

/// Create a failure Status response
pub fn status_json(code: u16, reason: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("request failed: {}", reason),
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Build a Service with the given annotations
pub fn make_service(namespace: &str, name: &str, annotations: &[(&str, &str)]) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            annotations: Some(
                annotations
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Ambassador annotation value declaring one Mapping for `host`
pub fn mapping(host: &str) -> String {
    format!(
        "apiVersion: ambassador/v1\nkind: Mapping\nname: m\nprefix: /\nservice: web\nhost: {host}\n"
    )
}

fn server_error() -> SyncError {
    SyncError::KubeError(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: "injected failure".to_string(),
        reason: "InternalError".to_string(),
        code: 500,
    }))
}

/// In-memory `ServiceStore` that records how it is used
#[derive(Default)]
pub struct FakeStore {
    services: Mutex<Vec<Service>>,
    watchers: Mutex<Vec<mpsc::UnboundedSender<Result<ChangeEvent>>>>,
    list_calls: AtomicUsize,
    update_calls: AtomicUsize,
    watch_calls: AtomicUsize,
    fail_lists: AtomicBool,
    fail_updates: AtomicBool,
    list_delay: Mutex<Option<Duration>>,
    on_next_list: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl FakeStore {
    pub fn new(services: Vec<Service>) -> Arc<Self> {
        Arc::new(Self {
            services: Mutex::new(services),
            ..Default::default()
        })
    }

    pub fn service(&self, namespace: &str, name: &str) -> Option<Service> {
        self.services
            .lock()
            .unwrap()
            .iter()
            .find(|s| {
                s.metadata.namespace.as_deref() == Some(namespace)
                    && s.metadata.name.as_deref() == Some(name)
            })
            .cloned()
    }

    /// Add or replace a service without counting it as an update
    pub fn put(&self, service: Service) {
        let mut services = self.services.lock().unwrap();
        services.retain(|s| {
            s.metadata.namespace != service.metadata.namespace
                || s.metadata.name != service.metadata.name
        });
        services.push(service);
    }

    /// Deliver a change to every open watch stream
    pub fn emit(&self, event: ChangeEvent) {
        self.send(|| Ok(event));
    }

    /// Deliver a stream error to every open watch stream
    pub fn emit_error(&self) {
        self.send(|| Err(server_error()));
    }

    fn send(&self, event: impl Fn() -> Result<ChangeEvent>) {
        self.watchers
            .lock()
            .unwrap()
            .retain(|tx| tx.unbounded_send(event()).is_ok());
    }

    pub fn open_watches(&self) -> usize {
        self.watchers
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn watch_calls(&self) -> usize {
        self.watch_calls.load(Ordering::SeqCst)
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make every list take `delay` before returning
    pub fn slow_lists(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    /// Run `hook` once, at the start of the next list
    pub fn on_next_list(&self, hook: impl FnOnce() + Send + 'static) {
        *self.on_next_list.lock().unwrap() = Some(Box::new(hook));
    }
}

impl ServiceStore for FakeStore {
    async fn list_all(&self) -> Result<Vec<Service>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let hook = self.on_next_list.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(self.services.lock().unwrap().clone())
    }

    async fn update(&self, service: &Service) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        self.put(service.clone());
        Ok(())
    }

    fn watch(&self) -> BoxStream<'static, Result<ChangeEvent>> {
        self.watch_calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded();
        self.watchers.lock().unwrap().push(tx);
        rx.boxed()
    }
}
