// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes access: client creation and the Service store the syncer runs against.

pub mod client;
pub mod store;

pub use client::create_client;
pub use store::{check_access, ChangeEvent, KubeServiceStore, ServiceStore};
