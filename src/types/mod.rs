// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Annotation payloads and resource identities.

pub mod ambassador;
pub mod service;

pub use ambassador::AmbassadorConfig;
pub use service::ServiceRef;
