// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Ambassador configuration carried in the `getambassador.io/config` annotation.

use crate::constants::MAPPING_KIND;
use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};

/// One Ambassador resource declared inline on a Service.
///
/// Only the fields needed to find hosts are modelled, anything else in the
/// document is ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AmbassadorConfig {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub prefix: String,
    pub service: String,
    pub host: String,
}

impl AmbassadorConfig {
    /// Parse every YAML document in an annotation value.
    ///
    /// Ambassador accepts several `---` separated documents in one
    /// annotation. A single malformed document invalidates the whole value.
    pub fn parse_all(value: &str) -> Result<Vec<Self>> {
        let mut configs = Vec::new();
        for document in serde_yaml::Deserializer::from_str(value) {
            let config = Option::<Self>::deserialize(document)
                .map_err(|e| SyncError::InvalidAnnotation(e.to_string()))?;
            configs.extend(config);
        }
        Ok(configs)
    }

    pub fn is_mapping(&self) -> bool {
        self.kind == MAPPING_KIND
    }

    /// The host routed by this resource, if it is a Mapping that declares one
    pub fn mapped_host(&self) -> Option<&str> {
        (self.is_mapping() && !self.host.is_empty()).then_some(self.host.as_str())
    }
}
