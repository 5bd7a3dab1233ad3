// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Static worker entry from the manifest. Never mutated after load.
///
/// # Example
/// ```yaml
/// id: "analyst-1"
/// group: 2
/// role: "word_count"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDefinition {
    pub id: String,
    #[serde(default)]
    pub group: i64,
    pub role: String,
}

impl WorkerDefinition {
    pub fn new(id: impl Into<String>, group: i64, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group,
            role: role.into(),
        }
    }
}

/// Runtime wrapper around a [`WorkerDefinition`], owned by the registry.
#[derive(Debug)]
pub struct WorkerHandle {
    definition: WorkerDefinition,
    active: AtomicBool,
}

impl WorkerHandle {
    pub(crate) fn from_definition(definition: &WorkerDefinition) -> Self {
        Self {
            definition: definition.clone(),
            active: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn group(&self) -> i64 {
        self.definition.group
    }

    pub fn role(&self) -> &str {
        &self.definition.role
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn set_active(&self, active: bool) -> bool {
        self.active.swap(active, Ordering::AcqRel)
    }

    pub fn summary(&self) -> WorkerSummary {
        WorkerSummary {
            id: self.definition.id.clone(),
            group: self.definition.group,
            role: self.definition.role.clone(),
            active: self.is_active(),
        }
    }
}

/// Read-only snapshot of a handle, used for observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    pub id: String,
    pub group: i64,
    pub role: String,
    pub active: bool,
}
