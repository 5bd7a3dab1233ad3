// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Static worker directory with lazily created runtime handles.
//!
//! Definitions are loaded once and never change. A handle is built the first
//! time an ID is resolved, using a check / lock / recheck sequence so that at
//! most one handle ever exists per ID, even when callers race on first use.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::RegistryError;
use crate::model::{WorkerDefinition, WorkerHandle, WorkerSummary};
use crate::observability::messages::registry::{WorkerHandleCreated, WorkerHandleRetired};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Default)]
struct Handles {
    by_id: HashMap<String, Arc<WorkerHandle>>,
    // Creation order for stable snapshots.
    order: Vec<Arc<WorkerHandle>>,
}

#[derive(Debug)]
pub struct WorkerRegistry {
    definitions: HashMap<String, WorkerDefinition>,
    handles: RwLock<Handles>,
}

impl WorkerRegistry {
    /// Build the registry from the manifest. Later duplicates replace earlier ones;
    /// config validation rejects duplicates before this point.
    pub fn new(definitions: impl IntoIterator<Item = WorkerDefinition>) -> Self {
        let definitions = definitions
            .into_iter()
            .map(|definition| (definition.id.clone(), definition))
            .collect();

        Self {
            definitions,
            handles: RwLock::new(Handles::default()),
        }
    }

    /// Return the handle for `worker_id`, creating it on first use.
    ///
    /// A retired handle is reactivated rather than rebuilt.
    pub fn resolve(&self, worker_id: &str) -> Result<Arc<WorkerHandle>, RegistryError> {
        let definition = self
            .definitions
            .get(worker_id)
            .ok_or_else(|| RegistryError::NotFound(worker_id.to_string()))?;

        if let Some(handle) = self.handles.read().by_id.get(worker_id) {
            handle.set_active(true);
            return Ok(handle.clone());
        }

        let mut handles = self.handles.write();
        if let Some(handle) = handles.by_id.get(worker_id) {
            handle.set_active(true);
            return Ok(handle.clone());
        }

        let handle = Arc::new(WorkerHandle::from_definition(definition));
        handles.by_id.insert(worker_id.to_string(), handle.clone());
        handles.order.push(handle.clone());
        drop(handles);

        WorkerHandleCreated {
            worker_id,
            group: definition.group,
            role: &definition.role,
        }
        .log();

        Ok(handle)
    }

    /// Mark an instantiated handle inactive. Returns `false` if the worker was never
    /// resolved or is already retired.
    pub fn retire(&self, worker_id: &str) -> bool {
        let handles = self.handles.read();
        let Some(handle) = handles.by_id.get(worker_id) else {
            return false;
        };
        let was_active = handle.set_active(false);
        if was_active {
            WorkerHandleRetired { worker_id }.log();
        }
        was_active
    }

    /// Snapshot of active handles, in creation order.
    pub fn list_active(&self) -> Vec<WorkerSummary> {
        self.handles
            .read()
            .order
            .iter()
            .filter(|handle| handle.is_active())
            .map(|handle| handle.summary())
            .collect()
    }

    pub fn contains(&self, worker_id: &str) -> bool {
        self.definitions.contains_key(worker_id)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &WorkerDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
