// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for worker handle lifecycle events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// A worker handle was instantiated on first use.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkerHandleCreated<'a> {
    pub worker_id: &'a str,
    pub group: i64,
    pub role: &'a str,
}

impl Display for WorkerHandleCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Instantiated worker '{}' (group={}, role={})",
            self.worker_id, self.group, self.role
        )
    }
}

impl StructuredLog for WorkerHandleCreated<'_> {
    fn log(&self) {
        tracing::info!(
            worker_id = self.worker_id,
            group = self.group,
            role = self.role,
            "{}", self
        );
    }
}

/// A worker handle was marked inactive.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkerHandleRetired<'a> {
    pub worker_id: &'a str,
}

impl Display for WorkerHandleRetired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Retired worker '{}'", self.worker_id)
    }
}

impl StructuredLog for WorkerHandleRetired<'_> {
    fn log(&self) {
        tracing::info!(worker_id = self.worker_id, "{}", self);
    }
}
