// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::WorkerError;
use crate::model::{Payload, WorkerHandle, WorkerOutput};

/// The opaque collaborator that does the expensive work.
///
/// The gateway makes no assumption about latency: calls may take seconds, fail,
/// or panic. Deadlines and panic containment are applied by the orchestrator.
#[async_trait]
pub trait Worker: Send + Sync {
    async fn invoke(
        &self,
        handle: &WorkerHandle,
        payload: &Payload,
    ) -> Result<WorkerOutput, WorkerError>;

    fn name(&self) -> &'static str;
}
