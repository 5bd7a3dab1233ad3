// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::time::Duration;

use super::roles;
use crate::errors::WorkerError;
use crate::model::{Payload, WorkerHandle, WorkerOutput};
use crate::traits::Worker;

/// In-process worker. The handle's role selects the behavior.
#[derive(Debug, Clone, Default)]
pub struct LocalWorker {
    latency: Option<Duration>,
}

impl LocalWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a slow backend by sleeping before each call.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
        }
    }
}

#[async_trait]
impl Worker for LocalWorker {
    async fn invoke(
        &self,
        handle: &WorkerHandle,
        payload: &Payload,
    ) -> Result<WorkerOutput, WorkerError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let output = roles::run(handle.role(), payload)?;
        Ok(output
            .with_metadata("worker_id", handle.id().into())
            .with_metadata("group", handle.group().into()))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::WorkerRegistry;
    use crate::model::WorkerDefinition;
    use serde_json::json;

    #[tokio::test]
    async fn dispatches_on_role_and_tags_metadata() {
        let registry = WorkerRegistry::new(vec![WorkerDefinition::new("shout", 3, "uppercase")]);
        let handle = registry.resolve("shout").unwrap();
        let payload = json!({"text": "quiet"}).as_object().cloned().unwrap();

        let output = LocalWorker::new().invoke(&handle, &payload).await.unwrap();

        assert_eq!(output.response, json!({"text": "QUIET"}));
        assert_eq!(output.metadata["worker_id"], json!("shout"));
        assert_eq!(output.metadata["group"], json!(3));
    }

    #[tokio::test]
    async fn unknown_role_fails() {
        let registry = WorkerRegistry::new(vec![WorkerDefinition::new("w", 0, "translate")]);
        let handle = registry.resolve("w").unwrap();

        let err = LocalWorker::new()
            .invoke(&handle, &Payload::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("translate"));
    }
}
