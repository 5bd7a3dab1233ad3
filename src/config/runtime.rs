// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use crate::backends::memory_store::InMemoryStore;
use crate::config::consts::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_CONCURRENCY, DEFAULT_RING_BUFFER_SIZE,
};
use crate::config::{Config, L2Backend};
use crate::gateway::{
    AdmissionGate, CacheSettings, ConcurrencyLimiter, Gateway, GatewayParts, GatewaySettings,
    TieredCache, WorkerRegistry,
};
use crate::model::WorkerDefinition;
use crate::observability::messages::gateway::GatewayStarted;
use crate::observability::messages::StructuredLog;
use crate::telemetry::TelemetryBus;
use crate::traits::{KeyValueStore, Worker};

/// Gateway builder - assembles registry, cache, limiter, telemetry and
/// admission gate into a ready [`Gateway`].
///
/// Start from a validated [`Config`] with [`GatewayBuilder::from_config`], or from
/// a bare manifest with [`GatewayBuilder::new`], then override what you need.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use the_gateway::backends::local::LocalWorker;
/// use the_gateway::config::GatewayBuilder;
/// use the_gateway::gateway::AdmissionGate;
/// use the_gateway::model::WorkerDefinition;
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let gate = Arc::new(AdmissionGate::new());
/// let gateway = GatewayBuilder::new(vec![WorkerDefinition::new("w1", 1, "echo")])
///     .max_concurrency(4)
///     .admission(gate.clone())
///     .build(Arc::new(LocalWorker::new()))
///     .await;
///
/// gate.trigger("maintenance");
/// assert!(gateway.admission().is_halted());
/// # });
/// ```
pub struct GatewayBuilder {
    definitions: Vec<WorkerDefinition>,
    max_concurrency: usize,
    settings: GatewaySettings,
    cache_settings: CacheSettings,
    ring_buffer_size: usize,
    channel_capacity: usize,
    admission: Option<Arc<AdmissionGate>>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl GatewayBuilder {
    pub fn new(definitions: impl IntoIterator<Item = WorkerDefinition>) -> Self {
        Self {
            definitions: definitions.into_iter().collect(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            settings: GatewaySettings::default(),
            cache_settings: CacheSettings::default(),
            ring_buffer_size: DEFAULT_RING_BUFFER_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            admission: None,
            store: None,
        }
    }

    /// Builder preloaded from configuration. `cache.l2: memory` attaches a fresh
    /// [`InMemoryStore`]; attach a different store with [`GatewayBuilder::store`].
    pub fn from_config(cfg: &Config) -> Self {
        let options = &cfg.gateway;
        let builder = Self::new(cfg.workers.iter().cloned())
            .max_concurrency(options.max_concurrency)
            .worker_timeout(options.worker_timeout())
            .single_flight(options.single_flight)
            .cache_ttl(options.cache_ttl())
            .l2_timeout(options.l2_timeout())
            .l1_max_entries(options.l1_max_entries)
            .telemetry(cfg.telemetry.ring_buffer_size, cfg.telemetry.channel_capacity);

        match cfg.cache.l2 {
            L2Backend::Memory => builder.store(Arc::new(InMemoryStore::new())),
            L2Backend::None => builder,
        }
    }

    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn worker_timeout(mut self, timeout: Duration) -> Self {
        self.settings.worker_timeout = timeout;
        self
    }

    pub fn single_flight(mut self, enabled: bool) -> Self {
        self.settings.single_flight = enabled;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_settings.default_ttl = ttl;
        self
    }

    pub fn l2_timeout(mut self, timeout: Duration) -> Self {
        self.cache_settings.l2_timeout = timeout;
        self
    }

    pub fn l1_max_entries(mut self, max_entries: usize) -> Self {
        self.cache_settings.max_entries = max_entries;
        self
    }

    pub fn telemetry(mut self, ring_buffer_size: usize, channel_capacity: usize) -> Self {
        self.ring_buffer_size = ring_buffer_size;
        self.channel_capacity = channel_capacity;
        self
    }

    /// Share an admission gate with whatever else needs to halt the gateway.
    pub fn admission(mut self, admission: Arc<AdmissionGate>) -> Self {
        self.admission = Some(admission);
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Probe the shared store and assemble the gateway. Must run inside a Tokio
    /// runtime; an unreachable store degrades the cache rather than failing.
    pub async fn build(self, worker: Arc<dyn Worker>) -> Gateway {
        let registry = Arc::new(WorkerRegistry::new(self.definitions));
        let cache = Arc::new(TieredCache::connect(self.store, self.cache_settings).await);
        let limiter = Arc::new(ConcurrencyLimiter::new(self.max_concurrency));
        let telemetry = Arc::new(TelemetryBus::new(
            self.ring_buffer_size,
            self.channel_capacity,
        ));
        let admission = self.admission.unwrap_or_default();

        GatewayStarted {
            worker_count: registry.len(),
            max_concurrency: limiter.capacity(),
            l2_status: cache.health().l2.label(),
            single_flight: self.settings.single_flight,
        }
        .log();

        Gateway::new(
            GatewayParts {
                admission,
                registry,
                cache,
                limiter,
                telemetry,
                worker,
            },
            self.settings,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::LocalWorker;
    use crate::config::{CacheOptions, GatewayOptions, TelemetryOptions};
    use crate::gateway::L2Status;

    #[tokio::test]
    async fn from_config_applies_every_option() {
        let cfg = Config {
            gateway: GatewayOptions {
                max_concurrency: 3,
                single_flight: false,
                worker_timeout_seconds: 7,
                l1_max_entries: 50,
                ..GatewayOptions::default()
            },
            cache: CacheOptions {
                l2: L2Backend::Memory,
            },
            telemetry: TelemetryOptions::default(),
            workers: vec![
                WorkerDefinition::new("w1", 1, "echo"),
                WorkerDefinition::new("w2", 1, "uppercase"),
            ],
        };

        let gateway = GatewayBuilder::from_config(&cfg)
            .build(Arc::new(LocalWorker::new()))
            .await;

        assert_eq!(gateway.limiter().capacity(), 3);
        assert_eq!(gateway.registry().len(), 2);
        assert!(!gateway.settings().single_flight);
        assert_eq!(gateway.settings().worker_timeout, Duration::from_secs(7));

        let health = gateway.health();
        assert_eq!(health.cache.l1_max_entries, 50);
        assert_eq!(
            health.cache.l2,
            L2Status::Connected {
                store: "memory".to_string()
            }
        );
    }

    #[tokio::test]
    async fn injected_admission_gate_is_shared() {
        let gate = Arc::new(AdmissionGate::new());
        let gateway = GatewayBuilder::new(Vec::new())
            .admission(gate.clone())
            .build(Arc::new(LocalWorker::new()))
            .await;

        gate.trigger("risk limit");
        assert_eq!(
            gateway.health().halt_reason.as_deref(),
            Some("risk limit")
        );
        assert_eq!(gateway.health().cache.l2, L2Status::Disabled);
    }
}
