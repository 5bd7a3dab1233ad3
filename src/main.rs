// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use std::env;
use std::sync::Arc;
use std::time::Instant;
use the_gateway::backends::local::LocalWorker;
use the_gateway::config::{load_and_validate_config, GatewayBuilder};
use the_gateway::model::{InvocationResponse, Payload};
use the_gateway::observability::init_tracing;
use the_gateway::telemetry::worker_topic;

const DEFAULT_REPEAT: usize = 2;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info");

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: {} <config.yaml|config.toml> <worker_id> <payload-json> [repeat]",
            args[0]
        );
        eprintln!(
            "Example: {} configs/gateway.yaml shout '{{\"text\": \"hello world\"}}' 3",
            args[0]
        );
        std::process::exit(1);
    }

    let config_file = &args[1];
    let worker_id = &args[2];
    let payload: Payload = serde_json::from_str(&args[3])
        .with_context(|| format!("Payload must be a JSON object, got: {}", args[3]))?;
    let repeat = match args.get(4) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("Invalid repeat count '{}'", raw))?,
        None => DEFAULT_REPEAT,
    };
    if repeat == 0 {
        bail!("Repeat count must be at least 1");
    }

    let config = load_and_validate_config(config_file)
        .with_context(|| format!("Failed to load {}", config_file))?;
    let gateway = GatewayBuilder::from_config(&config)
        .build(Arc::new(LocalWorker::new()))
        .await;

    println!("🚪 Invocation Gateway");
    println!("═══════════════════════════════════");
    println!("📋 Configuration: {}", config_file);
    println!("👷 Worker: {}", worker_id);
    println!("📦 Payload: {}", serde_json::Value::Object(payload.clone()));
    println!();

    println!("📊 Invocations:");
    for i in 1..=repeat {
        let started = Instant::now();
        let result = gateway.invoke(worker_id, &payload).await;
        let elapsed = started.elapsed();

        let body = serde_json::to_string(&InvocationResponse::from(&result))?;
        println!("  {}. {:?} → {}", i, elapsed, body);
    }

    println!("\n🩺 Health:");
    println!("{}", serde_json::to_string_pretty(&gateway.health())?);

    let topic = worker_topic(worker_id);
    let events = gateway.telemetry().recent(&topic);
    println!("\n📡 Telemetry on '{}' ({} events):", topic, events.len());
    for event in events {
        println!("  • {}", serde_json::to_string(&event)?);
    }

    Ok(())
}
