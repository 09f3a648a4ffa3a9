// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Readme Demo

Publishes a value on `<kind>.<app>/<instance>.<topic>` every interval and
prints whatever its receiver gets back. On first run the receiver has no
recorded subscription, so it is wired to the demo sender and the wiring is
saved for later runs.

Usage:
  cargo run --bin industry-readme -- [--name <instance>] [--kind bool|int|double|string]

Example:
  cargo run --bin industry-readme -- -n alice --kind int --interval-ms 250 --debug-industry-io
*/

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use industry::config::{load_settings, IndustrySettings};
use industry::io::{ApplicationContext, Payload, Receiver, Sender, ValueKind};
use industry::observability::{debug_flags_help, init_logging, parse_debug_flags};

/// Industry readme demo - one sender, one receiver, one topology file
#[derive(Parser, Debug)]
#[command(name = "industry-readme", version, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Instance name; namespaces topics and the topology file
    #[arg(short = 'n', long, default_value = "default")]
    name: String,

    /// Application name
    #[arg(long, default_value = "readme")]
    app: String,

    /// Value type: bool, int, double or string
    #[arg(long, default_value = "bool")]
    kind: String,

    /// Sender topic name
    #[arg(long, default_value = "NASDAQ")]
    topic: String,

    /// Receiver name
    #[arg(long, default_value = "feed")]
    receiver: String,

    /// Milliseconds between published values
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Override the transport host
    #[arg(long)]
    host: Option<String>,

    /// Override the transport port
    #[arg(long)]
    port: Option<u16>,

    /// Override the topology directory (default: ~/.industry/config)
    #[arg(long)]
    config_root: Option<PathBuf>,

    /// Settings file (default: $INDUSTRY_SETTINGS_PATH or ./industry.toml)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Also write JSON logs under this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(host) = &self.host {
            overrides.insert("zmq_host".to_string(), host.clone());
        }
        if let Some(port) = self.port {
            overrides.insert("zmq_port".to_string(), port.to_string());
        }
        if let Some(root) = &self.config_root {
            overrides.insert("config_root".to_string(), root.display().to_string());
        }
        overrides
    }
}

/// Value published on the n-th tick
trait DemoValue: Payload {
    fn for_tick(tick: u64) -> Self;
}

impl DemoValue for bool {
    fn for_tick(tick: u64) -> Self {
        tick % 2 == 0
    }
}

impl DemoValue for i32 {
    fn for_tick(tick: u64) -> Self {
        (tick % i32::MAX as u64) as i32
    }
}

impl DemoValue for f64 {
    fn for_tick(tick: u64) -> Self {
        tick as f64 * 0.5
    }
}

impl DemoValue for String {
    fn for_tick(tick: u64) -> Self {
        format!("tick {}", tick)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // --debug-* flags belong to the logging setup, not clap
    let args = Args::parse_from(env::args().filter(|arg| !arg.starts_with("--debug-")));

    let debug_flags = parse_debug_flags();
    let _logging = init_logging(&debug_flags, args.log_dir.as_deref())?;

    let kind: ValueKind = args.kind.parse()?;
    let settings = load_settings(args.settings.as_deref(), Some(&args.overrides()))
        .context("Failed to load settings")?;

    match kind {
        ValueKind::Bool => run::<bool>(&args, settings).await,
        ValueKind::Int => run::<i32>(&args, settings).await,
        ValueKind::Double => run::<f64>(&args, settings).await,
        ValueKind::String => run::<String>(&args, settings).await,
    }
}

async fn run<T: DemoValue>(args: &Args, settings: IndustrySettings) -> Result<()> {
    let ctx = ApplicationContext::initialize(args.app.as_str(), args.name.as_str(), settings)?;

    let sender = Sender::<T>::new(Arc::clone(&ctx), &args.topic)?;
    let receiver = Receiver::<T>::new(Arc::clone(&ctx), &args.receiver)?;

    if receiver.subscription().is_none() {
        receiver.subscribe_to(sender.topic())?;
        ctx.assign_subscription(receiver.address(), sender.topic());
        info!("Wired {} to {}", receiver.address(), sender.topic());
    }

    arm(receiver);

    info!(
        "Publishing on {} every {}ms (Press Ctrl+C to stop)",
        sender.topic(),
        args.interval_ms
    );

    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    let mut tick: u64 = 0;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = sender.send(T::for_tick(tick)) {
                    warn!("Send on {} failed: {}", sender.topic(), e);
                }
                tick += 1;
            }
            result = &mut shutdown => {
                result.context("Failed to listen for shutdown signals")?;
                break;
            }
        }
    }

    info!("Shutdown signal received...");
    ctx.stop();
    ctx.flush().await?;
    info!("Shutdown complete ({} values sent)", tick);
    Ok(())
}

// Callbacks are one-shot; the demo re-arms after every delivery
fn arm<T: DemoValue>(receiver: Receiver<T>) {
    let next = receiver.clone();
    receiver.set_callback(move |value| {
        info!("{} received {:?}", next.address(), value);
        arm(next);
    });
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
