//! # Demo: two services, one broadcast, programmatic stop
//!
//! - `S1` customizes init/start/stop and keeps the default notify.
//! - `S2` customizes init/start/notify and keeps the default stop.
//!
//! The runtime runs on its own task; `main` waits a second, broadcasts a
//! message, then requests stop. Press Ctrl-C instead to stop via signal.
//!
//! ## Run
//! ```bash
//! RUST_LOG=svcwire=debug cargo run --example demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use svcwire::{Config, LogWriter, Message, Registry, Runtime, Service, ServiceError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct S1;

#[async_trait]
impl Service for S1 {
    fn name(&self) -> &str {
        "S1"
    }
    async fn init(&self) -> Result<(), ServiceError> {
        println!("S1 init");
        Ok(())
    }
    async fn start(&self) -> Result<(), ServiceError> {
        println!("S1 start");
        Ok(())
    }
    async fn stop(&self) -> Result<(), ServiceError> {
        println!("S1 stop");
        Ok(())
    }
}

struct S2;

#[async_trait]
impl Service for S2 {
    fn name(&self) -> &str {
        "S2"
    }
    async fn init(&self) -> Result<(), ServiceError> {
        println!("S2 init");
        Ok(())
    }
    async fn start(&self) -> Result<(), ServiceError> {
        println!("S2 start");
        Ok(())
    }
    async fn notify(&self, msg: &Message) -> Result<(), ServiceError> {
        println!(
            "S2 notify: key={} data={:?}",
            msg.key(),
            msg.data::<&str>().copied().unwrap_or("<non-text>")
        );
        Ok(())
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "svcwire=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut registry = Registry::new();
    registry.register(Arc::new(S1));
    registry.register(Arc::new(S2));

    let runtime = Runtime::builder(Config::default())
        .with_subscriber(Arc::new(LogWriter::new()))
        .build(registry);

    let run = tokio::spawn({
        let runtime = runtime.clone();
        async move { runtime.run().await }
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    runtime
        .notify(&Message::new("NullMessage", "change"))
        .await?;
    runtime.request_stop();

    match run.await? {
        Ok(()) => println!("runtime stopped gracefully"),
        Err(e) => println!("runtime stopped with error: {e}"),
    }
    runtime.shutdown_subscribers().await;
    Ok(())
}
