//! REST binder server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ routing (mount, template)
//!                          │                   │
//!                          │            bindings injected
//!                          ▼                   ▼
//!                     params (query, form, JSON body → ParameterStore)
//!                          │
//!                          ▼
//!                     http::resource (GET/POST/PUT/DELETE, process)
//!                          │
//!     Client Response      ▼
//!     ◀────────────── marshal (Payload → JSON) ──▶ http::response
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use rest_binder::config::{load_config, BinderConfig, ConfigWatcher, RouteConfig};
use rest_binder::http::{HttpServer, RequestContext, Resource, Resources};
use rest_binder::lifecycle::{shutdown_signal, Shutdown};
use rest_binder::marshal::Payload;
use rest_binder::observability::{init_logging, metrics};
use rest_binder::RestResult;

#[derive(Debug, Parser)]
#[command(name = "rest-binder", version, about = "Bind request parameters to REST resources")]
struct Cli {
    /// TOML configuration file. Without one, a demo `params` route is served.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload routes when the configuration file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

/// Replies with every bound parameter.
struct ParamsEcho;

#[async_trait]
impl Resource for ParamsEcho {
    async fn process(&self, ctx: &RequestContext) -> RestResult<Option<Payload>> {
        let params: Map<String, Value> = ctx
            .params()
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();

        let mut reply = Map::new();
        reply.insert("method".into(), Value::String(ctx.method().to_string()));
        reply.insert("path".into(), Value::String(ctx.path().to_string()));
        reply.insert("params".into(), Value::Object(params));
        Ok(Some(Payload::from(Value::Object(reply))))
    }
}

fn demo_config() -> BinderConfig {
    BinderConfig {
        routes: vec![RouteConfig {
            name: "params".into(),
            mount: "/params".into(),
            templates: vec!["/{name}".into()],
            resource: "params".into(),
            priority: 0,
        }],
        ..BinderConfig::default()
    }
}

fn resources() -> Resources {
    let mut resources: Resources = HashMap::new();
    resources.insert("params".into(), Arc::new(ParamsEcho));
    resources
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => demo_config(),
    };

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rest-binder starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    // The watcher must outlive the server.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, resources())?;
    let server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    shutdown_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
