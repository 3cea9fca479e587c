//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use rest_binder::config::{BinderConfig, RouteConfig};
use rest_binder::http::{HttpServer, RequestContext, Resource, Resources};
use rest_binder::marshal::Payload;
use rest_binder::{RestResult, Shutdown};

/// A server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<BinderConfig>,
    handle: JoinHandle<io::Result<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server to drain.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

pub async fn spawn_server(config: BinderConfig, resources: Resources) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, resources).unwrap();
    let handle = tokio::spawn(server.run(listener, config_rx, shutdown.subscribe()));

    TestServer {
        addr,
        shutdown,
        config_tx,
        handle,
    }
}

pub fn route(name: &str, mount: &str, templates: &[&str], resource: &str) -> RouteConfig {
    RouteConfig {
        name: name.into(),
        mount: mount.into(),
        templates: templates.iter().map(|t| t.to_string()).collect(),
        resource: resource.into(),
        priority: 0,
    }
}

pub fn config(routes: Vec<RouteConfig>) -> BinderConfig {
    BinderConfig {
        routes,
        ..BinderConfig::default()
    }
}

/// `users`, `silent`, `echo`, `boom` and `slow` resources.
pub fn resources() -> Resources {
    let mut resources: Resources = HashMap::new();
    resources.insert("users".into(), Arc::new(Users));
    resources.insert("silent".into(), Arc::new(Silent));
    resources.insert("echo".into(), Arc::new(Echo));
    resources.insert("boom".into(), Arc::new(Boom));
    resources.insert("slow".into(), Arc::new(Slow));
    resources
}

#[derive(Serialize)]
struct User {
    id: i32,
    section: String,
}

/// Reads path and query parameters of a users collection.
pub struct Users;

#[async_trait]
impl Resource for Users {
    async fn get(&self, ctx: &RequestContext) -> RestResult<Option<Payload>> {
        let user = User {
            id: ctx.params().get_int("id")?,
            section: ctx.params().get_string_or("section", "profile"),
        };
        Ok(Some(Payload::serialized(&user)))
    }

    async fn post(&self, ctx: &RequestContext) -> RestResult<Option<Payload>> {
        let name = ctx.params().get_string("name")?;
        let tags = ctx.params().get_list_or("tags", Vec::new());
        Ok(Some(Payload::from(json!({ "name": name, "tags": tags }))))
    }

    async fn delete(&self, ctx: &RequestContext) -> RestResult<Option<Payload>> {
        let id = ctx.params().get_long("id")?;
        Ok(Some(Payload::from(json!({
            "deleted": id,
            "received_as": ctx.original_method().as_str(),
        }))))
    }
}

/// Never replies.
pub struct Silent;

#[async_trait]
impl Resource for Silent {}

/// Replies with the raw parameter store and request metadata.
pub struct Echo;

#[async_trait]
impl Resource for Echo {
    async fn process(&self, ctx: &RequestContext) -> RestResult<Option<Payload>> {
        let params: serde_json::Map<String, serde_json::Value> = ctx
            .params()
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();
        Ok(Some(Payload::from(json!({
            "method": ctx.method().as_str(),
            "path_info": ctx.path_info(),
            "request_id": ctx.request_id(),
            "params": params,
        }))))
    }
}

/// Panics while handling a GET.
pub struct Boom;

#[async_trait]
impl Resource for Boom {
    async fn get(&self, ctx: &RequestContext) -> RestResult<Option<Payload>> {
        let empty: Vec<i32> = Vec::new();
        let index = ctx.params().get_int_or("index", 0) as usize;
        Ok(Some(Payload::from(json!({ "value": empty[index] }))))
    }
}

/// Sleeps for `millis` before replying.
pub struct Slow;

#[async_trait]
impl Resource for Slow {
    async fn process(&self, ctx: &RequestContext) -> RestResult<Option<Payload>> {
        let millis = ctx.params().get_long_or("millis", 0);
        tokio::time::sleep(std::time::Duration::from_millis(millis as u64)).await;
        Ok(Some(Payload::from(json!({ "slept": millis }))))
    }
}
