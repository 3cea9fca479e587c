//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler as its only entry
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Bind parameters, resolve the route and call the resource
//! - Marshal the reply and write the JSON envelope
//! - Swap in a new route table when the configuration changes
//!
//! # Design Decisions
//! - The route table sits behind `ArcSwap`; requests load it once and keep
//!   that snapshot for their whole lifetime
//! - A reload that fails to compile keeps the current table
//! - Panics, timeouts and oversized bodies are answered with the same
//!   JSON envelope as handler errors
//! - Listener-level settings (limits, timeouts) apply at startup only

use std::any::Any;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, request::Parts, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::BinderConfig;
use crate::error::{RestError, RestResult};
use crate::http::request::{
    decode_path_info, effective_method, MakeRequestUuid, RequestContext, X_REQUEST_ID,
};
use crate::http::resource::{self, Resources};
use crate::http::response::{write_json, JSON_UTF8};
use crate::observability::metrics;
use crate::params::ParameterStore;
use crate::routing::{RouteError, RouteMatch, RouteTable};

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    routes: Arc<ArcSwap<RouteTable>>,
    resources: Arc<Resources>,
    max_body_size: usize,
}

impl AppState {
    /// Current route table snapshot.
    pub fn routes(&self) -> Arc<RouteTable> {
        self.routes.load_full()
    }

    /// Compile the routes of `config` and make them current.
    pub fn reload(&self, config: &BinderConfig) -> Result<usize, RouteError> {
        let table = RouteTable::from_config(&config.routes, &self.resources)?;
        let count = table.len();
        self.routes.store(Arc::new(table));
        tracing::info!(routes = count, "Route table reloaded");
        Ok(count)
    }
}

/// HTTP server binding requests to resources.
pub struct HttpServer {
    router: Router,
    state: AppState,
    config: BinderConfig,
}

impl HttpServer {
    /// Compile the configured routes against `resources`.
    pub fn new(config: BinderConfig, resources: Resources) -> Result<Self, RouteError> {
        let table = RouteTable::from_config(&config.routes, &resources)?;

        let state = AppState {
            routes: Arc::new(ArcSwap::from_pointee(table)),
            resources: Arc::new(resources),
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            state,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &BinderConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(
                ServiceBuilder::new()
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
            .layer(middleware::map_response(envelope_rejections))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http()),
            )
    }

    /// Fully layered router, for serving on a custom transport.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Serve until `shutdown` fires, applying every config received on
    /// `config_updates`. In-flight requests are drained before returning.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<BinderConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.state.routes().len(),
            "HTTP server starting"
        );

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = state.reload(&config) {
                    tracing::error!(error = %e, "Failed to apply new routes, keeping current table");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                if let Err(e) = shutdown.recv().await {
                    tracing::debug!(error = %e, "Shutdown channel closed");
                }
                tracing::info!("Shutdown requested, draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Envelope for a resource that panicked.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Resource panicked".to_string()
    };

    tracing::error!(panic = %message, "Resource panicked");
    metrics::record_binding_failure("unexpected");
    RestError::unexpected(message).into_response()
}

/// Wrap plain timeout and body-limit rejections in the envelope.
async fn envelope_rejections(response: Response) -> Response {
    let message = match response.status() {
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        _ => return response,
    };

    let enveloped = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|ct| ct.as_bytes() == JSON_UTF8.as_bytes());
    if enveloped {
        return response;
    }

    RestError::new(response.status(), message).into_response()
}

/// Entry point for every request.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    let table = state.routes();
    let Some(matched) = table.resolve(&path) else {
        tracing::warn!(request_id = %request_id, path = %path, "No route matched");
        metrics::record_request(&method, 404, metrics::NO_ROUTE, start);
        return RestError::new(StatusCode::NOT_FOUND, format!("No route for {path}")).into_response();
    };
    let route_name = matched.route.name().to_string();

    let span = tracing::info_span!("dispatch", request_id = %request_id, route = %route_name);
    let result = handle(&state, &matched, request_id, parts, body)
        .instrument(span)
        .await;

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(
                route = %route_name,
                path = %path,
                kind = err.kind(),
                error = %err,
                "Request failed"
            );
            metrics::record_binding_failure(err.kind());
            err.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), &route_name, start);
    response
}

async fn handle(
    state: &AppState,
    matched: &RouteMatch<'_, '_>,
    request_id: String,
    parts: Parts,
    body: Body,
) -> RestResult<Response> {
    let bytes = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(|e| RestError::new(StatusCode::PAYLOAD_TOO_LARGE, format!("Failed to read request body: {e}")))?;

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let mut params = ParameterStore::from_request(parts.uri.query(), content_type, &bytes);
    let method = effective_method(&parts.method, &mut params);

    let path_info = matched.path_info.map(decode_path_info);
    if let Some(path_info) = path_info.as_deref() {
        match matched.route.bind(path_info) {
            Some(bindings) => {
                for (name, value) in bindings {
                    params.inject(name, value);
                }
            }
            None => tracing::debug!(path_info = %path_info, "No template matched path info"),
        }
    }

    tracing::debug!(method = %method, params = params.len(), "Dispatching to resource");

    let ctx = RequestContext::new(
        request_id,
        method,
        parts.method,
        parts.uri.path().to_string(),
        path_info,
        parts.headers,
        params,
    );

    let payload = resource::dispatch(matched.route.resource(), &ctx).await?;
    let value = payload.into_json()?;
    write_json(StatusCode::OK, &value)
}
