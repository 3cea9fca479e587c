//! Application handlers.
//!
//! A [`Resource`] answers the requests of every route bound to it. Each
//! method has a default that replies with nothing, so a resource only
//! implements what it serves.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::error::{RestError, RestResult};
use crate::http::request::RequestContext;
use crate::marshal::Payload;

/// Handler code for one logical resource.
///
/// Returning `Ok(None)` from a method-specific handler falls through to
/// [`Resource::process`].
#[async_trait]
pub trait Resource: Send + Sync {
    async fn get(&self, _ctx: &RequestContext) -> RestResult<Option<Payload>> {
        Ok(None)
    }

    async fn post(&self, _ctx: &RequestContext) -> RestResult<Option<Payload>> {
        Ok(None)
    }

    async fn put(&self, _ctx: &RequestContext) -> RestResult<Option<Payload>> {
        Ok(None)
    }

    async fn delete(&self, _ctx: &RequestContext) -> RestResult<Option<Payload>> {
        Ok(None)
    }

    /// Fallback for every method.
    async fn process(&self, _ctx: &RequestContext) -> RestResult<Option<Payload>> {
        Ok(None)
    }
}

/// Resources by the name routes refer to them with.
pub type Resources = HashMap<String, Arc<dyn Resource>>;

/// Call the handler for the effective method, then the fallback.
pub async fn dispatch(resource: &dyn Resource, ctx: &RequestContext) -> RestResult<Payload> {
    let reply = match ctx.method().as_str() {
        "GET" => resource.get(ctx).await?,
        "POST" => resource.post(ctx).await?,
        "PUT" => resource.put(ctx).await?,
        "DELETE" => resource.delete(ctx).await?,
        _ => None,
    };

    if let Some(payload) = reply {
        return Ok(payload);
    }

    resource
        .process(ctx)
        .await?
        .ok_or_else(|| RestError::new(StatusCode::NO_CONTENT, "No content was sent by the request"))
}
