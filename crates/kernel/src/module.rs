use async_trait::async_trait;
use axum::Router;

use crate::context::AppContext;

/// Core module trait that all venuehub modules implement.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module.
    fn name(&self) -> &'static str;

    /// Initialize the module. Called during application startup, in
    /// registration order, before the HTTP server binds.
    async fn init(&self, _ctx: &AppContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the axum router for this module's routes.
    /// Routes are mounted under `/api/{module_name}`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Return an OpenAPI specification fragment for this module as JSON.
    /// Fragments are merged into the served spec.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Start background tasks for this module. Called after every module
    /// has initialized.
    async fn start(&self, _ctx: &AppContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources. Called during shutdown in
    /// reverse registration order.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
