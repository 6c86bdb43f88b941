use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization and start-up
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Contract every catalog module implements
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Prepare the module before the HTTP server is started
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes.
    /// Paths are absolute; the router is merged as-is into the service router.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Return the OpenAPI document fragment for this module as JSON.
    /// `paths` and `components.schemas` are merged into the service document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Start background work; called after every module has been initialized
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Release resources; called during shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
