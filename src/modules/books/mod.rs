pub mod handlers;
pub mod models;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, put},
    Router,
};
use catalog_kernel::{InitCtx, Module};
use utoipa::OpenApi;

use handlers::{BooksApi, BooksState};
use store::BookStore;

/// Catalog module serving CRUD over the books collection
pub struct BooksModule {
    store: Arc<dyn BookStore>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            collection = %ctx.settings.database.collection,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/books",
                get(handlers::list_books).post(handlers::create_book),
            )
            // Empty and multi-segment ids reach `BookId` and are rejected there.
            .route(
                "/books/",
                put(handlers::update_book).delete(handlers::delete_book),
            )
            .route(
                "/books/{*id}",
                put(handlers::update_book).delete(handlers::delete_book),
            )
            .with_state(BooksState::new(Arc::clone(&self.store)))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        match serde_json::to_value(BooksApi::openapi()) {
            Ok(spec) => Some(spec),
            Err(err) => {
                tracing::warn!(module = self.name(), error = %err, "failed to render OpenAPI");
                None
            }
        }
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
