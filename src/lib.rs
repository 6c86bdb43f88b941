//! Book catalog service.
//!
//! Wires the books module onto a MongoDB-backed store and serves it over HTTP.

pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use modules::books::store::{BookStore, MongoBookStore};

/// Connect to the store, bring modules up, and serve until a shutdown signal.
///
/// A store that cannot be reached within the connect bound is fatal.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let database = catalog_db::connect(&settings.database)
        .await
        .with_context(|| format!("failed to connect to document store '{}'", settings.database.name))?;

    let store: Arc<dyn BookStore> = Arc::new(MongoBookStore::new(&database, &settings.database));

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let app = catalog_http::build_router(&registry, &settings);
    let served = catalog_http::serve(app, &settings, catalog_http::shutdown_signal()).await;

    registry.stop_all().await?;
    served
}
