//! MongoDB connection bootstrap and the error type shared by store implementations.

use std::future::IntoFuture;
use std::time::Duration;

use catalog_kernel::settings::DatabaseSettings;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use thiserror::Error;

/// Application name reported to the server in the connection handshake.
const APP_NAME: &str = "catalog-service";

/// Failure of a single document-store call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Backend(#[from] mongodb::error::Error),

    #[error("{0}")]
    Unexpected(String),
}

/// Run a store future under a deadline.
///
/// Elapsing the deadline drops the future and yields [`StoreError::Timeout`];
/// other in-flight calls are unaffected.
pub async fn with_deadline<T, E, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: IntoFuture<Output = Result<T, E>>,
    E: Into<StoreError>,
{
    match tokio::time::timeout(limit, fut.into_future()).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

/// Connect to MongoDB and verify the server answers a `ping`.
///
/// The whole sequence is bounded by `connect_timeout_ms`.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, StoreError> {
    let limit = Duration::from_millis(settings.connect_timeout_ms);

    tracing::info!(
        target: "catalog-db",
        database = %settings.name,
        timeout_ms = settings.connect_timeout_ms,
        "connecting to document store"
    );

    let database = with_deadline(limit, async {
        let mut options = ClientOptions::parse(&settings.uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(limit);
        options.server_selection_timeout = Some(limit);

        let client = Client::with_options(options)?;
        let database = client.database(&settings.name);
        database.run_command(doc! { "ping": 1 }).await?;

        Ok::<_, mongodb::error::Error>(database)
    })
    .await?;

    tracing::info!(target: "catalog-db", database = %settings.name, "document store reachable");
    Ok(database)
}
