use anyhow::Result;
use tracing::{debug, error, info, trace};

use super::initdb::apply_migrations;
use super::serve::run_server;
use crate::config::{connect, ServerConfig};
use crate::router::create_router;
use crate::schemas::AppState;

pub async fn migrate_and_serve(config: &ServerConfig) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");
    debug!("Database URL: {}", config.database.database_url);

    // The migrated connection is reused as the server pool
    let db = match connect(&config.database.database_url).await {
        Ok(connection) => connection,
        Err(e) => {
            error!(
                "Failed to connect to database '{}': {}",
                config.database.database_url, e
            );
            return Err(e);
        }
    };

    apply_migrations(&db).await?;

    let app = create_router(AppState { db });
    debug!("Router created successfully");

    run_server(app, &config.bind_address()).await
}
