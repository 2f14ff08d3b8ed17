mod example;
mod page;
mod problem;
mod router;
mod telemetry;
#[cfg(test)]
mod testing;

use std::{net::SocketAddr, sync::Arc};

use idpage_storage::Database;
use idpage_util::{load_env_file, AppConfig};
use tracing::info;

use crate::example::ExampleService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    // The pool lives for the whole process; the service only borrows it.
    let database = Arc::new(
        Database::connect(&config.database.url, config.database.max_connections).await?,
    );
    info!(
        stage = "storage",
        max_connections = config.database.max_connections,
        "database pool ready"
    );

    let state = router::AppState::new(metrics, ExampleService::new(database));

    let addr: SocketAddr = config.bind_addr;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state))
        .await
        .map_err(|err| err.into())
}
