use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod db;
mod error;
mod predictor;
mod ratings;

use api::AppState;
use config::Config;
use db::{Database, DocumentStore};
use ratings::RatingAccessor;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // Open the document store, if one is configured
    let store: Option<Arc<dyn DocumentStore>> = match config.store_settings() {
        Some((url, name)) => {
            let db = Database::open(url, name)?;
            info!("Document store opened: {} ({})", db.name(), url);
            Some(Arc::new(db))
        }
        None => {
            warn!("DATABASE_URL / DATABASE_NAME not set – rating storage disabled");
            None
        }
    };

    let state = AppState {
        ratings: RatingAccessor::new(store),
        database_url_set: config.database_url.is_some(),
        database_name_set: config.database_name.is_some(),
        max_upload_bytes: config.max_upload_bytes(),
    };
    let app = api::router(state);

    let addr: SocketAddr = config.listen_addr().parse()?;
    info!("Soccer Predictor API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
