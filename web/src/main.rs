use anyhow::Result;
use axum::Router;
use clap::Parser;
use libwaypoint::{Database, location::Location};
use sqlx::Row;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::filter::EnvFilter;

mod api;
mod error;
mod state;

use state::{AppState, SharedState};

const API_PREFIX: &str = "/api";

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(short, long, default_value = "waypoints.sqlite")]
    pub database: String,
    #[arg(short, long, default_value = "localhost")]
    pub listen: String,
    #[arg(short, long, default_value = "8080")]
    pub port: u16,
    /// Insert a few example locations when the database is empty
    #[arg(long)]
    pub seed_demo_data: bool,
}

fn app(state: AppState) -> Router {
    Router::new()
        .nest(API_PREFIX, api::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Seed some initial data if the location table is empty
async fn seed_demo_data(db: &Database) -> Result<()> {
    let count: i64 = sqlx::query("SELECT COUNT(*) AS nlocations FROM wp_locations")
        .fetch_one(db.pool())
        .await?
        .try_get("nlocations")?;
    if count > 0 {
        debug!("database already contains {count} locations, not seeding demo data");
        return Ok(());
    }
    let initial_locations = [
        ("Central Park", 40.7829, -73.9654, "Iconic urban park in NYC"),
        (
            "Statue of Liberty",
            40.6892,
            -74.0445,
            "Famous American landmark",
        ),
        (
            "Times Square",
            40.7580,
            -73.9855,
            "Busiest commercial intersection",
        ),
    ];
    for (name, lat, lng, desc) in initial_locations {
        let mut location = Location::new(name.to_string(), lat, lng, Some(desc.to_string()))?;
        location.insert(db).await?;
    }
    info!("Initial location data seeded");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("WAYPOINTS_LOG"))
        .init();
    let args = Cli::parse();
    debug!("using database '{}'", args.database);

    let db = Database::open(&args.database).await?;
    if args.seed_demo_data {
        seed_demo_data(&db).await?;
    }
    let state = Arc::new(SharedState::new(db));

    let listener = TcpListener::bind((args.listen.as_str(), args.port)).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state).into_make_service()).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_app(pool: sqlx::Pool<sqlx::Sqlite>) -> (Router, AppState) {
    let state = Arc::new(SharedState::test(pool));
    (app(state.clone()), state)
}
