use libwaypoint::Database;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug)]
pub struct SharedState {
    pub db: Database,
}

impl SharedState {
    pub fn new(db: Database) -> Self {
        trace!("Creating shared app state");
        Self { db }
    }

    #[cfg(test)]
    pub fn test(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
        Self {
            db: Database::from(pool),
        }
    }
}

pub type AppState = Arc<SharedState>;
