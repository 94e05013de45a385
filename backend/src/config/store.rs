use diesel::r2d2::{self, ConnectionManager};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use once_cell::sync::OnceCell;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

// One pool for the whole process, shared by every request.
static STORE: OnceCell<DbPool> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database pool error: {0}")]
    Pool(#[from] r2d2::PoolError),
    #[error("database error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("failed to run migrations: {0}")]
    Migration(String),
    #[error("store used before init_store")]
    Uninitialised,
    #[error("that time slot is already booked")]
    SlotTaken,
}

/// Opens a pool on `database_url` and brings the schema up to date.
pub fn connect(database_url: &str, max_size: u32) -> Result<DbPool, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .build(manager)?;

    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;
    if !applied.is_empty() {
        tracing::info!("Applied {} migration(s)", applied.len());
    }

    Ok(pool)
}

/// Initialises the process-wide store once; later calls return the same pool.
pub fn init_store(database_url: &str) -> Result<&'static DbPool, StoreError> {
    STORE.get_or_try_init(|| connect(database_url, 8))
}

pub fn get_store() -> Result<&'static DbPool, StoreError> {
    STORE.get().ok_or(StoreError::Uninitialised)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::prelude::*;

    #[test]
    fn connect_runs_migrations() {
        let pool = connect(":memory:", 1).unwrap();
        let mut conn = pool.get().unwrap();
        let leads: i64 = crate::schema::leads::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        let bookings: i64 = crate::schema::bookings::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!((leads, bookings), (0, 0));
    }

    #[test]
    fn init_store_is_idempotent() {
        let first = init_store(":memory:").unwrap() as *const DbPool;
        let second = init_store("ignored.db").unwrap() as *const DbPool;
        assert_eq!(first, second);
        assert_eq!(get_store().unwrap() as *const DbPool, first);
    }
}
