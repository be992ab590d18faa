use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

// Build a small PostgreSQL pool for the check-in store. Connections open on first use,
// so an unreachable database surfaces as a per-request store error.
pub fn connect_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_lazy(database_url)
}

// Run database migrations for the check-in store.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
    MIGRATOR.run(pool).await
}
