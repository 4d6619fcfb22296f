use sqlx::{migrate::Migrator, sqlite::SqlitePoolOptions, SqlitePool};

static MIGRATOR: Migrator = sqlx::migrate!();

/// Creates a SQLite connection pool and brings the schema up to date
///
/// An in-memory URL gets a single connection that is never recycled, since
/// every SQLite memory connection is its own empty database.
pub async fn create_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = options.connect(database_url).await?;
    MIGRATOR.run(&pool).await?;

    tracing::info!("Database ready");

    Ok(pool)
}
