use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

/// Connects the pool and brings the schema up to date in one step; the
/// server never runs against an unmigrated database.
pub async fn init_database(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(database_url)
        .await?;
    info!("connected to PostgreSQL");

    info!("running database migrations");
    sqlx::migrate!().run(&pool).await?;
    info!("migrations completed");

    Ok(pool)
}
