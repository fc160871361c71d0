#![cfg(test)]
use migration::MigratorTrait;
use models::db::connect_sqlite_memory;
use sea_orm::DatabaseConnection;

/// Private in-memory database with the schema applied. Each call gets its own
/// store, so tests never see each other's rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
