use crate::db::connect_sqlite_memory;
use crate::product;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, ColumnTrait, Set};
use anyhow::Result;
use chrono::Utc;
use migration::MigratorTrait;
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Test product CRUD operations
#[tokio::test]
async fn test_product_crud() -> Result<()> {
    let db = setup_test_db().await?;

    // Create
    let created = product::Model::new(1, "Widget", 4.5)
        .with_description("standard widget")
        .into_active_model()
        .insert(&db)
        .await?;
    assert_eq!(created.name, "Widget");
    assert!(created.created_at.is_none());

    // Read
    let found = product::Entity::find_by_id(1).one(&db).await?;
    assert_eq!(found.as_ref(), Some(&created));

    // Find by name
    let by_name = product::Entity::find()
        .filter(product::Column::Name.eq("Widget"))
        .one(&db)
        .await?;
    assert_eq!(by_name.map(|p| p.id), Some(1));

    // Update
    let mut am: product::ActiveModel = created.into();
    am.price = Set(5.0);
    am.updated_at = Set(Some(Utc::now().into()));
    am.updated_by = Set(Some(Uuid::new_v4()));
    let updated = am.update(&db).await?;
    assert_eq!(updated.price, 5.0);
    assert!(updated.updated_at.is_some());

    // Delete
    product::Entity::delete_by_id(1).exec(&db).await?;
    assert!(product::Entity::find_by_id(1).one(&db).await?.is_none());
    Ok(())
}

/// Audit columns survive a round trip through the store
#[tokio::test]
async fn test_audit_columns_persist() -> Result<()> {
    let db = setup_test_db().await?;
    let actor = Uuid::new_v4();
    let mut model = product::Model::new(2, "Gadget", 1.0);
    model.created_by = Some(actor);
    model.created_at = Some(Utc::now().into());
    model.into_active_model().insert(&db).await?;

    let found = product::Entity::find_by_id(2).one(&db).await?.expect("persisted");
    assert_eq!(found.created_by, Some(actor));
    assert!(found.created_at.is_some());
    assert!(found.updated_by.is_none());
    Ok(())
}

/// Duplicate primary keys are rejected by the store
#[tokio::test]
async fn test_duplicate_id_is_rejected() -> Result<()> {
    let db = setup_test_db().await?;
    product::Model::new(3, "First", 1.0).into_active_model().insert(&db).await?;
    let dup = product::Model::new(3, "Second", 2.0).into_active_model().insert(&db).await;
    assert!(dup.is_err());
    Ok(())
}
