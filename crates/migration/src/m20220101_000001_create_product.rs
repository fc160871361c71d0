//! Create `product` table.
//! Caller-assigned integer ids plus the four nullable audit columns.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(integer(Product::Id).primary_key())
                    .col(string_len(Product::Name, 200))
                    .col(text_null(Product::Description))
                    .col(double(Product::Price))
                    .col(uuid_null(Product::CreatedBy))
                    .col(timestamp_with_time_zone_null(Product::CreatedAt))
                    .col(uuid_null(Product::UpdatedBy))
                    .col(timestamp_with_time_zone_null(Product::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Name,
    Description,
    Price,
    CreatedBy,
    CreatedAt,
    UpdatedBy,
    UpdatedAt,
}
