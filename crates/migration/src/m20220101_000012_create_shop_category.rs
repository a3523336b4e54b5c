//! Create `shop_category` table.
//!
//! Two-level category tree: top-level rows have no parent.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShopCategory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShopCategory::ShopCategoryId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(ShopCategory::ShopCategoryName, 100).not_null())
                    .col(ColumnDef::new(ShopCategory::ShopCategoryDesc).string_len(1000).null())
                    .col(ColumnDef::new(ShopCategory::ShopCategoryImg).string_len(2000).null())
                    .col(integer(ShopCategory::Priority).not_null().default(0))
                    .col(ColumnDef::new(ShopCategory::ParentId).big_integer().null())
                    .col(timestamp_with_time_zone(ShopCategory::CreateTime).not_null())
                    .col(timestamp_with_time_zone(ShopCategory::LastEditTime).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shop_category_parent")
                            .from(ShopCategory::Table, ShopCategory::ParentId)
                            .to(ShopCategory::Table, ShopCategory::ShopCategoryId)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ShopCategory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ShopCategory {
    Table,
    ShopCategoryId,
    ShopCategoryName,
    ShopCategoryDesc,
    ShopCategoryImg,
    Priority,
    ParentId,
    CreateTime,
    LastEditTime,
}
