//! Create `shop` table with FKs to `area` and `shop_category`.
//!
//! `enable_status` stores the numeric lifecycle state code.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shop::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shop::ShopId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(Shop::OwnerId).not_null())
                    .col(integer(Shop::AreaId).not_null())
                    .col(big_integer(Shop::ShopCategoryId).not_null())
                    .col(string_len(Shop::ShopName, 256).not_null())
                    .col(ColumnDef::new(Shop::ShopDesc).string_len(1024).null())
                    .col(ColumnDef::new(Shop::ShopAddr).string_len(200).null())
                    .col(ColumnDef::new(Shop::Phone).string_len(128).null())
                    .col(ColumnDef::new(Shop::ShopImg).string_len(1024).null())
                    .col(integer(Shop::EnableStatus).not_null().default(0))
                    .col(ColumnDef::new(Shop::Advice).string_len(255).null())
                    .col(timestamp_with_time_zone(Shop::CreateTime).not_null())
                    .col(timestamp_with_time_zone(Shop::LastEditTime).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shop_area")
                            .from(Shop::Table, Shop::AreaId)
                            .to(Area::Table, Area::AreaId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shop_category")
                            .from(Shop::Table, Shop::ShopCategoryId)
                            .to(ShopCategory::Table, ShopCategory::ShopCategoryId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Shop::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Shop {
    Table,
    ShopId,
    OwnerId,
    AreaId,
    ShopCategoryId,
    ShopName,
    ShopDesc,
    ShopAddr,
    Phone,
    ShopImg,
    EnableStatus,
    Advice,
    CreateTime,
    LastEditTime,
}

#[derive(DeriveIden)]
enum Area { Table, AreaId }

#[derive(DeriveIden)]
enum ShopCategory { Table, ShopCategoryId }
