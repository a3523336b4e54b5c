use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Shop: listing filters
        manager
            .create_index(
                Index::create()
                    .name("idx_shop_owner")
                    .table(Shop::Table)
                    .col(Shop::OwnerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_shop_area")
                    .table(Shop::Table)
                    .col(Shop::AreaId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_shop_category_status")
                    .table(Shop::Table)
                    .col(Shop::ShopCategoryId)
                    .col(Shop::EnableStatus)
                    .to_owned(),
            )
            .await?;

        // ShopCategory: children lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_shop_category_parent")
                    .table(ShopCategory::Table)
                    .col(ShopCategory::ParentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_shop_category_parent").table(ShopCategory::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_shop_category_status").table(Shop::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_shop_area").table(Shop::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_shop_owner").table(Shop::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Shop { Table, OwnerId, AreaId, ShopCategoryId, EnableStatus }

#[derive(DeriveIden)]
enum ShopCategory { Table, ParentId }
