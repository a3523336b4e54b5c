//! Create `area` table.
//!
//! Geographic areas a shop is registered under.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Area::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Area::AreaId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Area::AreaName, 200).unique_key().not_null())
                    .col(ColumnDef::new(Area::AreaDesc).string_len(1000).null())
                    .col(integer(Area::Priority).not_null().default(0))
                    .col(timestamp_with_time_zone(Area::CreateTime).not_null())
                    .col(timestamp_with_time_zone(Area::LastEditTime).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Area::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Area { Table, AreaId, AreaName, AreaDesc, Priority, CreateTime, LastEditTime }
