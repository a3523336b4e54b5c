/// Database connection and configuration tests
pub mod db_tests;

/// CRUD operations tests for shop, area and category
pub mod crud_tests;

/// Transaction handling tests around shop writes
pub mod transaction_tests;

use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use crate::{area, db::connect, shop, shop_category, shop_state::ShopState};

/// Connect and migrate; `None` when the database is unavailable or tests are disabled.
pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

/// Insert an area and a category so shop rows satisfy their foreign keys.
pub(crate) async fn seed_catalog(db: &DatabaseConnection) -> anyhow::Result<(area::Model, shop_category::Model)> {
    let now = Utc::now().into();
    let a = area::ActiveModel {
        area_name: Set(format!("area_{}", Uuid::new_v4())),
        area_desc: Set(None),
        priority: Set(1),
        create_time: Set(now),
        last_edit_time: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    let c = shop_category::ActiveModel {
        shop_category_name: Set(format!("category_{}", Uuid::new_v4())),
        shop_category_desc: Set(None),
        shop_category_img: Set(None),
        priority: Set(1),
        parent_id: Set(None),
        create_time: Set(now),
        last_edit_time: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok((a, c))
}

pub(crate) fn draft_shop(area_id: i32, category_id: i64, name: &str) -> shop::ActiveModel {
    let now = Utc::now().into();
    shop::ActiveModel {
        owner_id: Set(1),
        area_id: Set(area_id),
        shop_category_id: Set(category_id),
        shop_name: Set(name.to_string()),
        shop_desc: Set(Some("desc".into())),
        shop_addr: Set(Some("addr".into())),
        phone: Set(Some("12345".into())),
        shop_img: Set(None),
        enable_status: Set(ShopState::Check),
        advice: Set(None),
        create_time: Set(now),
        last_edit_time: Set(now),
        ..Default::default()
    }
}

pub(crate) async fn cleanup_catalog(db: &DatabaseConnection, a: &area::Model, c: &shop_category::Model) -> anyhow::Result<()> {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    shop::Entity::delete_many()
        .filter(shop::Column::AreaId.eq(a.area_id))
        .exec(db)
        .await?;
    shop_category::Entity::delete_by_id(c.shop_category_id).exec(db).await?;
    area::Entity::delete_by_id(a.area_id).exec(db).await?;
    Ok(())
}
