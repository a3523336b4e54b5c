use crate::tests::{cleanup_catalog, draft_shop, seed_catalog, setup_test_db};
use crate::{area, shop, shop_state::ShopState};
use chrono::Utc;
use sea_orm::{ActiveValue::NotSet, Set};
use anyhow::Result;

/// Insert, read back, partially update and re-read a shop
#[tokio::test]
async fn test_shop_insert_update_find() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };
    let (a, c) = seed_catalog(&db).await?;

    let id = shop::insert(&db, draft_shop(a.area_id, c.shop_category_id, "crud shop")).await?;
    let found = shop::find_by_id(&db, id).await?.expect("inserted shop");
    assert_eq!(found.shop_name, "crud shop");
    assert_eq!(found.enable_status, ShopState::Check);
    assert_eq!(found.phone.as_deref(), Some("12345"));

    // only name and image change; phone must survive
    let patch = shop::ActiveModel {
        shop_id: NotSet,
        shop_name: Set("renamed".into()),
        shop_img: Set(Some("upload/item/shop/1/a.png".into())),
        last_edit_time: Set(Utc::now().into()),
        ..Default::default()
    };
    let rows = shop::update_by_id(&db, id, patch).await?;
    assert_eq!(rows, 1);

    let after = shop::find_by_id(&db, id).await?.expect("updated shop");
    assert_eq!(after.shop_name, "renamed");
    assert_eq!(after.shop_img.as_deref(), Some("upload/item/shop/1/a.png"));
    assert_eq!(after.phone.as_deref(), Some("12345"));
    assert_eq!(after.create_time, found.create_time);

    cleanup_catalog(&db, &a, &c).await?;
    Ok(())
}

/// Updating a missing row reports zero affected rows instead of failing
#[tokio::test]
async fn test_update_missing_shop_affects_nothing() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };
    let patch = shop::ActiveModel { shop_name: Set("ghost".into()), ..Default::default() };
    let rows = shop::update_by_id(&db, i64::MAX, patch).await?;
    assert_eq!(rows, 0);
    Ok(())
}

/// Areas come back ordered by priority
#[tokio::test]
async fn test_area_list_ordering() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };
    let (a, c) = seed_catalog(&db).await?;

    let areas = area::list_all(&db).await?;
    assert!(areas.iter().any(|x| x.area_id == a.area_id));
    assert!(areas.windows(2).all(|w| w[0].priority >= w[1].priority));

    cleanup_catalog(&db, &a, &c).await?;
    Ok(())
}
