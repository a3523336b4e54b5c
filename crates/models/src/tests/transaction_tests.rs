use crate::tests::{cleanup_catalog, draft_shop, seed_catalog, setup_test_db};
use crate::shop;
use sea_orm::{Set, TransactionTrait};
use anyhow::Result;

/// A shop inserted inside a committed transaction is visible afterwards
#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };
    let (a, c) = seed_catalog(&db).await?;

    let txn = db.begin().await?;
    let id = shop::insert(&txn, draft_shop(a.area_id, c.shop_category_id, "tx commit")).await?;
    txn.commit().await?;

    assert!(shop::find_by_id(&db, id).await?.is_some());

    cleanup_catalog(&db, &a, &c).await?;
    Ok(())
}

/// Insert plus image-address update are both discarded on rollback
#[tokio::test]
async fn test_transaction_rollback_discards_insert_and_update() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };
    let (a, c) = seed_catalog(&db).await?;

    let txn = db.begin().await?;
    let id = shop::insert(&txn, draft_shop(a.area_id, c.shop_category_id, "tx rollback")).await?;
    let patch = shop::ActiveModel { shop_img: Set(Some("upload/item/shop/x.png".into())), ..Default::default() };
    assert_eq!(shop::update_by_id(&txn, id, patch).await?, 1);
    // visible inside the transaction
    assert!(shop::find_by_id(&txn, id).await?.is_some());
    txn.rollback().await?;

    assert!(shop::find_by_id(&db, id).await?.is_none());

    cleanup_catalog(&db, &a, &c).await?;
    Ok(())
}

/// A failing statement aborts the surrounding transaction
#[tokio::test]
async fn test_transaction_error_handling() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };
    let (a, c) = seed_catalog(&db).await?;

    let result = async {
        let txn = db.begin().await?;
        let id = shop::insert(&txn, draft_shop(a.area_id, c.shop_category_id, "tx error")).await?;
        // unknown area violates the foreign key
        shop::insert(&txn, draft_shop(i32::MAX, c.shop_category_id, "tx error fk")).await?;
        txn.commit().await?;
        Ok::<i64, anyhow::Error>(id)
    }.await;

    assert!(result.is_err());

    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    let leftovers = shop::Entity::find()
        .filter(shop::Column::AreaId.eq(a.area_id))
        .all(&db)
        .await?;
    assert!(leftovers.is_empty());

    cleanup_catalog(&db, &a, &c).await?;
    Ok(())
}
