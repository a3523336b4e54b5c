use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use models::{shop, shop_category, shop_state::ShopState};

use crate::shop::domain::{Shop, ShopFilter};
use crate::shop::errors::ShopOperationError;
use crate::shop::repository::{ShopRepository, ShopStore, ShopTransaction};

pub struct SeaOrmShopRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmShopRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

pub struct SeaOrmShopTransaction {
    txn: DatabaseTransaction,
}

fn required<T>(v: Option<T>, field: &str) -> Result<T, ShopOperationError> {
    v.ok_or_else(|| ShopOperationError::Validation(format!("{field} required")))
}

fn insert_model(s: &Shop) -> Result<shop::ActiveModel, ShopOperationError> {
    let now = Utc::now();
    Ok(shop::ActiveModel {
        owner_id: Set(required(s.owner_id, "owner_id")?),
        area_id: Set(required(s.area_id, "area_id")?),
        shop_category_id: Set(required(s.shop_category_id, "shop_category_id")?),
        shop_name: Set(required(s.shop_name.clone(), "shop_name")?),
        shop_desc: Set(s.shop_desc.clone()),
        shop_addr: Set(s.shop_addr.clone()),
        phone: Set(s.phone.clone()),
        shop_img: Set(s.shop_img.clone()),
        enable_status: Set(s.enable_status.unwrap_or(ShopState::Check)),
        advice: Set(s.advice.clone()),
        create_time: Set(s.create_time.unwrap_or(now).into()),
        last_edit_time: Set(s.last_edit_time.unwrap_or(now).into()),
        ..Default::default()
    })
}

/// Only the fields present on `s`; owner and creation time never change.
fn update_model(s: &Shop) -> shop::ActiveModel {
    let mut am = <shop::ActiveModel as Default>::default();
    if let Some(v) = s.area_id { am.area_id = Set(v); }
    if let Some(v) = s.shop_category_id { am.shop_category_id = Set(v); }
    if let Some(v) = &s.shop_name { am.shop_name = Set(v.clone()); }
    if let Some(v) = &s.shop_desc { am.shop_desc = Set(Some(v.clone())); }
    if let Some(v) = &s.shop_addr { am.shop_addr = Set(Some(v.clone())); }
    if let Some(v) = &s.phone { am.phone = Set(Some(v.clone())); }
    if let Some(v) = &s.shop_img { am.shop_img = Set(Some(v.clone())); }
    if let Some(v) = s.enable_status { am.enable_status = Set(v); }
    if let Some(v) = &s.advice { am.advice = Set(Some(v.clone())); }
    if let Some(v) = s.last_edit_time { am.last_edit_time = Set(v.into()); }
    am
}

fn filtered(f: &ShopFilter) -> Select<shop::Entity> {
    let mut q = shop::Entity::find();
    if let Some(v) = f.owner_id {
        q = q.filter(shop::Column::OwnerId.eq(v));
    }
    if let Some(v) = f.area_id {
        q = q.filter(shop::Column::AreaId.eq(v));
    }
    if let Some(v) = f.shop_category_id {
        q = q.filter(shop::Column::ShopCategoryId.eq(v));
    }
    if let Some(parent) = f.parent_category_id {
        q = q.filter(
            shop::Column::ShopCategoryId.in_subquery(
                Query::select()
                    .column(shop_category::Column::ShopCategoryId)
                    .from(shop_category::Entity)
                    .and_where(shop_category::Column::ParentId.eq(parent))
                    .to_owned(),
            ),
        );
    }
    if let Some(v) = f.enable_status {
        q = q.filter(shop::Column::EnableStatus.eq(v));
    }
    if let Some(name) = f.shop_name.as_deref().filter(|n| !n.is_empty()) {
        q = q.filter(shop::Column::ShopName.contains(name));
    }
    q
}

async fn insert_on<C: ConnectionTrait>(db: &C, s: &mut Shop) -> Result<u64, ShopOperationError> {
    let id = shop::insert(db, insert_model(s)?).await?;
    s.shop_id = Some(id);
    Ok(1)
}

async fn update_on<C: ConnectionTrait>(db: &C, s: &Shop) -> Result<u64, ShopOperationError> {
    let id = required(s.shop_id, "shop_id")?;
    let am = update_model(s);
    if !am.is_changed() {
        return Ok(0);
    }
    Ok(shop::update_by_id(db, id, am).await?)
}

async fn find_on<C: ConnectionTrait>(db: &C, shop_id: i64) -> Result<Option<Shop>, ShopOperationError> {
    Ok(shop::find_by_id(db, shop_id).await?.map(Shop::from))
}

async fn list_on<C: ConnectionTrait>(db: &C, f: &ShopFilter, row_offset: u64, page_size: u64) -> Result<Vec<Shop>, ShopOperationError> {
    let rows = filtered(f)
        .order_by_asc(shop::Column::ShopId)
        .offset(row_offset)
        .limit(page_size)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Shop::from).collect())
}

async fn count_on<C: ConnectionTrait>(db: &C, f: &ShopFilter) -> Result<u64, ShopOperationError> {
    Ok(filtered(f).count(db).await?)
}

#[async_trait::async_trait]
impl ShopStore for SeaOrmShopRepository {
    async fn insert_shop(&self, shop: &mut Shop) -> Result<u64, ShopOperationError> { insert_on(&self.db, shop).await }

    async fn update_shop(&self, shop: &Shop) -> Result<u64, ShopOperationError> { update_on(&self.db, shop).await }

    async fn query_by_shop_id(&self, shop_id: i64) -> Result<Option<Shop>, ShopOperationError> { find_on(&self.db, shop_id).await }

    async fn query_shop_list(&self, filter: &ShopFilter, row_offset: u64, page_size: u64) -> Result<Vec<Shop>, ShopOperationError> {
        list_on(&self.db, filter, row_offset, page_size).await
    }

    async fn query_shop_count(&self, filter: &ShopFilter) -> Result<u64, ShopOperationError> { count_on(&self.db, filter).await }
}

#[async_trait::async_trait]
impl ShopRepository for SeaOrmShopRepository {
    async fn begin(&self) -> Result<Box<dyn ShopTransaction>, ShopOperationError> {
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaOrmShopTransaction { txn }))
    }
}

#[async_trait::async_trait]
impl ShopStore for SeaOrmShopTransaction {
    async fn insert_shop(&self, shop: &mut Shop) -> Result<u64, ShopOperationError> { insert_on(&self.txn, shop).await }

    async fn update_shop(&self, shop: &Shop) -> Result<u64, ShopOperationError> { update_on(&self.txn, shop).await }

    async fn query_by_shop_id(&self, shop_id: i64) -> Result<Option<Shop>, ShopOperationError> { find_on(&self.txn, shop_id).await }

    async fn query_shop_list(&self, filter: &ShopFilter, row_offset: u64, page_size: u64) -> Result<Vec<Shop>, ShopOperationError> {
        list_on(&self.txn, filter, row_offset, page_size).await
    }

    async fn query_shop_count(&self, filter: &ShopFilter) -> Result<u64, ShopOperationError> { count_on(&self.txn, filter).await }
}

#[async_trait::async_trait]
impl ShopTransaction for SeaOrmShopTransaction {
    async fn commit(self: Box<Self>) -> Result<(), ShopOperationError> {
        let this = *self;
        Ok(this.txn.commit().await?)
    }

    async fn rollback(self: Box<Self>) -> Result<(), ShopOperationError> {
        let this = *self;
        Ok(this.txn.rollback().await?)
    }
}
