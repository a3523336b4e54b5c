use sea_orm::{entity::prelude::*, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::{area, errors, shop_category, shop_state::ShopState};

pub const SHOP_NAME_MAX: usize = 256;
pub const PHONE_MAX: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub shop_id: i64,
    pub owner_id: i64,
    pub area_id: i32,
    pub shop_category_id: i64,
    pub shop_name: String,
    pub shop_desc: Option<String>,
    pub shop_addr: Option<String>,
    pub phone: Option<String>,
    pub shop_img: Option<String>,
    pub enable_status: ShopState,
    pub advice: Option<String>,
    pub create_time: DateTimeWithTimeZone,
    pub last_edit_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Area, ShopCategory }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Area => Entity::belongs_to(area::Entity)
                .from(Column::AreaId)
                .to(area::Column::AreaId)
                .into(),
            Relation::ShopCategory => Entity::belongs_to(shop_category::Entity)
                .from(Column::ShopCategoryId)
                .to(shop_category::Column::ShopCategoryId)
                .into(),
        }
    }
}

impl Related<area::Entity> for Entity {
    fn to() -> RelationDef { Relation::Area.def() }
}

impl Related<shop_category::Entity> for Entity {
    fn to() -> RelationDef { Relation::ShopCategory.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_shop_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("shop_name required".into()));
    }
    if name.chars().count() > SHOP_NAME_MAX {
        return Err(errors::ModelError::Validation(format!("shop_name longer than {SHOP_NAME_MAX} characters")));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), errors::ModelError> {
    if phone.chars().count() > PHONE_MAX {
        return Err(errors::ModelError::Validation(format!("phone longer than {PHONE_MAX} characters")));
    }
    if !phone.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')')) {
        return Err(errors::ModelError::Validation("phone may only contain digits, spaces and + - ( )".into()));
    }
    Ok(())
}

/// Insert a shop row and return the generated `shop_id`.
pub async fn insert<C: ConnectionTrait>(db: &C, am: ActiveModel) -> Result<i64, errors::ModelError> {
    let res = Entity::insert(am).exec(db).await?;
    Ok(res.last_insert_id)
}

/// Write only the columns set on `am` to the row with `shop_id`; returns affected rows.
pub async fn update_by_id<C: ConnectionTrait>(db: &C, shop_id: i64, am: ActiveModel) -> Result<u64, errors::ModelError> {
    let res = Entity::update_many()
        .set(am)
        .filter(Column::ShopId.eq(shop_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, shop_id: i64) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(shop_id).one(db).await?)
}
