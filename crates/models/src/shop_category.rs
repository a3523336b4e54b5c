use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_category")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub shop_category_id: i64,
    pub shop_category_name: String,
    pub shop_category_desc: Option<String>,
    pub shop_category_img: Option<String>,
    pub priority: i32,
    pub parent_id: Option<i64>,
    pub create_time: DateTimeWithTimeZone,
    pub last_edit_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Parent }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Parent => Entity::belongs_to(Entity)
                .from(Column::ParentId)
                .to(Column::ShopCategoryId)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
