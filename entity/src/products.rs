use crate::Status;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub store_id: i32,
    pub image_url: String,
    #[sea_orm(indexed)]
    pub name: String,
    pub description: Option<String>,
    pub status: Status,
    /// NUMERIC(10,2); non-negative expected but not enforced.
    pub price: Decimal,
    pub stock: i32,
    pub available_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Store,
    OrderItem,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Store => Entity::belongs_to(super::stores::Entity)
                .from(Column::StoreId)
                .to(super::stores::Column::Id)
                .into(),
            Self::OrderItem => Entity::has_many(super::order_items::Entity).into(),
        }
    }
}

impl Related<super::stores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
