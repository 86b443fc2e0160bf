use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stock-keeping unit scoped to exactly one store.
///
/// `current_stock` is the stock ledger: a non-negative decimal (fractional
/// units are used for liquids such as brake fluid). The same `part_number`
/// may exist at several stores as independent rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub part_number: String,
    pub name: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    pub store_id: i64,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub current_stock: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub reorder_level: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_price: Decimal,
    #[sea_orm(nullable)]
    pub category: Option<String>,
    #[sea_orm(nullable)]
    pub location_in_store: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
    #[sea_orm(has_many = "super::job_card_item::Entity")]
    JobCardItems,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::job_card_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobCardItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
