use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A scooter in the dealership fleet.
///
/// `status` is driven as a side effect of job-card and rental workflows;
/// `category` drives duration-bracketed rental pricing.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scooters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub vin: String,
    #[sea_orm(nullable)]
    pub license_number: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[sea_orm(nullable)]
    pub color: Option<String>,
    pub category: ScooterCategory,
    pub status: ScooterStatus,
    pub mileage: i32,
    pub store_id: i64,
    #[sea_orm(nullable)]
    pub purchase_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub purchase_price: Option<Decimal>,
    #[sea_orm(nullable)]
    pub last_maintenance: Option<NaiveDate>,
    #[sea_orm(nullable)]
    pub notes: Option<String>,
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
    #[sea_orm(has_many = "super::job_card::Entity")]
    JobCards,
    #[sea_orm(has_many = "super::rental::Entity")]
    Rentals,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::job_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobCards.def()
    }
}

impl Related<super::rental::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rentals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScooterStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "rented")]
    Rented,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    #[sea_orm(string_value = "retired")]
    Retired,
}

/// Rental pricing category (A: Sym Orbit 125cc, B: Jet 14 200cc,
/// C: Citycom 300cc, D: Vespa 150/300cc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum ScooterCategory {
    #[sea_orm(string_value = "A")]
    A,
    #[sea_orm(string_value = "B")]
    B,
    #[sea_orm(string_value = "C")]
    C,
    #[sea_orm(string_value = "D")]
    D,
}
