use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A scooter rental agreement.
///
/// For `daily` rentals `rate_amount` is computed from the scooter's
/// category and the duration bracket, not entered by hand.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rentals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub rental_number: String,
    pub scooter_id: i64,
    pub customer_id: i64,
    pub start_date: DateTime<Utc>,
    pub expected_end_date: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub actual_end_date: Option<DateTime<Utc>>,
    pub rate_type: RateType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub rate_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub deposit_amount: Decimal,
    pub deposit_returned: bool,
    pub status: RentalStatus,
    #[sea_orm(nullable)]
    pub mileage_start: Option<i32>,
    #[sea_orm(nullable)]
    pub mileage_end: Option<i32>,
    #[sea_orm(nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::scooter::Entity",
        from = "Column::ScooterId",
        to = "super::scooter::Column::Id"
    )]
    Scooter,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::scooter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scooter.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "overdue")]
    Overdue,
}
