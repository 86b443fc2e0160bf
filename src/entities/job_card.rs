use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A service work order tracking labor and parts consumed on a scooter.
///
/// `previous_scooter_status` remembers what the scooter was before the card
/// pulled it into maintenance, so an aborted create can restore it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub job_card_number: String,
    pub scooter_id: i64,
    pub store_id: i64,
    pub status: JobCardStatus,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    #[sea_orm(nullable)]
    pub reported_issue: Option<String>,
    #[sea_orm(nullable)]
    pub priority: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub labor_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub labor_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_cost: Decimal,
    #[sea_orm(nullable)]
    pub previous_scooter_status: Option<String>,
    #[sea_orm(nullable)]
    pub scheduled_date: Option<NaiveDate>,
    #[sea_orm(nullable)]
    pub actual_completion: Option<DateTime<Utc>>,
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
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
    #[sea_orm(has_many = "super::job_card_item::Entity")]
    Items,
    #[sea_orm(has_many = "super::service_checklist::Entity")]
    ChecklistItems,
}

impl Related<super::scooter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scooter.def()
    }
}

impl Related<super::job_card_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::service_checklist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChecklistItems.def()
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
pub enum JobCardStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "on_hold")]
    OnHold,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl JobCardStatus {
    /// Active cards keep a scooter in maintenance.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress | Self::OnHold)
    }
}
