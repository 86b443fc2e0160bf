use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One inspection line on a job card's service checklist.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_checklists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub job_card_id: i64,
    pub item_name: String,
    pub is_checked: bool,
    #[sea_orm(nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_card::Entity",
        from = "Column::JobCardId",
        to = "super::job_card::Column::Id"
    )]
    JobCard,
}

impl Related<super::job_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Default checklist seeded for every new job card.
pub const DEFAULT_CHECKLIST_ITEMS: [&str; 6] = [
    "Brake inspection",
    "Battery check",
    "Tire pressure and condition",
    "Lights and signals testing",
    "Electrical system check",
    "Frame and suspension inspection",
];
