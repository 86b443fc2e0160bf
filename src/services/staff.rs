use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    entities::staff_profile::{self, Entity as StaffEntity, StaffRole},
    errors::ServiceError,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStaffInput {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    pub role: StaffRole,
    pub store_id: Option<i64>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStaffInput {
    pub role: Option<StaffRole>,
    /// Some(None) clears the store assignment, granting all-store visibility
    pub store_id: Option<Option<i64>>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

/// Service for staff profiles and their store assignments
#[derive(Clone)]
pub struct StaffService {
    db: Arc<DatabaseConnection>,
}

impl StaffService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create_staff(
        &self,
        input: CreateStaffInput,
    ) -> Result<staff_profile::Model, ServiceError> {
        input.validate()?;

        let exists = StaffEntity::find()
            .filter(staff_profile::Column::Username.eq(input.username.clone()))
            .one(&*self.db)
            .await?
            .is_some();
        if exists {
            return Err(ServiceError::ValidationError(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let now = Utc::now();
        let staff = staff_profile::ActiveModel {
            username: Set(input.username),
            role: Set(input.role),
            store_id: Set(input.store_id),
            phone: Set(input.phone),
            position: Set(input.position),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(staff_id = staff.id, username = %staff.username, "staff profile created");
        Ok(staff)
    }

    pub async fn get_staff(&self, staff_id: i64) -> Result<staff_profile::Model, ServiceError> {
        StaffEntity::find_by_id(staff_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Staff {} not found", staff_id)))
    }

    pub async fn list_staff(&self) -> Result<Vec<staff_profile::Model>, ServiceError> {
        Ok(StaffEntity::find()
            .order_by_asc(staff_profile::Column::Username)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input))]
    pub async fn update_staff(
        &self,
        staff_id: i64,
        input: UpdateStaffInput,
    ) -> Result<staff_profile::Model, ServiceError> {
        let staff = self.get_staff(staff_id).await?;

        let mut active: staff_profile::ActiveModel = staff.into();
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(store_id) = input.store_id {
            active.store_id = Set(store_id);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(position) = input.position {
            active.position = Set(Some(position));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }
}
