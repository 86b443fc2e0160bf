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
    entities::store::{self, Entity as StoreEntity},
    errors::ServiceError,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStoreInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStoreInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

/// Service for dealership locations
#[derive(Clone)]
pub struct StoreService {
    db: Arc<DatabaseConnection>,
}

impl StoreService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create_store(&self, input: CreateStoreInput) -> Result<store::Model, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let created = store::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            phone: Set(input.phone),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(store_id = created.id, name = %created.name, "store created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_store(&self, store_id: i64) -> Result<store::Model, ServiceError> {
        StoreEntity::find_by_id(store_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Store {} not found", store_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_stores(&self, include_inactive: bool) -> Result<Vec<store::Model>, ServiceError> {
        let mut query = StoreEntity::find().order_by_asc(store::Column::Name);
        if !include_inactive {
            query = query.filter(store::Column::IsActive.eq(true));
        }
        Ok(query.all(&*self.db).await?)
    }

    #[instrument(skip(self, input))]
    pub async fn update_store(
        &self,
        store_id: i64,
        input: UpdateStoreInput,
    ) -> Result<store::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_store(store_id).await?;

        let mut active: store::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }
}
