use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    entities::scooter::{self, Entity as ScooterEntity, ScooterCategory, ScooterStatus},
    errors::ServiceError,
    services::access::{ScopedQuery, StoreScope},
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScooterInput {
    #[validate(length(min = 1, max = 64))]
    pub vin: String,
    pub license_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub make: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(range(min = 1990, max = 2100))]
    pub year: i32,
    pub color: Option<String>,
    pub category: ScooterCategory,
    pub store_id: i64,
    #[serde(default)]
    pub mileage: i32,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateScooterInput {
    pub license_number: Option<String>,
    pub color: Option<String>,
    pub status: Option<ScooterStatus>,
    pub mileage: Option<i32>,
    pub store_id: Option<i64>,
    pub notes: Option<String>,
}

/// Service for the scooter fleet
#[derive(Clone)]
pub struct FleetService {
    db: Arc<DatabaseConnection>,
}

impl FleetService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create_scooter(
        &self,
        input: CreateScooterInput,
    ) -> Result<scooter::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;
        let duplicate = ScooterEntity::find()
            .filter(scooter::Column::Vin.eq(input.vin.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "VIN {} is already registered",
                input.vin
            )));
        }

        let now = Utc::now();
        let created = scooter::ActiveModel {
            vin: Set(input.vin),
            license_number: Set(input.license_number),
            make: Set(input.make),
            model: Set(input.model),
            year: Set(input.year),
            color: Set(input.color),
            category: Set(input.category),
            status: Set(ScooterStatus::Available),
            mileage: Set(input.mileage),
            store_id: Set(input.store_id),
            purchase_date: Set(input.purchase_date),
            purchase_price: Set(input.purchase_price),
            last_maintenance: Set(None),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(scooter_id = created.id, vin = %created.vin, "scooter registered");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_scooter(
        &self,
        scooter_id: i64,
        scope: StoreScope,
    ) -> Result<scooter::Model, ServiceError> {
        let scooter = ScooterEntity::find_by_id(scooter_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Scooter {} not found", scooter_id)))?;

        if !scope.allows(Some(scooter.store_id)) {
            return Err(ServiceError::NotFound(format!(
                "Scooter {} not found",
                scooter_id
            )));
        }

        Ok(scooter)
    }

    #[instrument(skip(self))]
    pub async fn list_scooters(
        &self,
        scope: StoreScope,
        status: Option<ScooterStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<scooter::Model>, u64), ServiceError> {
        let mut query = ScooterEntity::find()
            .scoped_to(scooter::Column::StoreId, scope)
            .order_by_asc(scooter::Column::Vin);

        if let Some(status) = status {
            query = query.filter(scooter::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let scooters = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((scooters, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_scooter(
        &self,
        scooter_id: i64,
        scope: StoreScope,
        input: UpdateScooterInput,
    ) -> Result<scooter::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_scooter(scooter_id, scope).await?;

        let mut active: scooter::ActiveModel = existing.into();
        if let Some(license_number) = input.license_number {
            active.license_number = Set(Some(license_number));
        }
        if let Some(color) = input.color {
            active.color = Set(Some(color));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(mileage) = input.mileage {
            if mileage < 0 {
                return Err(ServiceError::ValidationError(
                    "Mileage cannot be negative".to_string(),
                ));
            }
            active.mileage = Set(mileage);
        }
        if let Some(store_id) = input.store_id {
            active.store_id = Set(store_id);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_scooter(
        &self,
        scooter_id: i64,
        scope: StoreScope,
    ) -> Result<(), ServiceError> {
        let scooter = self.get_scooter(scooter_id, scope).await?;
        if scooter.status == ScooterStatus::Rented {
            return Err(ServiceError::InvalidOperation(
                "Rented scooters cannot be deleted".to_string(),
            ));
        }
        ScooterEntity::delete_by_id(scooter.id).exec(&*self.db).await?;
        info!(scooter_id, "scooter deleted");
        Ok(())
    }
}
