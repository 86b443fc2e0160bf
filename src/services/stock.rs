use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

use crate::{
    entities::part::{self, Entity as PartEntity},
    errors::ServiceError,
    events::{Event, EventSender},
    services::access::{ScopedQuery, StoreScope},
};

/// Applies a stock delta to a part, failing when the result would go
/// negative. Used by every workflow that consumes stock (transfers, job
/// cards) so oversell is rejected up front.
pub async fn adjust_stock<C: ConnectionTrait>(
    db: &C,
    part_id: i64,
    delta: Decimal,
) -> Result<part::Model, ServiceError> {
    let part = PartEntity::find_by_id(part_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Part {} not found", part_id)))?;

    let new_stock = part.current_stock + delta;
    if new_stock < Decimal::ZERO {
        return Err(ServiceError::InsufficientStock(format!(
            "Part {} has {} in stock, cannot remove {}",
            part.part_number, part.current_stock, -delta
        )));
    }

    let mut active: part::ActiveModel = part.into();
    active.current_stock = Set(new_stock);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

/// Applies a stock delta to a part, clamping the result at zero instead of
/// failing. Used by deletion and reversal paths where the record being
/// backed out must not be blocked by drifted stock figures.
pub async fn adjust_stock_clamped<C: ConnectionTrait>(
    db: &C,
    part_id: i64,
    delta: Decimal,
) -> Result<part::Model, ServiceError> {
    let part = PartEntity::find_by_id(part_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Part {} not found", part_id)))?;

    let new_stock = (part.current_stock + delta).max(Decimal::ZERO);

    let mut active: part::ActiveModel = part.into();
    active.current_stock = Set(new_stock);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePartInput {
    #[validate(length(min = 1, max = 64))]
    pub part_number: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub store_id: i64,
    #[serde(default)]
    pub current_stock: Decimal,
    #[serde(default)]
    pub reorder_level: Decimal,
    #[serde(default)]
    pub unit_price: Decimal,
    pub category: Option<String>,
    pub location_in_store: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePartInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub reorder_level: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub category: Option<String>,
    pub location_in_store: Option<String>,
}

/// Service for managing the parts inventory of each store
#[derive(Clone)]
pub struct StockService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl StockService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input))]
    pub async fn create_part(&self, input: CreatePartInput) -> Result<part::Model, ServiceError> {
        input.validate()?;

        if input.current_stock < Decimal::ZERO || input.reorder_level < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Stock figures cannot be negative".to_string(),
            ));
        }

        let db = &*self.db;

        let existing = PartEntity::find()
            .filter(part::Column::PartNumber.eq(input.part_number.clone()))
            .filter(part::Column::StoreId.eq(input.store_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "Part {} already exists in store {}",
                input.part_number, input.store_id
            )));
        }

        let now = Utc::now();
        let active = part::ActiveModel {
            part_number: Set(input.part_number),
            name: Set(input.name),
            description: Set(input.description),
            store_id: Set(input.store_id),
            current_stock: Set(input.current_stock),
            reorder_level: Set(input.reorder_level),
            unit_price: Set(input.unit_price),
            category: Set(input.category),
            location_in_store: Set(input.location_in_store),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = active.insert(db).await.map_err(|e| {
            error!("Failed to create part: {}", e);
            ServiceError::db_error(e)
        })?;

        info!(part_id = created.id, part_number = %created.part_number, "part created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_part(
        &self,
        part_id: i64,
        scope: StoreScope,
    ) -> Result<part::Model, ServiceError> {
        let part = PartEntity::find_by_id(part_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Part {} not found", part_id)))?;

        if !scope.allows(Some(part.store_id)) {
            return Err(ServiceError::NotFound(format!("Part {} not found", part_id)));
        }

        Ok(part)
    }

    #[instrument(skip(self))]
    pub async fn list_parts(
        &self,
        scope: StoreScope,
        search: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<part::Model>, u64), ServiceError> {
        let mut query = PartEntity::find()
            .scoped_to(part::Column::StoreId, scope)
            .order_by_asc(part::Column::PartNumber);

        if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", term.trim());
            query = query.filter(
                part::Column::PartNumber
                    .like(pattern.clone())
                    .or(part::Column::Name.like(pattern)),
            );
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let parts = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((parts, total))
    }

    /// Parts at or below their reorder level, for restocking reports.
    #[instrument(skip(self))]
    pub async fn low_stock_parts(&self, scope: StoreScope) -> Result<Vec<part::Model>, ServiceError> {
        let parts = PartEntity::find()
            .scoped_to(part::Column::StoreId, scope)
            .filter(
                Expr::col(part::Column::CurrentStock).lte(Expr::col(part::Column::ReorderLevel)),
            )
            .order_by_asc(part::Column::PartNumber)
            .all(&*self.db)
            .await?;

        Ok(parts)
    }

    #[instrument(skip(self, input))]
    pub async fn update_part(
        &self,
        part_id: i64,
        scope: StoreScope,
        input: UpdatePartInput,
    ) -> Result<part::Model, ServiceError> {
        input.validate()?;
        let part = self.get_part(part_id, scope).await?;

        let mut active: part::ActiveModel = part.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(reorder_level) = input.reorder_level {
            if reorder_level < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Reorder level cannot be negative".to_string(),
                ));
            }
            active.reorder_level = Set(reorder_level);
        }
        if let Some(unit_price) = input.unit_price {
            active.unit_price = Set(unit_price);
        }
        if let Some(category) = input.category {
            active.category = Set(Some(category));
        }
        if let Some(location) = input.location_in_store {
            active.location_in_store = Set(Some(location));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_part(&self, part_id: i64, scope: StoreScope) -> Result<(), ServiceError> {
        let part = self.get_part(part_id, scope).await?;
        PartEntity::delete_by_id(part.id).exec(&*self.db).await?;
        info!(part_id, "part deleted");
        Ok(())
    }

    /// Manual stock correction, e.g. after a physical count.
    #[instrument(skip(self))]
    pub async fn adjust(
        &self,
        part_id: i64,
        scope: StoreScope,
        delta: Decimal,
        reason: String,
    ) -> Result<part::Model, ServiceError> {
        let part = self.get_part(part_id, scope).await?;
        let old_quantity = part.current_stock;

        let updated = adjust_stock(&*self.db, part.id, delta).await?;

        self.event_sender
            .send_or_log(Event::StockAdjusted {
                part_id: updated.id,
                old_quantity,
                new_quantity: updated.current_stock,
                reason,
            })
            .await;

        Ok(updated)
    }
}
