use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    entities::{
        part::{self, Entity as PartEntity},
        stock_transfer::{self, Entity as TransferEntity, TransferStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{access::StoreScope, stock},
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransferInput {
    pub part_id: i64,
    pub source_store_id: i64,
    pub destination_store_id: i64,
    pub quantity: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// Service for moving parts stock between stores
#[derive(Clone)]
pub struct TransferService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl TransferService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Generates a transfer number of the form TRF-YYYYMMDD-NNNN, retrying
    /// on the rare collision of the random suffix.
    async fn generate_transfer_number<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<String, ServiceError> {
        let date = Utc::now().format("%Y%m%d");
        for _ in 0..10 {
            let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
            let candidate = format!("TRF-{}-{:04}", date, suffix);
            let exists = TransferEntity::find()
                .filter(stock_transfer::Column::TransferNumber.eq(candidate.clone()))
                .one(db)
                .await?
                .is_some();
            if !exists {
                return Ok(candidate);
            }
        }
        Err(ServiceError::InternalError(
            "Could not allocate a unique transfer number".to_string(),
        ))
    }

    /// Creates a transfer in `pending` state. Source stock is decremented
    /// immediately at creation, not at completion.
    #[instrument(skip(self, input))]
    pub async fn create_transfer(
        &self,
        input: CreateTransferInput,
    ) -> Result<stock_transfer::Model, ServiceError> {
        input.validate()?;

        if input.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Transfer quantity must be positive".to_string(),
            ));
        }
        if input.source_store_id == input.destination_store_id {
            return Err(ServiceError::ValidationError(
                "Source and destination stores must differ".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let part = PartEntity::find_by_id(input.part_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Part {} not found", input.part_id)))?;

        if part.store_id != input.source_store_id {
            return Err(ServiceError::ValidationError(format!(
                "Part {} does not belong to store {}",
                part.part_number, input.source_store_id
            )));
        }

        if part.current_stock < input.quantity {
            return Err(ServiceError::InsufficientStock(format!(
                "Part {} has {} in stock at the source store, cannot transfer {}",
                part.part_number, part.current_stock, input.quantity
            )));
        }

        stock::adjust_stock(&txn, part.id, -input.quantity).await?;

        let transfer_number = self.generate_transfer_number(&txn).await?;
        let now = Utc::now();
        let transfer = stock_transfer::ActiveModel {
            transfer_number: Set(transfer_number.clone()),
            part_id: Set(part.id),
            source_store_id: Set(input.source_store_id),
            destination_store_id: Set(input.destination_store_id),
            quantity: Set(input.quantity),
            status: Set(TransferStatus::Pending),
            transfer_date: Set(now),
            notes: Set(input.notes),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = transfer.insert(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::TransferCreated {
                transfer_id: created.id,
                transfer_number,
            })
            .await;

        info!(
            transfer_id = created.id,
            transfer_number = %created.transfer_number,
            "transfer created, source stock decremented"
        );
        Ok(created)
    }

    /// Completes a pending transfer: finds or creates the matching part at
    /// the destination store and increments its stock. The status guard makes
    /// completion idempotent; a second attempt does not double-increment.
    #[instrument(skip(self))]
    pub async fn complete_transfer(
        &self,
        transfer_id: i64,
    ) -> Result<stock_transfer::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let transfer = TransferEntity::find_by_id(transfer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Transfer {} not found", transfer_id))
            })?;

        if transfer.status != TransferStatus::Pending {
            return Err(ServiceError::InvalidStatus(format!(
                "Transfer {} is {:?}, only pending transfers can be completed",
                transfer.transfer_number, transfer.status
            )));
        }

        let source_part = PartEntity::find_by_id(transfer.part_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Part {} not found", transfer.part_id))
            })?;

        // Same part number in a different store is a distinct row; create it
        // from the source part's descriptive attributes if absent, refresh
        // those attributes if it already exists.
        let destination_part = match PartEntity::find()
            .filter(part::Column::PartNumber.eq(source_part.part_number.clone()))
            .filter(part::Column::StoreId.eq(transfer.destination_store_id))
            .one(&txn)
            .await?
        {
            Some(existing) => {
                let mut active: part::ActiveModel = existing.into();
                active.name = Set(source_part.name.clone());
                active.description = Set(source_part.description.clone());
                active.reorder_level = Set(source_part.reorder_level);
                active.unit_price = Set(source_part.unit_price);
                active.category = Set(source_part.category.clone());
                active.location_in_store = Set(source_part.location_in_store.clone());
                active.updated_at = Set(Utc::now());
                active.update(&txn).await?
            }
            None => {
                let now = Utc::now();
                part::ActiveModel {
                    part_number: Set(source_part.part_number.clone()),
                    name: Set(source_part.name.clone()),
                    description: Set(source_part.description.clone()),
                    store_id: Set(transfer.destination_store_id),
                    current_stock: Set(Decimal::ZERO),
                    reorder_level: Set(source_part.reorder_level),
                    unit_price: Set(source_part.unit_price),
                    category: Set(source_part.category.clone()),
                    location_in_store: Set(source_part.location_in_store.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        stock::adjust_stock(&txn, destination_part.id, transfer.quantity).await?;

        let mut active: stock_transfer::ActiveModel = transfer.into();
        active.status = Set(TransferStatus::Completed);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::TransferCompleted {
                transfer_id: updated.id,
                destination_part_id: destination_part.id,
            })
            .await;

        info!(
            transfer_id = updated.id,
            destination_part_id = destination_part.id,
            "transfer completed"
        );
        Ok(updated)
    }

    /// Cancels a pending transfer. The source decrement made at creation is
    /// not reversed; a corrective manual adjustment is the operator's call.
    #[instrument(skip(self))]
    pub async fn cancel_transfer(
        &self,
        transfer_id: i64,
    ) -> Result<stock_transfer::Model, ServiceError> {
        let db = &*self.db;

        let transfer = TransferEntity::find_by_id(transfer_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Transfer {} not found", transfer_id))
            })?;

        if transfer.status != TransferStatus::Pending {
            return Err(ServiceError::InvalidStatus(format!(
                "Transfer {} is {:?}, only pending transfers can be cancelled",
                transfer.transfer_number, transfer.status
            )));
        }

        let transfer_id = transfer.id;
        let mut active: stock_transfer::ActiveModel = transfer.into();
        active.status = Set(TransferStatus::Cancelled);
        active.updated_at = Set(Utc::now());
        let updated = active.update(db).await?;

        self.event_sender
            .send_or_log(Event::TransferCancelled(transfer_id))
            .await;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn get_transfer(
        &self,
        transfer_id: i64,
        scope: StoreScope,
    ) -> Result<stock_transfer::Model, ServiceError> {
        let transfer = TransferEntity::find_by_id(transfer_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Transfer {} not found", transfer_id))
            })?;

        let visible = scope.allows(Some(transfer.source_store_id))
            || scope.allows(Some(transfer.destination_store_id));
        if !visible {
            return Err(ServiceError::NotFound(format!(
                "Transfer {} not found",
                transfer_id
            )));
        }

        Ok(transfer)
    }

    /// Transfers visible to the caller: those touching their store on either
    /// end, or everything for unrestricted staff.
    #[instrument(skip(self))]
    pub async fn list_transfers(
        &self,
        scope: StoreScope,
        status: Option<TransferStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<stock_transfer::Model>, u64), ServiceError> {
        let mut query = TransferEntity::find().order_by_desc(stock_transfer::Column::CreatedAt);

        if let StoreScope::Store(store_id) = scope {
            query = query.filter(
                Condition::any()
                    .add(stock_transfer::Column::SourceStoreId.eq(store_id))
                    .add(stock_transfer::Column::DestinationStoreId.eq(store_id)),
            );
        }
        if let Some(status) = status {
            query = query.filter(stock_transfer::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let transfers = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((transfers, total))
    }
}
