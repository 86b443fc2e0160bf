use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Query, ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    entities::{
        purchase::{self, Entity as PurchaseEntity, PurchaseStatus},
        purchase_item::{self, Entity as PurchaseItemEntity},
        supplier::Entity as SupplierEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{access::StoreScope, stock},
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PurchaseItemInput {
    /// Present when updating an existing line item
    pub id: Option<i64>,
    pub part_id: Option<i64>,
    pub store_id: Option<i64>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePurchaseInput {
    #[validate(length(min = 1, max = 64))]
    pub invoice_number: String,
    pub supplier_id: i64,
    pub store_id: Option<i64>,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub items: Vec<PurchaseItemInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePurchaseInput {
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Full replacement set of line items. Items carrying an id are updated
    /// in place, items without an id are added, and existing items missing
    /// from the set are removed.
    pub items: Vec<PurchaseItemInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseWithItems {
    pub purchase: purchase::Model,
    pub items: Vec<purchase_item::Model>,
}

/// Service for receiving supplier invoices into stock
#[derive(Clone)]
pub struct PurchaseService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl PurchaseService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    fn validate_items(items: &[PurchaseItemInput]) -> Result<(), ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A purchase needs at least one line item".to_string(),
            ));
        }
        for item in items {
            if item.quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Line item quantity must be positive".to_string(),
                ));
            }
            if item.unit_price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Line item unit price cannot be negative".to_string(),
                ));
            }
            if item.part_id.is_none() && item.description.as_deref().unwrap_or("").is_empty() {
                return Err(ServiceError::ValidationError(
                    "Line items without a catalog part need a description".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Creates a purchase and receives every resolvable line item into
    /// stock. All rows are written in one transaction, so a failing item
    /// leaves neither the purchase nor any stock increment behind.
    #[instrument(skip(self, input))]
    pub async fn create_purchase(
        &self,
        input: CreatePurchaseInput,
    ) -> Result<PurchaseWithItems, ServiceError> {
        input.validate()?;
        Self::validate_items(&input.items)?;

        let txn = self.db.begin().await?;

        let supplier = SupplierEntity::find_by_id(input.supplier_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier {} not found", input.supplier_id))
            })?;
        if !supplier.is_active {
            return Err(ServiceError::InvalidOperation(format!(
                "Supplier {} is inactive",
                supplier.name
            )));
        }

        let duplicate = PurchaseEntity::find()
            .filter(purchase::Column::InvoiceNumber.eq(input.invoice_number.clone()))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "Invoice {} already recorded",
                input.invoice_number
            )));
        }

        let now = Utc::now();
        let created = purchase::ActiveModel {
            invoice_number: Set(input.invoice_number.clone()),
            supplier_id: Set(input.supplier_id),
            store_id: Set(input.store_id),
            invoice_date: Set(input.invoice_date),
            due_date: Set(input.due_date),
            status: Set(PurchaseStatus::Pending),
            total_amount: Set(Decimal::ZERO),
            amount_paid: Set(Decimal::ZERO),
            notes: Set(input.notes),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut total_amount = Decimal::ZERO;
        let mut items = Vec::with_capacity(input.items.len());
        for item in input.items {
            let line_total = item.quantity * item.unit_price;
            total_amount += line_total;

            // A line item's store falls back to the purchase's store. Stock
            // only moves when the line resolves to both a catalog part and a
            // store; free-text or storeless lines count toward the total only.
            let item_store = item.store_id.or(input.store_id);
            if let (Some(part_id), Some(_)) = (item.part_id, item_store) {
                stock::adjust_stock(&txn, part_id, item.quantity).await?;
            }

            let saved = purchase_item::ActiveModel {
                purchase_id: Set(created.id),
                part_id: Set(item.part_id),
                store_id: Set(item_store),
                description: Set(item.description),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                line_total: Set(line_total),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(saved);
        }

        let mut active: purchase::ActiveModel = created.into();
        active.total_amount = Set(total_amount);
        let purchase = active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PurchaseReceived {
                purchase_id: purchase.id,
                invoice_number: input.invoice_number,
                total_amount,
            })
            .await;

        info!(
            purchase_id = purchase.id,
            invoice_number = %purchase.invoice_number,
            %total_amount,
            "purchase received into stock"
        );
        Ok(PurchaseWithItems { purchase, items })
    }

    /// Rewrites a purchase's line items, adjusting stock by the quantity
    /// difference per item. Removed items back their quantity out of stock
    /// floored at zero.
    #[instrument(skip(self, input))]
    pub async fn update_purchase(
        &self,
        purchase_id: i64,
        input: UpdatePurchaseInput,
    ) -> Result<PurchaseWithItems, ServiceError> {
        input.validate()?;
        Self::validate_items(&input.items)?;

        let txn = self.db.begin().await?;

        let existing = PurchaseEntity::find_by_id(purchase_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase {} not found", purchase_id))
            })?;
        if existing.status == PurchaseStatus::Cancelled {
            return Err(ServiceError::InvalidStatus(
                "Cancelled purchases cannot be edited".to_string(),
            ));
        }

        let current_items = PurchaseItemEntity::find()
            .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
            .all(&txn)
            .await?;
        let mut previous: HashMap<i64, purchase_item::Model> =
            current_items.into_iter().map(|i| (i.id, i)).collect();

        let now = Utc::now();
        let mut total_amount = Decimal::ZERO;
        let mut items = Vec::with_capacity(input.items.len());

        for item in input.items {
            let line_total = item.quantity * item.unit_price;
            total_amount += line_total;

            match item.id.and_then(|id| previous.remove(&id)) {
                Some(prior) => {
                    let quantity_diff = item.quantity - prior.quantity;
                    if let (Some(part_id), Some(_)) = (prior.part_id, prior.store_id) {
                        if quantity_diff != Decimal::ZERO {
                            stock::adjust_stock(&txn, part_id, quantity_diff).await?;
                        }
                    }

                    let mut active: purchase_item::ActiveModel = prior.into();
                    active.description = Set(item.description);
                    active.quantity = Set(item.quantity);
                    active.unit_price = Set(item.unit_price);
                    active.line_total = Set(line_total);
                    active.updated_at = Set(now);
                    items.push(active.update(&txn).await?);
                }
                None => {
                    let item_store = item.store_id.or(existing.store_id);
                    if let (Some(part_id), Some(_)) = (item.part_id, item_store) {
                        stock::adjust_stock(&txn, part_id, item.quantity).await?;
                    }
                    let saved = purchase_item::ActiveModel {
                        purchase_id: Set(purchase_id),
                        part_id: Set(item.part_id),
                        store_id: Set(item_store),
                        description: Set(item.description),
                        quantity: Set(item.quantity),
                        unit_price: Set(item.unit_price),
                        line_total: Set(line_total),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                    items.push(saved);
                }
            }
        }

        // Anything left in `previous` was dropped from the invoice.
        for (_, removed) in previous {
            if let (Some(part_id), Some(_)) = (removed.part_id, removed.store_id) {
                stock::adjust_stock_clamped(&txn, part_id, -removed.quantity).await?;
            }
            PurchaseItemEntity::delete_by_id(removed.id).exec(&txn).await?;
        }

        let mut active: purchase::ActiveModel = existing.into();
        active.total_amount = Set(total_amount);
        if let Some(due_date) = input.due_date {
            active.due_date = Set(Some(due_date));
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(now);
        let purchase = active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PurchaseUpdated(purchase.id))
            .await;

        Ok(PurchaseWithItems { purchase, items })
    }

    /// Deletes a purchase, backing every line item's quantity out of stock
    /// floored at zero.
    #[instrument(skip(self))]
    pub async fn delete_purchase(&self, purchase_id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let existing = PurchaseEntity::find_by_id(purchase_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase {} not found", purchase_id))
            })?;

        let items = PurchaseItemEntity::find()
            .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
            .all(&txn)
            .await?;

        for item in &items {
            if let (Some(part_id), Some(_)) = (item.part_id, item.store_id) {
                stock::adjust_stock_clamped(&txn, part_id, -item.quantity).await?;
            }
        }

        PurchaseItemEntity::delete_many()
            .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
            .exec(&txn)
            .await?;
        PurchaseEntity::delete_by_id(existing.id).exec(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PurchaseDeleted(purchase_id))
            .await;

        info!(purchase_id, "purchase deleted, stock reversed");
        Ok(())
    }

    /// Records a payment against the invoice and rolls the status forward.
    #[instrument(skip(self))]
    pub async fn record_payment(
        &self,
        purchase_id: i64,
        amount: Decimal,
    ) -> Result<purchase::Model, ServiceError> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Payment amount must be positive".to_string(),
            ));
        }

        let db = &*self.db;
        let existing = PurchaseEntity::find_by_id(purchase_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase {} not found", purchase_id))
            })?;
        if existing.status == PurchaseStatus::Cancelled {
            return Err(ServiceError::InvalidStatus(
                "Cancelled purchases cannot take payments".to_string(),
            ));
        }

        let amount_paid = existing.amount_paid + amount;
        let status = if amount_paid >= existing.total_amount {
            PurchaseStatus::Paid
        } else {
            PurchaseStatus::Partial
        };

        let mut active: purchase::ActiveModel = existing.into();
        active.amount_paid = Set(amount_paid);
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_purchase(
        &self,
        purchase_id: i64,
        scope: StoreScope,
    ) -> Result<PurchaseWithItems, ServiceError> {
        let purchase = PurchaseEntity::find_by_id(purchase_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase {} not found", purchase_id))
            })?;

        let items = PurchaseItemEntity::find()
            .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
            .all(&*self.db)
            .await?;

        // Visible when the header's store matches, or any line lands in the
        // caller's store.
        let visible = scope.allows(purchase.store_id)
            || items.iter().any(|i| {
                matches!(scope, StoreScope::Store(s) if i.store_id == Some(s))
            });
        if !visible {
            return Err(ServiceError::NotFound(format!(
                "Purchase {} not found",
                purchase_id
            )));
        }

        Ok(PurchaseWithItems { purchase, items })
    }

    #[instrument(skip(self))]
    pub async fn list_purchases(
        &self,
        scope: StoreScope,
        status: Option<PurchaseStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase::Model>, u64), ServiceError> {
        let mut query = PurchaseEntity::find().order_by_desc(purchase::Column::InvoiceDate);

        if let StoreScope::Store(store_id) = scope {
            query = query.filter(
                Condition::any()
                    .add(purchase::Column::StoreId.eq(store_id))
                    .add(purchase::Column::StoreId.is_null())
                    .add(
                        purchase::Column::Id.in_subquery(
                            Query::select()
                                .column(purchase_item::Column::PurchaseId)
                                .from(PurchaseItemEntity)
                                .and_where(purchase_item::Column::StoreId.eq(store_id))
                                .to_owned(),
                        ),
                    ),
            );
        }
        if let Some(status) = status {
            query = query.filter(purchase::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let purchases = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((purchases, total))
    }
}
