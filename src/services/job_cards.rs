use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    entities::{
        job_card::{self, Entity as JobCardEntity, JobCardStatus},
        job_card_item::{self, Entity as JobCardItemEntity},
        part::Entity as PartEntity,
        scooter::{self, Entity as ScooterEntity, ScooterStatus},
        service_checklist::{self, Entity as ChecklistEntity, DEFAULT_CHECKLIST_ITEMS},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{access::ScopedQuery, access::StoreScope, stock},
};

// Hard-coded clock year used by the retirement heuristic; misclassifies as
// time advances. TODO: derive from the current date.
const CURRENT_YEAR: i32 = 2025;

/// Scooters more than ten model years old are presumed retired rather than
/// returned to the rentable pool.
fn presumed_retired(year: i32) -> bool {
    year < CURRENT_YEAR - 10
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobCardItemInput {
    pub part_id: i64,
    pub quantity: Decimal,
    /// Falls back to the part's catalog unit price when unset
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJobCardInput {
    pub scooter_id: i64,
    /// Falls back to the scooter's home store when unset
    pub store_id: Option<i64>,
    #[serde(default)]
    pub status: Option<JobCardStatus>,
    pub description: Option<String>,
    pub reported_issue: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub labor_hours: Decimal,
    #[serde(default)]
    pub labor_rate: Decimal,
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<JobCardItemInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobCardDetail {
    pub job_card: job_card::Model,
    pub items: Vec<job_card_item::Model>,
    pub checklist: Vec<service_checklist::Model>,
}

/// Service for workshop job cards and the parts they consume
#[derive(Clone)]
pub struct JobCardService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl JobCardService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Next job card number in the JC000001 sequence.
    async fn next_job_card_number<C: ConnectionTrait>(db: &C) -> Result<String, ServiceError> {
        let last = JobCardEntity::find()
            .order_by_desc(job_card::Column::Id)
            .one(db)
            .await?;

        let next = last
            .and_then(|jc| jc.job_card_number.strip_prefix("JC")?.parse::<u32>().ok())
            .unwrap_or(0)
            + 1;

        Ok(format!("JC{:06}", next))
    }

    fn total_cost(
        labor_hours: Decimal,
        labor_rate: Decimal,
        items: &[job_card_item::Model],
    ) -> Decimal {
        labor_hours * labor_rate + items.iter().map(|i| i.line_total).sum::<Decimal>()
    }

    /// Applies the job-card-status side effect to the scooter. Completion
    /// returns the scooter to the pool (unless retired) and stamps the
    /// maintenance date; any active status parks it in maintenance.
    async fn apply_scooter_side_effect<C: ConnectionTrait>(
        db: &C,
        scooter: scooter::Model,
        job_status: &JobCardStatus,
    ) -> Result<scooter::Model, ServiceError> {
        if scooter.status == ScooterStatus::Retired {
            return Ok(scooter);
        }

        let mut active: scooter::ActiveModel = scooter.into();
        match job_status {
            JobCardStatus::Completed => {
                active.status = Set(ScooterStatus::Available);
                active.last_maintenance = Set(Some(Utc::now().date_naive()));
            }
            _ => {
                active.status = Set(ScooterStatus::Maintenance);
            }
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    /// Reverts the scooter once a job card goes away (delete or cancel):
    /// back to available if nothing else keeps it in the workshop, unless
    /// the age heuristic writes it off.
    async fn settle_scooter_after_removal<C: ConnectionTrait>(
        db: &C,
        scooter_id: i64,
        excluding_job_card: i64,
    ) -> Result<(), ServiceError> {
        let scooter = match ScooterEntity::find_by_id(scooter_id).one(db).await? {
            Some(s) => s,
            None => return Ok(()),
        };

        if scooter.status != ScooterStatus::Maintenance {
            return Ok(());
        }

        let other_active = JobCardEntity::find()
            .filter(job_card::Column::ScooterId.eq(scooter_id))
            .filter(job_card::Column::Id.ne(excluding_job_card))
            .filter(job_card::Column::Status.is_in([
                JobCardStatus::Pending,
                JobCardStatus::InProgress,
                JobCardStatus::OnHold,
            ]))
            .one(db)
            .await?;
        if other_active.is_some() {
            return Ok(());
        }

        let year = scooter.year;
        let mut active: scooter::ActiveModel = scooter.into();
        active.status = Set(if presumed_retired(year) {
            ScooterStatus::Retired
        } else {
            ScooterStatus::Available
        });
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    /// Opens a job card: validates every item against current stock before
    /// consuming anything, decrements stock, seeds the service checklist
    /// and parks the scooter in maintenance. All-or-nothing.
    #[instrument(skip(self, input))]
    pub async fn create_job_card(
        &self,
        input: CreateJobCardInput,
    ) -> Result<JobCardDetail, ServiceError> {
        input.validate()?;

        if input.labor_hours < Decimal::ZERO || input.labor_rate < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Labor figures cannot be negative".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let scooter = ScooterEntity::find_by_id(input.scooter_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Scooter {} not found", input.scooter_id))
            })?;
        let store_id = input.store_id.unwrap_or(scooter.store_id);

        // Pre-validate all items so an insufficient line aborts the whole
        // job card before any stock moves.
        let mut resolved_items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            if item.quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Item quantity must be positive".to_string(),
                ));
            }
            let part = PartEntity::find_by_id(item.part_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Part {} not found", item.part_id))
                })?;
            if part.store_id != store_id {
                return Err(ServiceError::ValidationError(format!(
                    "Part {} belongs to a different store",
                    part.part_number
                )));
            }
            if part.current_stock < item.quantity {
                return Err(ServiceError::InsufficientStock(format!(
                    "Part {} has {} in stock, job card needs {}",
                    part.part_number, part.current_stock, item.quantity
                )));
            }
            let unit_price = item.unit_price.unwrap_or(part.unit_price);
            resolved_items.push((part, item.quantity, unit_price));
        }

        let status = input.status.unwrap_or(JobCardStatus::Pending);
        let previous_scooter_status = scooter.status.clone();
        let job_card_number = Self::next_job_card_number(&txn).await?;
        let now = Utc::now();

        let created = job_card::ActiveModel {
            job_card_number: Set(job_card_number.clone()),
            scooter_id: Set(input.scooter_id),
            store_id: Set(store_id),
            status: Set(status.clone()),
            description: Set(input.description),
            reported_issue: Set(input.reported_issue),
            priority: Set(input.priority),
            labor_hours: Set(input.labor_hours),
            labor_rate: Set(input.labor_rate),
            total_cost: Set(Decimal::ZERO),
            previous_scooter_status: Set(Some(previous_scooter_status.to_string())),
            scheduled_date: Set(input.scheduled_date),
            actual_completion: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(resolved_items.len());
        for (part, quantity, unit_price) in resolved_items {
            stock::adjust_stock(&txn, part.id, -quantity).await?;
            let saved = job_card_item::ActiveModel {
                job_card_id: Set(created.id),
                part_id: Set(part.id),
                quantity: Set(quantity),
                unit_price: Set(unit_price),
                line_total: Set(quantity * unit_price),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(saved);
        }

        let mut checklist = Vec::with_capacity(DEFAULT_CHECKLIST_ITEMS.len());
        for item_name in DEFAULT_CHECKLIST_ITEMS {
            let entry = service_checklist::ActiveModel {
                job_card_id: Set(created.id),
                item_name: Set(item_name.to_string()),
                is_checked: Set(false),
                notes: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            checklist.push(entry);
        }

        let mut active: job_card::ActiveModel = created.into();
        active.total_cost = Set(Self::total_cost(
            input.labor_hours,
            input.labor_rate,
            &items,
        ));
        let job_card = active.update(&txn).await?;

        Self::apply_scooter_side_effect(&txn, scooter, &status).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::JobCardCreated {
                job_card_id: job_card.id,
                job_card_number,
                scooter_id: input.scooter_id,
            })
            .await;

        info!(
            job_card_id = job_card.id,
            job_card_number = %job_card.job_card_number,
            "job card opened"
        );
        Ok(JobCardDetail {
            job_card,
            items,
            checklist,
        })
    }

    /// Moves a job card to a new status; completion stamps the finish time,
    /// locks in the total, and returns the scooter to the pool. The guard on
    /// an actual change makes re-completing a no-op rather than re-firing
    /// side effects.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        job_card_id: i64,
        new_status: JobCardStatus,
    ) -> Result<job_card::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = JobCardEntity::find_by_id(job_card_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Job card {} not found", job_card_id))
            })?;

        let old_status = existing.status.clone();
        if old_status == new_status {
            txn.commit().await?;
            return Ok(existing);
        }
        if matches!(
            old_status,
            JobCardStatus::Completed | JobCardStatus::Cancelled
        ) {
            return Err(ServiceError::InvalidStatus(format!(
                "Job card {} is {:?} and cannot change status",
                existing.job_card_number, old_status
            )));
        }

        let items = JobCardItemEntity::find()
            .filter(job_card_item::Column::JobCardId.eq(job_card_id))
            .all(&txn)
            .await?;

        let scooter_id = existing.scooter_id;
        let labor_hours = existing.labor_hours;
        let labor_rate = existing.labor_rate;

        let mut active: job_card::ActiveModel = existing.into();
        active.status = Set(new_status.clone());
        active.updated_at = Set(Utc::now());
        if new_status == JobCardStatus::Completed {
            active.actual_completion = Set(Some(Utc::now()));
            active.total_cost = Set(Self::total_cost(labor_hours, labor_rate, &items));
        }
        let updated = active.update(&txn).await?;

        match new_status {
            JobCardStatus::Cancelled => {
                Self::settle_scooter_after_removal(&txn, scooter_id, job_card_id).await?;
            }
            ref status => {
                if let Some(scooter) = ScooterEntity::find_by_id(scooter_id).one(&txn).await? {
                    Self::apply_scooter_side_effect(&txn, scooter, status).await?;
                }
            }
        }

        txn.commit().await?;

        if updated.status == JobCardStatus::Completed {
            self.event_sender
                .send_or_log(Event::JobCardCompleted {
                    job_card_id: updated.id,
                    total_cost: updated.total_cost,
                })
                .await;
        } else {
            self.event_sender
                .send_or_log(Event::JobCardStatusChanged {
                    job_card_id: updated.id,
                    old_status: old_status.to_string(),
                    new_status: updated.status.to_string(),
                })
                .await;
        }

        Ok(updated)
    }

    /// Consumes a part on an open job card, decrementing stock.
    #[instrument(skip(self))]
    pub async fn add_part(
        &self,
        job_card_id: i64,
        part_id: i64,
        quantity: Decimal,
        unit_price: Option<Decimal>,
    ) -> Result<job_card_item::Model, ServiceError> {
        if quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Item quantity must be positive".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let job_card = JobCardEntity::find_by_id(job_card_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Job card {} not found", job_card_id))
            })?;
        if !job_card.status.is_active() {
            return Err(ServiceError::InvalidStatus(format!(
                "Job card {} is {:?}, parts can only be added while it is open",
                job_card.job_card_number, job_card.status
            )));
        }

        let part = PartEntity::find_by_id(part_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Part {} not found", part_id)))?;
        if part.store_id != job_card.store_id {
            return Err(ServiceError::ValidationError(format!(
                "Part {} belongs to a different store",
                part.part_number
            )));
        }

        let unit_price = unit_price.unwrap_or(part.unit_price);
        stock::adjust_stock(&txn, part.id, -quantity).await?;

        let now = Utc::now();
        let item = job_card_item::ActiveModel {
            job_card_id: Set(job_card.id),
            part_id: Set(part.id),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            line_total: Set(quantity * unit_price),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        Self::recompute_total(&txn, job_card).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PartConsumed {
                job_card_id,
                part_id,
                quantity,
            })
            .await;

        Ok(item)
    }

    /// Removes a consumed part from an open job card, returning its quantity
    /// to stock.
    #[instrument(skip(self))]
    pub async fn remove_part(&self, job_card_id: i64, item_id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let job_card = JobCardEntity::find_by_id(job_card_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Job card {} not found", job_card_id))
            })?;
        if !job_card.status.is_active() {
            return Err(ServiceError::InvalidStatus(format!(
                "Job card {} is {:?}, parts can only be removed while it is open",
                job_card.job_card_number, job_card.status
            )));
        }

        let item = JobCardItemEntity::find_by_id(item_id)
            .one(&txn)
            .await?
            .filter(|i| i.job_card_id == job_card.id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Job card item {} not found", item_id))
            })?;

        stock::adjust_stock(&txn, item.part_id, item.quantity).await?;
        JobCardItemEntity::delete_by_id(item.id).exec(&txn).await?;

        Self::recompute_total(&txn, job_card).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn recompute_total<C: ConnectionTrait>(
        db: &C,
        job_card: job_card::Model,
    ) -> Result<job_card::Model, ServiceError> {
        let items = JobCardItemEntity::find()
            .filter(job_card_item::Column::JobCardId.eq(job_card.id))
            .all(db)
            .await?;
        let total = Self::total_cost(job_card.labor_hours, job_card.labor_rate, &items);

        let mut active: job_card::ActiveModel = job_card.into();
        active.total_cost = Set(total);
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    /// Ticks or unticks a checklist entry.
    #[instrument(skip(self))]
    pub async fn set_checklist_item(
        &self,
        job_card_id: i64,
        checklist_id: i64,
        is_checked: bool,
        notes: Option<String>,
    ) -> Result<service_checklist::Model, ServiceError> {
        let db = &*self.db;

        let entry = ChecklistEntity::find_by_id(checklist_id)
            .one(db)
            .await?
            .filter(|c| c.job_card_id == job_card_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Checklist item {} not found", checklist_id))
            })?;

        let mut active: service_checklist::ActiveModel = entry.into();
        active.is_checked = Set(is_checked);
        if let Some(notes) = notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    /// Deletes a job card, returning every consumed part to stock, and
    /// settles the scooter's status.
    #[instrument(skip(self))]
    pub async fn delete_job_card(&self, job_card_id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let job_card = JobCardEntity::find_by_id(job_card_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Job card {} not found", job_card_id))
            })?;

        let items = JobCardItemEntity::find()
            .filter(job_card_item::Column::JobCardId.eq(job_card_id))
            .all(&txn)
            .await?;
        for item in &items {
            stock::adjust_stock(&txn, item.part_id, item.quantity).await?;
        }

        JobCardItemEntity::delete_many()
            .filter(job_card_item::Column::JobCardId.eq(job_card_id))
            .exec(&txn)
            .await?;
        ChecklistEntity::delete_many()
            .filter(service_checklist::Column::JobCardId.eq(job_card_id))
            .exec(&txn)
            .await?;

        let scooter_id = job_card.scooter_id;
        JobCardEntity::delete_by_id(job_card.id).exec(&txn).await?;

        Self::settle_scooter_after_removal(&txn, scooter_id, job_card_id).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::JobCardDeleted(job_card_id))
            .await;

        info!(job_card_id, "job card deleted, parts returned to stock");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_job_card(
        &self,
        job_card_id: i64,
        scope: StoreScope,
    ) -> Result<JobCardDetail, ServiceError> {
        let job_card = JobCardEntity::find_by_id(job_card_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Job card {} not found", job_card_id))
            })?;

        if !scope.allows(Some(job_card.store_id)) {
            return Err(ServiceError::NotFound(format!(
                "Job card {} not found",
                job_card_id
            )));
        }

        let items = JobCardItemEntity::find()
            .filter(job_card_item::Column::JobCardId.eq(job_card_id))
            .all(&*self.db)
            .await?;
        let checklist = ChecklistEntity::find()
            .filter(service_checklist::Column::JobCardId.eq(job_card_id))
            .all(&*self.db)
            .await?;

        Ok(JobCardDetail {
            job_card,
            items,
            checklist,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_job_cards(
        &self,
        scope: StoreScope,
        status: Option<JobCardStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<job_card::Model>, u64), ServiceError> {
        let mut query = JobCardEntity::find()
            .scoped_to(job_card::Column::StoreId, scope)
            .order_by_desc(job_card::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(job_card::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let job_cards = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((job_cards, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_scooters_are_presumed_retired() {
        assert!(presumed_retired(2014));
        assert!(!presumed_retired(2015));
        assert!(!presumed_retired(2024));
    }
}
