use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    sea_query::Query, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    entities::{
        customer::Entity as CustomerEntity,
        rental::{self, Entity as RentalEntity, RateType, RentalStatus},
        scooter::{self, Entity as ScooterEntity, ScooterCategory, ScooterStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::access::StoreScope,
};

/// Per-day rate for a category and rental duration. Four duration brackets:
/// exactly one day, 2-10 days, 11-29 days, and 30 days or more.
pub fn price_for(category: ScooterCategory, duration_days: i64) -> Decimal {
    let rates: [Decimal; 4] = match category {
        ScooterCategory::A => [dec!(400), dec!(300), dec!(225), dec!(120)],
        ScooterCategory::B => [dec!(450), dec!(350), dec!(255), dec!(150)],
        ScooterCategory::C => [dec!(550), dec!(500), dec!(350), dec!(250)],
        ScooterCategory::D => [dec!(850), dec!(600), dec!(400), dec!(250)],
    };
    match duration_days {
        i64::MIN..=1 => rates[0],
        2..=10 => rates[1],
        11..=29 => rates[2],
        _ => rates[3],
    }
}

/// Whole-day rental duration, never less than one billable day.
pub fn duration_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_days().max(1)
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRentalInput {
    pub scooter_id: i64,
    pub customer_id: i64,
    pub start_date: DateTime<Utc>,
    pub expected_end_date: DateTime<Utc>,
    #[serde(default)]
    pub rate_type: Option<RateType>,
    /// Ignored for daily rentals, whose rate comes off the pricing table
    pub rate_amount: Option<Decimal>,
    #[serde(default)]
    pub deposit_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReturnRentalInput {
    pub mileage_end: Option<i32>,
    #[serde(default)]
    pub deposit_returned: bool,
    pub notes: Option<String>,
}

/// Service for scooter rentals and category-based pricing
#[derive(Clone)]
pub struct RentalService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl RentalService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Next rental number in the R000001 sequence.
    async fn next_rental_number<C: ConnectionTrait>(db: &C) -> Result<String, ServiceError> {
        let last = RentalEntity::find()
            .order_by_desc(rental::Column::Id)
            .one(db)
            .await?;

        let next = last
            .and_then(|r| r.rental_number.strip_prefix('R')?.parse::<u32>().ok())
            .unwrap_or(0)
            + 1;

        Ok(format!("R{:06}", next))
    }

    /// Opens a rental on an available scooter and marks it rented.
    #[instrument(skip(self, input))]
    pub async fn create_rental(
        &self,
        input: CreateRentalInput,
    ) -> Result<rental::Model, ServiceError> {
        input.validate()?;

        if input.expected_end_date <= input.start_date {
            return Err(ServiceError::ValidationError(
                "Expected end date must be after the start date".to_string(),
            ));
        }
        if input.deposit_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Deposit cannot be negative".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let scooter = ScooterEntity::find_by_id(input.scooter_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Scooter {} not found", input.scooter_id))
            })?;
        if scooter.status != ScooterStatus::Available {
            return Err(ServiceError::InvalidOperation(format!(
                "Scooter {} is {}, only available scooters can be rented",
                scooter.vin, scooter.status
            )));
        }

        CustomerEntity::find_by_id(input.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer {} not found", input.customer_id))
            })?;

        let rate_type = input.rate_type.unwrap_or(RateType::Daily);
        let rate_amount = match rate_type {
            RateType::Daily => price_for(
                scooter.category,
                duration_days(input.start_date, input.expected_end_date),
            ),
            _ => input.rate_amount.ok_or_else(|| {
                ServiceError::ValidationError(
                    "Non-daily rentals need an explicit rate amount".to_string(),
                )
            })?,
        };

        let rental_number = Self::next_rental_number(&txn).await?;
        let now = Utc::now();
        let created = rental::ActiveModel {
            rental_number: Set(rental_number.clone()),
            scooter_id: Set(scooter.id),
            customer_id: Set(input.customer_id),
            start_date: Set(input.start_date),
            expected_end_date: Set(input.expected_end_date),
            actual_end_date: Set(None),
            rate_type: Set(rate_type),
            rate_amount: Set(rate_amount),
            deposit_amount: Set(input.deposit_amount),
            deposit_returned: Set(false),
            status: Set(RentalStatus::Active),
            mileage_start: Set(Some(scooter.mileage)),
            mileage_end: Set(None),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let scooter_id = scooter.id;
        let mut active: scooter::ActiveModel = scooter.into();
        active.status = Set(ScooterStatus::Rented);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::RentalCreated {
                rental_id: created.id,
                rental_number,
                scooter_id,
            })
            .await;

        info!(
            rental_id = created.id,
            rental_number = %created.rental_number,
            "rental opened"
        );
        Ok(created)
    }

    /// Closes a rental, recording the return mileage and freeing the
    /// scooter.
    #[instrument(skip(self, input))]
    pub async fn return_rental(
        &self,
        rental_id: i64,
        input: ReturnRentalInput,
    ) -> Result<rental::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        let existing = RentalEntity::find_by_id(rental_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Rental {} not found", rental_id)))?;
        if !matches!(existing.status, RentalStatus::Active | RentalStatus::Overdue) {
            return Err(ServiceError::InvalidStatus(format!(
                "Rental {} is {:?} and cannot be returned",
                existing.rental_number, existing.status
            )));
        }

        if let (Some(start), Some(end)) = (existing.mileage_start, input.mileage_end) {
            if end < start {
                return Err(ServiceError::ValidationError(
                    "Return mileage cannot be below the start mileage".to_string(),
                ));
            }
        }

        let scooter_id = existing.scooter_id;
        let now = Utc::now();

        let mut active: rental::ActiveModel = existing.into();
        active.status = Set(RentalStatus::Completed);
        active.actual_end_date = Set(Some(now));
        active.mileage_end = Set(input.mileage_end);
        active.deposit_returned = Set(input.deposit_returned);
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        if let Some(scooter) = ScooterEntity::find_by_id(scooter_id).one(&txn).await? {
            if scooter.status == ScooterStatus::Rented {
                let mut active: scooter::ActiveModel = scooter.into();
                active.status = Set(ScooterStatus::Available);
                if let Some(mileage_end) = input.mileage_end {
                    active.mileage = Set(mileage_end);
                }
                active.updated_at = Set(now);
                active.update(&txn).await?;
            }
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::RentalReturned {
                rental_id: updated.id,
                scooter_id,
            })
            .await;

        Ok(updated)
    }

    /// Cancels an active rental without billing, freeing the scooter.
    #[instrument(skip(self))]
    pub async fn cancel_rental(&self, rental_id: i64) -> Result<rental::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = RentalEntity::find_by_id(rental_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Rental {} not found", rental_id)))?;
        if existing.status != RentalStatus::Active {
            return Err(ServiceError::InvalidStatus(format!(
                "Rental {} is {:?} and cannot be cancelled",
                existing.rental_number, existing.status
            )));
        }

        let scooter_id = existing.scooter_id;
        let now = Utc::now();

        let mut active: rental::ActiveModel = existing.into();
        active.status = Set(RentalStatus::Cancelled);
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        if let Some(scooter) = ScooterEntity::find_by_id(scooter_id).one(&txn).await? {
            if scooter.status == ScooterStatus::Rented {
                let mut active: scooter::ActiveModel = scooter.into();
                active.status = Set(ScooterStatus::Available);
                active.updated_at = Set(now);
                active.update(&txn).await?;
            }
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::RentalCancelled(rental_id))
            .await;

        Ok(updated)
    }

    /// Flags active rentals past their expected end date as overdue.
    /// Returns the number of rentals flagged.
    #[instrument(skip(self))]
    pub async fn mark_overdue(&self) -> Result<u64, ServiceError> {
        let db = &*self.db;
        let now = Utc::now();

        let overdue = RentalEntity::find()
            .filter(rental::Column::Status.eq(RentalStatus::Active))
            .filter(rental::Column::ExpectedEndDate.lt(now))
            .all(db)
            .await?;

        let count = overdue.len() as u64;
        for r in overdue {
            let mut active: rental::ActiveModel = r.into();
            active.status = Set(RentalStatus::Overdue);
            active.updated_at = Set(now);
            active.update(db).await?;
        }

        if count > 0 {
            info!(count, "rentals flagged overdue");
        }
        Ok(count)
    }

    #[instrument(skip(self))]
    pub async fn get_rental(
        &self,
        rental_id: i64,
        scope: StoreScope,
    ) -> Result<rental::Model, ServiceError> {
        let rental = RentalEntity::find_by_id(rental_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Rental {} not found", rental_id)))?;

        // Rentals are scoped through the scooter's home store.
        let scooter_store = ScooterEntity::find_by_id(rental.scooter_id)
            .one(&*self.db)
            .await?
            .map(|s| s.store_id);
        if !scope.allows(scooter_store) {
            return Err(ServiceError::NotFound(format!(
                "Rental {} not found",
                rental_id
            )));
        }

        Ok(rental)
    }

    #[instrument(skip(self))]
    pub async fn list_rentals(
        &self,
        scope: StoreScope,
        status: Option<RentalStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<rental::Model>, u64), ServiceError> {
        let mut query = RentalEntity::find().order_by_desc(rental::Column::StartDate);

        if let StoreScope::Store(store_id) = scope {
            query = query.filter(
                rental::Column::ScooterId.in_subquery(
                    Query::select()
                        .column(scooter::Column::Id)
                        .from(ScooterEntity)
                        .and_where(scooter::Column::StoreId.eq(store_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(status) = status {
            query = query.filter(rental::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let rentals = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((rentals, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_a_brackets() {
        assert_eq!(price_for(ScooterCategory::A, 1), dec!(400));
        assert_eq!(price_for(ScooterCategory::A, 5), dec!(300));
        assert_eq!(price_for(ScooterCategory::A, 15), dec!(225));
        assert_eq!(price_for(ScooterCategory::A, 45), dec!(120));
    }

    #[test]
    fn bracket_boundaries() {
        assert_eq!(price_for(ScooterCategory::B, 2), dec!(350));
        assert_eq!(price_for(ScooterCategory::B, 10), dec!(350));
        assert_eq!(price_for(ScooterCategory::B, 11), dec!(255));
        assert_eq!(price_for(ScooterCategory::B, 29), dec!(255));
        assert_eq!(price_for(ScooterCategory::B, 30), dec!(150));
    }

    #[test]
    fn premium_categories() {
        assert_eq!(price_for(ScooterCategory::C, 1), dec!(550));
        assert_eq!(price_for(ScooterCategory::C, 20), dec!(350));
        assert_eq!(price_for(ScooterCategory::D, 1), dec!(850));
        assert_eq!(price_for(ScooterCategory::D, 7), dec!(600));
        assert_eq!(price_for(ScooterCategory::D, 30), dec!(250));
    }

    #[test]
    fn duration_never_below_one_day() {
        let start = Utc::now();
        assert_eq!(duration_days(start, start + chrono::Duration::hours(3)), 1);
        assert_eq!(duration_days(start, start + chrono::Duration::days(5)), 5);
    }
}
