use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::customer::{self, Entity as CustomerEntity},
    errors::ServiceError,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomerInput {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub id_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomerInput {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub id_number: Option<String>,
    pub address: Option<String>,
}

/// Service for rental customers
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DatabaseConnection>,
}

impl CustomerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let created = customer::ActiveModel {
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            id_number: Set(input.id_number),
            address: Set(input.address),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(&self, customer_id: i64) -> Result<customer::Model, ServiceError> {
        CustomerEntity::find_by_id(customer_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", customer_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        search: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<customer::Model>, u64), ServiceError> {
        let mut query = CustomerEntity::find()
            .order_by_asc(customer::Column::LastName)
            .order_by_asc(customer::Column::FirstName);

        if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", term.trim());
            query = query.filter(
                customer::Column::FirstName
                    .like(pattern.clone())
                    .or(customer::Column::LastName.like(pattern.clone()))
                    .or(customer::Column::Phone.like(pattern)),
            );
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let customers = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((customers, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_customer(
        &self,
        customer_id: i64,
        input: UpdateCustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_customer(customer_id).await?;

        let mut active: customer::ActiveModel = existing.into();
        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(id_number) = input.id_number {
            active.id_number = Set(Some(id_number));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }
}
