use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::supplier::{self, Entity as SupplierEntity},
    errors::ServiceError,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSupplierInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub account_number: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSupplierInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub account_number: Option<String>,
    pub payment_terms: Option<String>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

/// Service for parts suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DatabaseConnection>,
}

impl SupplierService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create_supplier(
        &self,
        input: CreateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let created = supplier::ActiveModel {
            name: Set(input.name),
            contact_person: Set(input.contact_person),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            account_number: Set(input.account_number),
            payment_terms: Set(input.payment_terms),
            is_active: Set(true),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, supplier_id: i64) -> Result<supplier::Model, ServiceError> {
        SupplierEntity::find_by_id(supplier_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", supplier_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<supplier::Model>, ServiceError> {
        let mut query = SupplierEntity::find().order_by_asc(supplier::Column::Name);
        if !include_inactive {
            query = query.filter(supplier::Column::IsActive.eq(true));
        }
        Ok(query.all(&*self.db).await?)
    }

    #[instrument(skip(self, input))]
    pub async fn update_supplier(
        &self,
        supplier_id: i64,
        input: UpdateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_supplier(supplier_id).await?;

        let mut active: supplier::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(contact_person) = input.contact_person {
            active.contact_person = Set(Some(contact_person));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(account_number) = input.account_number {
            active.account_number = Set(Some(account_number));
        }
        if let Some(payment_terms) = input.payment_terms {
            active.payment_terms = Set(Some(payment_terms));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }
}
