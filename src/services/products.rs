use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::product::{self, Entity as ProductEntity},
    errors::ServiceError,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub stock: Option<i32>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

/// Service for the web shop product catalog
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        if input.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Price cannot be negative".to_string(),
            ));
        }

        let db = &*self.db;
        let duplicate = ProductEntity::find()
            .filter(product::Column::Sku.eq(input.sku.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "SKU {} already exists",
                input.sku
            )));
        }

        let now = Utc::now();
        let created = product::ActiveModel {
            name: Set(input.name),
            sku: Set(input.sku),
            description: Set(input.description),
            price: Set(input.price),
            sale_price: Set(input.sale_price),
            image_url: Set(input.image_url),
            category: Set(input.category),
            brand: Set(input.brand),
            stock: Set(input.stock),
            is_featured: Set(input.is_featured),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: i64) -> Result<product::Model, ServiceError> {
        ProductEntity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category: Option<String>,
        featured_only: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let mut query = ProductEntity::find()
            .filter(product::Column::IsActive.eq(true))
            .order_by_asc(product::Column::Name);

        if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
            query = query.filter(product::Column::Category.eq(category.trim().to_string()));
        }
        if featured_only {
            query = query.filter(product::Column::IsFeatured.eq(true));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let products = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((products, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        product_id: i64,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_product(product_id).await?;

        let mut active: product::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = input.price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Price cannot be negative".to_string(),
                ));
            }
            active.price = Set(price);
        }
        if let Some(sale_price) = input.sale_price {
            active.sale_price = Set(Some(sale_price));
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(category) = input.category {
            active.category = Set(Some(category));
        }
        if let Some(brand) = input.brand {
            active.brand = Set(Some(brand));
        }
        if let Some(stock) = input.stock {
            active.stock = Set(stock);
        }
        if let Some(is_featured) = input.is_featured {
            active.is_featured = Set(is_featured);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }
}
