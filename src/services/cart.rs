use dashmap::DashMap;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use crate::{
    entities::product::Entity as ProductEntity,
    errors::ServiceError,
    events::{Event, EventSender},
};

/// One line in a session cart. Price, name and image are cached at the time
/// the item was added so the cart is stable against later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub quantity: u32,
    pub price: Decimal,
    pub name: String,
    pub image_url: Option<String>,
}

/// A session's cart: product id mapped to its cached line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionCart {
    pub items: HashMap<i64, CartItem>,
}

impl SessionCart {
    pub fn total(&self) -> Decimal {
        self.items
            .values()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.values().map(|i| i.quantity).sum()
    }
}

/// Storage for session carts, keyed by an opaque session identifier.
pub trait SessionStore: Send + Sync {
    fn load(&self, session_id: &str) -> SessionCart;
    fn save(&self, session_id: &str, cart: SessionCart);
    fn remove(&self, session_id: &str);
}

/// In-process session store backed by a concurrent map.
#[derive(Default)]
pub struct InMemorySessionStore {
    carts: DashMap<String, SessionCart>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, session_id: &str) -> SessionCart {
        self.carts
            .get(session_id)
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn save(&self, session_id: &str, cart: SessionCart) {
        self.carts.insert(session_id.to_string(), cart);
    }

    fn remove(&self, session_id: &str) {
        self.carts.remove(session_id);
    }
}

/// Service for the web shop session cart
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
    sessions: Arc<dyn SessionStore>,
    event_sender: EventSender,
}

impl CartService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        sessions: Arc<dyn SessionStore>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            db,
            sessions,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub fn get_cart(&self, session_id: &str) -> SessionCart {
        self.sessions.load(session_id)
    }

    /// Adds a product to the cart, merging quantities for repeat adds and
    /// caching the product's display price at add time.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        session_id: &str,
        product_id: i64,
        quantity: u32,
    ) -> Result<SessionCart, ServiceError> {
        if quantity == 0 {
            return Err(ServiceError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = ProductEntity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let mut cart = self.sessions.load(session_id);
        let entry = cart.items.entry(product_id).or_insert_with(|| CartItem {
            quantity: 0,
            price: product.display_price(),
            name: product.name.clone(),
            image_url: product.image_url.clone(),
        });
        entry.quantity += quantity;
        self.sessions.save(session_id, cart.clone());

        self.event_sender
            .send_or_log(Event::CartItemAdded {
                session_id: session_id.to_string(),
                product_id,
            })
            .await;

        Ok(cart)
    }

    /// Sets the quantity of an existing line; zero removes it.
    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        session_id: &str,
        product_id: i64,
        quantity: u32,
    ) -> Result<SessionCart, ServiceError> {
        let mut cart = self.sessions.load(session_id);
        if !cart.items.contains_key(&product_id) {
            return Err(ServiceError::NotFound(format!(
                "Product {} is not in the cart",
                product_id
            )));
        }

        if quantity == 0 {
            cart.items.remove(&product_id);
        } else if let Some(item) = cart.items.get_mut(&product_id) {
            item.quantity = quantity;
        }
        self.sessions.save(session_id, cart.clone());

        Ok(cart)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        session_id: &str,
        product_id: i64,
    ) -> Result<SessionCart, ServiceError> {
        let mut cart = self.sessions.load(session_id);
        if cart.items.remove(&product_id).is_none() {
            return Err(ServiceError::NotFound(format!(
                "Product {} is not in the cart",
                product_id
            )));
        }
        self.sessions.save(session_id, cart.clone());

        self.event_sender
            .send_or_log(Event::CartItemRemoved {
                session_id: session_id.to_string(),
                product_id,
            })
            .await;

        Ok(cart)
    }

    #[instrument(skip(self))]
    pub async fn clear(&self, session_id: &str) {
        self.sessions.remove(session_id);
        self.event_sender
            .send_or_log(Event::CartCleared(session_id.to_string()))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: u32, price: Decimal) -> CartItem {
        CartItem {
            quantity,
            price,
            name: "Helmet".into(),
            image_url: None,
        }
    }

    #[test]
    fn cart_totals_sum_lines() {
        let mut cart = SessionCart::default();
        cart.items.insert(1, item(2, dec!(150)));
        cart.items.insert(2, item(1, dec!(99.50)));
        assert_eq!(cart.total(), dec!(399.50));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn store_isolates_sessions() {
        let store = InMemorySessionStore::new();
        let mut cart = SessionCart::default();
        cart.items.insert(1, item(1, dec!(10)));
        store.save("alice", cart);

        assert_eq!(store.load("alice").item_count(), 1);
        assert_eq!(store.load("bob").item_count(), 0);

        store.remove("alice");
        assert_eq!(store.load("alice").item_count(), 0);
    }
}
