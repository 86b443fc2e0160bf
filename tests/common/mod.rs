use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;

use scooter_dms::{
    db::{self, DbConfig},
    entities::scooter::ScooterCategory,
    events::EventSender,
    services::{
        customers::CreateCustomerInput, fleet::CreateScooterInput, stock::CreatePartInput,
        stores::CreateStoreInput, suppliers::CreateSupplierInput, CustomerService, FleetService,
        StockService, StoreService, SupplierService,
    },
};

/// Test harness backed by an in-memory SQLite database. A single pooled
/// connection keeps every query on the same in-memory instance.
pub struct TestDb {
    pub db: Arc<DatabaseConnection>,
    pub events: EventSender,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestDb {
    pub async fn new() -> Self {
        let config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
        };
        let pool = db::establish_connection_with_config(&config)
            .await
            .expect("failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let (tx, mut rx) = mpsc::channel(64);
        let events = EventSender::new(tx);
        let event_task = tokio::spawn(async move { while rx.recv().await.is_some() {} });

        Self {
            db: Arc::new(pool),
            events,
            _event_task: event_task,
        }
    }

    pub async fn seed_store(&self, name: &str) -> i64 {
        let store = StoreService::new(self.db.clone())
            .create_store(CreateStoreInput {
                name: name.to_string(),
                address: None,
                phone: None,
            })
            .await
            .expect("failed to seed store");
        store.id
    }

    pub async fn seed_part(&self, part_number: &str, store_id: i64, stock: Decimal) -> i64 {
        let part = StockService::new(self.db.clone(), self.events.clone())
            .create_part(CreatePartInput {
                part_number: part_number.to_string(),
                name: format!("{} part", part_number),
                description: None,
                store_id,
                current_stock: stock,
                reorder_level: Decimal::ZERO,
                unit_price: Decimal::new(1000, 2),
                category: None,
                location_in_store: None,
            })
            .await
            .expect("failed to seed part");
        part.id
    }

    pub async fn seed_scooter(
        &self,
        vin: &str,
        store_id: i64,
        category: ScooterCategory,
        year: i32,
    ) -> i64 {
        let scooter = FleetService::new(self.db.clone())
            .create_scooter(CreateScooterInput {
                vin: vin.to_string(),
                license_number: None,
                make: "Sym".to_string(),
                model: "Orbit".to_string(),
                year,
                color: None,
                category,
                store_id,
                mileage: 1_000,
                purchase_date: None,
                purchase_price: None,
                notes: None,
            })
            .await
            .expect("failed to seed scooter");
        scooter.id
    }

    pub async fn seed_supplier(&self, name: &str) -> i64 {
        let supplier = SupplierService::new(self.db.clone())
            .create_supplier(CreateSupplierInput {
                name: name.to_string(),
                contact_person: None,
                phone: None,
                email: None,
                address: None,
                account_number: None,
                payment_terms: None,
                notes: None,
            })
            .await
            .expect("failed to seed supplier");
        supplier.id
    }

    pub async fn seed_customer(&self, first: &str, last: &str) -> i64 {
        let customer = CustomerService::new(self.db.clone())
            .create_customer(CreateCustomerInput {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: None,
                phone: None,
                id_number: None,
                address: None,
            })
            .await
            .expect("failed to seed customer");
        customer.id
    }
}
