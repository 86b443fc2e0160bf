mod common;

use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use scooter_dms::{
    entities::part::Entity as PartEntity,
    errors::ServiceError,
    services::{access::StoreScope, stock, StockService},
};

use common::TestDb;

#[tokio::test]
async fn adjust_stock_applies_delta_and_floors_nothing() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let part = harness.seed_part("BRK-001", store, dec!(10)).await;

    let updated = stock::adjust_stock(&*harness.db, part, dec!(-4))
        .await
        .expect("decrement within stock should succeed");
    assert_eq!(updated.current_stock, dec!(6));

    let updated = stock::adjust_stock(&*harness.db, part, dec!(2))
        .await
        .expect("increment should succeed");
    assert_eq!(updated.current_stock, dec!(8));
}

#[tokio::test]
async fn adjust_stock_rejects_negative_result_without_mutation() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let part = harness.seed_part("BRK-002", store, dec!(3)).await;

    let err = stock::adjust_stock(&*harness.db, part, dec!(-5))
        .await
        .expect_err("decrement past zero must fail");
    assert!(matches!(err, ServiceError::InsufficientStock(_)));

    let unchanged = PartEntity::find_by_id(part)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.current_stock, dec!(3));
}

#[tokio::test]
async fn adjust_stock_clamped_floors_at_zero() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let part = harness.seed_part("BRK-003", store, dec!(3)).await;

    let updated = stock::adjust_stock_clamped(&*harness.db, part, dec!(-10))
        .await
        .expect("clamped decrement never fails");
    assert_eq!(updated.current_stock, dec!(0));
}

#[tokio::test]
async fn store_scoped_staff_see_only_their_parts() {
    let harness = TestDb::new().await;
    let store_a = harness.seed_store("North").await;
    let store_b = harness.seed_store("South").await;
    harness.seed_part("OIL-001", store_a, dec!(5)).await;
    harness.seed_part("OIL-002", store_b, dec!(5)).await;

    let service = StockService::new(harness.db.clone(), harness.events.clone());

    let (scoped, total) = service
        .list_parts(StoreScope::Store(store_a), None, 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert!(scoped.iter().all(|p| p.store_id == store_a));

    let (all, total_all) = service
        .list_parts(StoreScope::All, None, 1, 20)
        .await
        .unwrap();
    assert_eq!(total_all, 2);
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn get_part_outside_scope_is_not_found() {
    let harness = TestDb::new().await;
    let store_a = harness.seed_store("North").await;
    let store_b = harness.seed_store("South").await;
    let part = harness.seed_part("OIL-003", store_a, dec!(5)).await;

    let service = StockService::new(harness.db.clone(), harness.events.clone());
    let err = service
        .get_part(part, StoreScope::Store(store_b))
        .await
        .expect_err("part in another store must be invisible");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_part_number_in_same_store_is_rejected() {
    let harness = TestDb::new().await;
    let store_a = harness.seed_store("North").await;
    let store_b = harness.seed_store("South").await;
    harness.seed_part("FLT-001", store_a, dec!(1)).await;

    let service = StockService::new(harness.db.clone(), harness.events.clone());
    let dup = service
        .create_part(scooter_dms::services::stock::CreatePartInput {
            part_number: "FLT-001".to_string(),
            name: "Filter".to_string(),
            description: None,
            store_id: store_a,
            current_stock: dec!(0),
            reorder_level: dec!(0),
            unit_price: dec!(5),
            category: None,
            location_in_store: None,
        })
        .await;
    assert!(dup.is_err());

    // Same part number is fine in a different store.
    harness.seed_part("FLT-001", store_b, dec!(1)).await;
}

#[tokio::test]
async fn low_stock_includes_parts_at_or_below_reorder_level() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let service = StockService::new(harness.db.clone(), harness.events.clone());

    service
        .create_part(scooter_dms::services::stock::CreatePartInput {
            part_number: "LOW-001".to_string(),
            name: "Spark plug".to_string(),
            description: None,
            store_id: store,
            current_stock: dec!(2),
            reorder_level: dec!(5),
            unit_price: dec!(3),
            category: None,
            location_in_store: None,
        })
        .await
        .unwrap();
    service
        .create_part(scooter_dms::services::stock::CreatePartInput {
            part_number: "OK-001".to_string(),
            name: "Mirror".to_string(),
            description: None,
            store_id: store,
            current_stock: dec!(10),
            reorder_level: dec!(2),
            unit_price: dec!(8),
            category: None,
            location_in_store: None,
        })
        .await
        .unwrap();

    let low = service.low_stock_parts(StoreScope::All).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].part_number, "LOW-001");
}
