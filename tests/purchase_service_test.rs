mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use scooter_dms::{
    entities::{part::Entity as PartEntity, purchase::PurchaseStatus},
    errors::ServiceError,
    services::{
        purchases::{CreatePurchaseInput, PurchaseItemInput, UpdatePurchaseInput},
        PurchaseService,
    },
};

use common::TestDb;

fn invoice_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date")
}

async fn part_stock(harness: &TestDb, part_id: i64) -> rust_decimal::Decimal {
    PartEntity::find_by_id(part_id)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap()
        .current_stock
}

#[tokio::test]
async fn create_purchase_totals_lines_and_increments_stock() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let supplier = harness.seed_supplier("Distributor").await;
    let part_x = harness.seed_part("PUR-X", store, dec!(0)).await;
    let part_y = harness.seed_part("PUR-Y", store, dec!(1)).await;

    let service = PurchaseService::new(harness.db.clone(), harness.events.clone());
    let result = service
        .create_purchase(CreatePurchaseInput {
            invoice_number: "INV-1001".to_string(),
            supplier_id: supplier,
            store_id: Some(store),
            invoice_date: invoice_date(),
            due_date: None,
            notes: None,
            created_by: None,
            items: vec![
                PurchaseItemInput {
                    id: None,
                    part_id: Some(part_x),
                    store_id: None,
                    description: None,
                    quantity: dec!(5),
                    unit_price: dec!(10),
                },
                PurchaseItemInput {
                    id: None,
                    part_id: Some(part_y),
                    store_id: None,
                    description: None,
                    quantity: dec!(2),
                    unit_price: dec!(20),
                },
            ],
        })
        .await
        .unwrap();

    assert_eq!(result.purchase.total_amount, dec!(90));
    assert_eq!(result.items.len(), 2);
    assert_eq!(part_stock(&harness, part_x).await, dec!(5));
    assert_eq!(part_stock(&harness, part_y).await, dec!(3));
}

#[tokio::test]
async fn create_purchase_allows_free_text_lines_without_stock_effect() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let supplier = harness.seed_supplier("Distributor").await;

    let service = PurchaseService::new(harness.db.clone(), harness.events.clone());
    let result = service
        .create_purchase(CreatePurchaseInput {
            invoice_number: "INV-1002".to_string(),
            supplier_id: supplier,
            store_id: Some(store),
            invoice_date: invoice_date(),
            due_date: None,
            notes: None,
            created_by: None,
            items: vec![PurchaseItemInput {
                id: None,
                part_id: None,
                store_id: None,
                description: Some("Workshop consumables".to_string()),
                quantity: dec!(1),
                unit_price: dec!(45.50),
            }],
        })
        .await
        .unwrap();

    assert_eq!(result.purchase.total_amount, dec!(45.50));
}

#[tokio::test]
async fn create_purchase_requires_description_for_partless_lines() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let supplier = harness.seed_supplier("Distributor").await;

    let service = PurchaseService::new(harness.db.clone(), harness.events.clone());
    let err = service
        .create_purchase(CreatePurchaseInput {
            invoice_number: "INV-1003".to_string(),
            supplier_id: supplier,
            store_id: Some(store),
            invoice_date: invoice_date(),
            due_date: None,
            notes: None,
            created_by: None,
            items: vec![PurchaseItemInput {
                id: None,
                part_id: None,
                store_id: None,
                description: None,
                quantity: dec!(1),
                unit_price: dec!(5),
            }],
        })
        .await
        .expect_err("a line without part or description is invalid");
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn update_purchase_applies_quantity_diffs_and_removals() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let supplier = harness.seed_supplier("Distributor").await;
    let part_x = harness.seed_part("UPD-X", store, dec!(0)).await;
    let part_y = harness.seed_part("UPD-Y", store, dec!(0)).await;

    let service = PurchaseService::new(harness.db.clone(), harness.events.clone());
    let created = service
        .create_purchase(CreatePurchaseInput {
            invoice_number: "INV-2001".to_string(),
            supplier_id: supplier,
            store_id: Some(store),
            invoice_date: invoice_date(),
            due_date: None,
            notes: None,
            created_by: None,
            items: vec![
                PurchaseItemInput {
                    id: None,
                    part_id: Some(part_x),
                    store_id: None,
                    description: None,
                    quantity: dec!(5),
                    unit_price: dec!(10),
                },
                PurchaseItemInput {
                    id: None,
                    part_id: Some(part_y),
                    store_id: None,
                    description: None,
                    quantity: dec!(4),
                    unit_price: dec!(5),
                },
            ],
        })
        .await
        .unwrap();

    let x_item = created
        .items
        .iter()
        .find(|i| i.part_id == Some(part_x))
        .unwrap();

    // Bump X from 5 to 8 and drop the Y line entirely.
    let updated = service
        .update_purchase(
            created.purchase.id,
            UpdatePurchaseInput {
                due_date: None,
                notes: None,
                items: vec![PurchaseItemInput {
                    id: Some(x_item.id),
                    part_id: Some(part_x),
                    store_id: None,
                    description: None,
                    quantity: dec!(8),
                    unit_price: dec!(10),
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.purchase.total_amount, dec!(80));
    assert_eq!(updated.items.len(), 1);
    assert_eq!(part_stock(&harness, part_x).await, dec!(8));
    assert_eq!(part_stock(&harness, part_y).await, dec!(0));
}

#[tokio::test]
async fn delete_purchase_reverses_stock_floored_at_zero() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let supplier = harness.seed_supplier("Distributor").await;
    let part = harness.seed_part("DEL-X", store, dec!(0)).await;

    let service = PurchaseService::new(harness.db.clone(), harness.events.clone());
    let created = service
        .create_purchase(CreatePurchaseInput {
            invoice_number: "INV-3001".to_string(),
            supplier_id: supplier,
            store_id: Some(store),
            invoice_date: invoice_date(),
            due_date: None,
            notes: None,
            created_by: None,
            items: vec![PurchaseItemInput {
                id: None,
                part_id: Some(part),
                store_id: None,
                description: None,
                quantity: dec!(6),
                unit_price: dec!(2),
            }],
        })
        .await
        .unwrap();

    // Some of the received stock has since been consumed.
    scooter_dms::services::stock::adjust_stock(&*harness.db, part, dec!(-4))
        .await
        .unwrap();

    service.delete_purchase(created.purchase.id).await.unwrap();

    // Reversal of 6 against a stock of 2 floors at zero instead of failing.
    assert_eq!(part_stock(&harness, part).await, dec!(0));
}

#[tokio::test]
async fn record_payment_tracks_partial_and_paid_status() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let supplier = harness.seed_supplier("Distributor").await;
    let part = harness.seed_part("PAY-X", store, dec!(0)).await;

    let service = PurchaseService::new(harness.db.clone(), harness.events.clone());
    let created = service
        .create_purchase(CreatePurchaseInput {
            invoice_number: "INV-4001".to_string(),
            supplier_id: supplier,
            store_id: Some(store),
            invoice_date: invoice_date(),
            due_date: None,
            notes: None,
            created_by: None,
            items: vec![PurchaseItemInput {
                id: None,
                part_id: Some(part),
                store_id: None,
                description: None,
                quantity: dec!(10),
                unit_price: dec!(10),
            }],
        })
        .await
        .unwrap();

    let partial = service
        .record_payment(created.purchase.id, dec!(40))
        .await
        .unwrap();
    assert_eq!(partial.status, PurchaseStatus::Partial);
    assert_eq!(partial.amount_paid, dec!(40));

    let paid = service
        .record_payment(created.purchase.id, dec!(60))
        .await
        .unwrap();
    assert_eq!(paid.status, PurchaseStatus::Paid);
    assert_eq!(paid.amount_paid, dec!(100));
}

#[tokio::test]
async fn storeless_part_line_counts_toward_total_but_leaves_stock_alone() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let supplier = harness.seed_supplier("Distributor").await;
    let part = harness.seed_part("NOSTORE-X", store, dec!(10)).await;

    let service = PurchaseService::new(harness.db.clone(), harness.events.clone());
    // Neither the header nor the line names a store, so the line's store
    // never resolves and its quantity must not be received anywhere.
    let result = service
        .create_purchase(CreatePurchaseInput {
            invoice_number: "INV-5001".to_string(),
            supplier_id: supplier,
            store_id: None,
            invoice_date: invoice_date(),
            due_date: None,
            notes: None,
            created_by: None,
            items: vec![PurchaseItemInput {
                id: None,
                part_id: Some(part),
                store_id: None,
                description: None,
                quantity: dec!(5),
                unit_price: dec!(10),
            }],
        })
        .await
        .unwrap();

    assert_eq!(result.purchase.total_amount, dec!(50));
    assert_eq!(result.items[0].store_id, None);
    assert_eq!(part_stock(&harness, part).await, dec!(10));

    // Deleting the purchase must not reverse stock it never received.
    service.delete_purchase(result.purchase.id).await.unwrap();
    assert_eq!(part_stock(&harness, part).await, dec!(10));
}

#[tokio::test]
async fn purchase_detail_serializes_for_api_responses() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Main").await;
    let supplier = harness.seed_supplier("Distributor").await;
    let part = harness.seed_part("SER-X", store, dec!(0)).await;

    let service = PurchaseService::new(harness.db.clone(), harness.events.clone());
    let result = service
        .create_purchase(CreatePurchaseInput {
            invoice_number: "INV-6001".to_string(),
            supplier_id: supplier,
            store_id: Some(store),
            invoice_date: invoice_date(),
            due_date: None,
            notes: None,
            created_by: None,
            items: vec![PurchaseItemInput {
                id: None,
                part_id: Some(part),
                store_id: None,
                description: None,
                quantity: dec!(2),
                unit_price: dec!(15),
            }],
        })
        .await
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["purchase"]["invoice_number"], "INV-6001");
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
}
