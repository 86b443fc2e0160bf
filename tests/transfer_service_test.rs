mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use scooter_dms::{
    entities::{
        part::{self, Entity as PartEntity},
        stock_transfer::TransferStatus,
    },
    errors::ServiceError,
    services::{
        access::StoreScope,
        stock::UpdatePartInput,
        transfers::CreateTransferInput,
        StockService, TransferService,
    },
};

use common::TestDb;

fn transfer_input(part_id: i64, source: i64, dest: i64, qty: rust_decimal::Decimal) -> CreateTransferInput {
    CreateTransferInput {
        part_id,
        source_store_id: source,
        destination_store_id: dest,
        quantity: qty,
        notes: None,
        created_by: Some("tester".to_string()),
    }
}

#[tokio::test]
async fn create_transfer_decrements_source_immediately() {
    let harness = TestDb::new().await;
    let source = harness.seed_store("Source").await;
    let dest = harness.seed_store("Dest").await;
    let part = harness.seed_part("TRF-PART", source, dec!(10)).await;

    let service = TransferService::new(harness.db.clone(), harness.events.clone());
    let transfer = service
        .create_transfer(transfer_input(part, source, dest, dec!(4)))
        .await
        .unwrap();

    assert_eq!(transfer.status, TransferStatus::Pending);
    assert!(transfer.transfer_number.starts_with("TRF-"));

    let source_part = PartEntity::find_by_id(part)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(source_part.current_stock, dec!(6));
}

#[tokio::test]
async fn create_transfer_fails_on_insufficient_source_stock() {
    let harness = TestDb::new().await;
    let source = harness.seed_store("Source").await;
    let dest = harness.seed_store("Dest").await;
    let part = harness.seed_part("TRF-LOW", source, dec!(2)).await;

    let service = TransferService::new(harness.db.clone(), harness.events.clone());
    let err = service
        .create_transfer(transfer_input(part, source, dest, dec!(5)))
        .await
        .expect_err("insufficient source stock must fail");
    assert!(matches!(err, ServiceError::InsufficientStock(_)));

    let unchanged = PartEntity::find_by_id(part)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.current_stock, dec!(2));
}

#[tokio::test]
async fn complete_transfer_creates_destination_part_and_increments_it() {
    let harness = TestDb::new().await;
    let source = harness.seed_store("Source").await;
    let dest = harness.seed_store("Dest").await;
    let part = harness.seed_part("TRF-NEW", source, dec!(10)).await;

    let service = TransferService::new(harness.db.clone(), harness.events.clone());
    let transfer = service
        .create_transfer(transfer_input(part, source, dest, dec!(3)))
        .await
        .unwrap();

    let completed = service.complete_transfer(transfer.id).await.unwrap();
    assert_eq!(completed.status, TransferStatus::Completed);

    let dest_part = PartEntity::find()
        .filter(part::Column::StoreId.eq(dest))
        .filter(part::Column::PartNumber.eq("TRF-NEW"))
        .one(&*harness.db)
        .await
        .unwrap()
        .expect("destination part is created on completion");
    assert_eq!(dest_part.current_stock, dec!(3));

    let source_part = PartEntity::find_by_id(part)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(source_part.current_stock, dec!(7));
}

#[tokio::test]
async fn complete_transfer_twice_is_rejected_without_double_increment() {
    let harness = TestDb::new().await;
    let source = harness.seed_store("Source").await;
    let dest = harness.seed_store("Dest").await;
    let part = harness.seed_part("TRF-IDEM", source, dec!(10)).await;

    let service = TransferService::new(harness.db.clone(), harness.events.clone());
    let transfer = service
        .create_transfer(transfer_input(part, source, dest, dec!(3)))
        .await
        .unwrap();

    service.complete_transfer(transfer.id).await.unwrap();
    let err = service
        .complete_transfer(transfer.id)
        .await
        .expect_err("completing a completed transfer must fail");
    assert!(matches!(err, ServiceError::InvalidStatus(_)));

    let dest_part = PartEntity::find()
        .filter(part::Column::StoreId.eq(dest))
        .filter(part::Column::PartNumber.eq("TRF-IDEM"))
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dest_part.current_stock, dec!(3));
}

#[tokio::test]
async fn cancel_transfer_does_not_restore_source_stock() {
    let harness = TestDb::new().await;
    let source = harness.seed_store("Source").await;
    let dest = harness.seed_store("Dest").await;
    let part = harness.seed_part("TRF-CXL", source, dec!(10)).await;

    let service = TransferService::new(harness.db.clone(), harness.events.clone());
    let transfer = service
        .create_transfer(transfer_input(part, source, dest, dec!(4)))
        .await
        .unwrap();

    let cancelled = service.cancel_transfer(transfer.id).await.unwrap();
    assert_eq!(cancelled.status, TransferStatus::Cancelled);

    // Stock stays decremented; the workflow requires a manual adjustment.
    let source_part = PartEntity::find_by_id(part)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(source_part.current_stock, dec!(6));
}

#[tokio::test]
async fn transfers_are_visible_from_both_ends() {
    let harness = TestDb::new().await;
    let source = harness.seed_store("Source").await;
    let dest = harness.seed_store("Dest").await;
    let other = harness.seed_store("Elsewhere").await;
    let part = harness.seed_part("TRF-VIS", source, dec!(10)).await;

    let service = TransferService::new(harness.db.clone(), harness.events.clone());
    let transfer = service
        .create_transfer(transfer_input(part, source, dest, dec!(1)))
        .await
        .unwrap();

    assert!(service
        .get_transfer(transfer.id, StoreScope::Store(source))
        .await
        .is_ok());
    assert!(service
        .get_transfer(transfer.id, StoreScope::Store(dest))
        .await
        .is_ok());
    assert!(matches!(
        service
            .get_transfer(transfer.id, StoreScope::Store(other))
            .await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn complete_transfer_refreshes_existing_destination_part_attributes() {
    let harness = TestDb::new().await;
    let source = harness.seed_store("Source").await;
    let dest = harness.seed_store("Dest").await;
    let source_part = harness.seed_part("TRF-SYNC", source, dec!(10)).await;
    let dest_part = harness.seed_part("TRF-SYNC", dest, dec!(1)).await;

    // Diverge the source part's catalog attributes so the refresh is visible.
    StockService::new(harness.db.clone(), harness.events.clone())
        .update_part(
            source_part,
            StoreScope::All,
            UpdatePartInput {
                name: Some("Drive belt, reinforced".to_string()),
                unit_price: Some(dec!(24.50)),
                category: Some("transmission".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let service = TransferService::new(harness.db.clone(), harness.events.clone());
    let transfer = service
        .create_transfer(transfer_input(source_part, source, dest, dec!(4)))
        .await
        .unwrap();
    service.complete_transfer(transfer.id).await.unwrap();

    let refreshed = PartEntity::find_by_id(dest_part)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.name, "Drive belt, reinforced");
    assert_eq!(refreshed.unit_price, dec!(24.50));
    assert_eq!(refreshed.category.as_deref(), Some("transmission"));
    assert_eq!(refreshed.current_stock, dec!(5));
}
