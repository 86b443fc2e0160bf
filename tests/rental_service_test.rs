mod common;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use scooter_dms::{
    entities::{
        rental::RentalStatus,
        scooter::{Entity as ScooterEntity, ScooterCategory, ScooterStatus},
    },
    errors::ServiceError,
    services::{
        rentals::{CreateRentalInput, ReturnRentalInput},
        RentalService,
    },
};

use common::TestDb;

fn rental_input(scooter_id: i64, customer_id: i64, days: i64) -> CreateRentalInput {
    let start = Utc::now();
    CreateRentalInput {
        scooter_id,
        customer_id,
        start_date: start,
        expected_end_date: start + Duration::days(days),
        rate_type: None,
        rate_amount: None,
        deposit_amount: dec!(100),
        notes: None,
    }
}

#[tokio::test]
async fn create_rental_uses_the_category_rate_and_rents_the_scooter() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Rental hub").await;
    let scooter = harness
        .seed_scooter("RNT-VIN-1", store, ScooterCategory::A, 2023)
        .await;
    let customer = harness.seed_customer("Mia", "Papadopoulos").await;

    let service = RentalService::new(harness.db.clone(), harness.events.clone());
    let rental = service
        .create_rental(rental_input(scooter, customer, 5))
        .await
        .unwrap();

    assert!(rental.rental_number.starts_with('R'));
    assert_eq!(rental.status, RentalStatus::Active);
    // Category A at 5 days lands in the 2-10 day bracket.
    assert_eq!(rental.rate_amount, dec!(300));
    assert_eq!(rental.mileage_start, Some(1_000));

    let scooter_row = ScooterEntity::find_by_id(scooter)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scooter_row.status, ScooterStatus::Rented);
}

#[tokio::test]
async fn create_rental_rejects_unavailable_scooters() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Rental hub").await;
    let scooter = harness
        .seed_scooter("RNT-VIN-2", store, ScooterCategory::B, 2023)
        .await;
    let customer = harness.seed_customer("Nikos", "Ioannou").await;

    let service = RentalService::new(harness.db.clone(), harness.events.clone());
    service
        .create_rental(rental_input(scooter, customer, 3))
        .await
        .unwrap();

    let err = service
        .create_rental(rental_input(scooter, customer, 3))
        .await
        .expect_err("an already rented scooter cannot be rented again");
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn return_rental_completes_and_updates_mileage() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Rental hub").await;
    let scooter = harness
        .seed_scooter("RNT-VIN-3", store, ScooterCategory::C, 2023)
        .await;
    let customer = harness.seed_customer("Elena", "Vasquez").await;

    let service = RentalService::new(harness.db.clone(), harness.events.clone());
    let rental = service
        .create_rental(rental_input(scooter, customer, 2))
        .await
        .unwrap();

    let returned = service
        .return_rental(
            rental.id,
            ReturnRentalInput {
                mileage_end: Some(1_250),
                deposit_returned: true,
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(returned.status, RentalStatus::Completed);
    assert!(returned.actual_end_date.is_some());
    assert!(returned.deposit_returned);

    let scooter_row = ScooterEntity::find_by_id(scooter)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scooter_row.status, ScooterStatus::Available);
    assert_eq!(scooter_row.mileage, 1_250);
}

#[tokio::test]
async fn return_rental_rejects_mileage_rollback() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Rental hub").await;
    let scooter = harness
        .seed_scooter("RNT-VIN-4", store, ScooterCategory::D, 2023)
        .await;
    let customer = harness.seed_customer("Theo", "Marks").await;

    let service = RentalService::new(harness.db.clone(), harness.events.clone());
    let rental = service
        .create_rental(rental_input(scooter, customer, 2))
        .await
        .unwrap();

    let err = service
        .return_rental(
            rental.id,
            ReturnRentalInput {
                mileage_end: Some(500),
                deposit_returned: false,
                notes: None,
            },
        )
        .await
        .expect_err("end mileage below start mileage is invalid");
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn cancel_rental_frees_the_scooter() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Rental hub").await;
    let scooter = harness
        .seed_scooter("RNT-VIN-5", store, ScooterCategory::A, 2023)
        .await;
    let customer = harness.seed_customer("Iris", "Chen").await;

    let service = RentalService::new(harness.db.clone(), harness.events.clone());
    let rental = service
        .create_rental(rental_input(scooter, customer, 4))
        .await
        .unwrap();

    let cancelled = service.cancel_rental(rental.id).await.unwrap();
    assert_eq!(cancelled.status, RentalStatus::Cancelled);

    let scooter_row = ScooterEntity::find_by_id(scooter)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scooter_row.status, ScooterStatus::Available);
}

#[tokio::test]
async fn rental_numbers_increment_from_the_last_issued() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Rental hub").await;
    let first_scooter = harness
        .seed_scooter("RNT-VIN-6", store, ScooterCategory::A, 2023)
        .await;
    let second_scooter = harness
        .seed_scooter("RNT-VIN-7", store, ScooterCategory::A, 2023)
        .await;
    let customer = harness.seed_customer("Ada", "Byrne").await;

    let service = RentalService::new(harness.db.clone(), harness.events.clone());
    let first = service
        .create_rental(rental_input(first_scooter, customer, 1))
        .await
        .unwrap();
    let second = service
        .create_rental(rental_input(second_scooter, customer, 1))
        .await
        .unwrap();

    assert_eq!(first.rental_number, "R000001");
    assert_eq!(second.rental_number, "R000002");
}
