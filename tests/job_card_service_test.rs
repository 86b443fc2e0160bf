mod common;

use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use scooter_dms::{
    entities::{
        job_card::{Entity as JobCardEntity, JobCardStatus},
        part::Entity as PartEntity,
        scooter::{Entity as ScooterEntity, ScooterCategory, ScooterStatus},
    },
    errors::ServiceError,
    services::{
        access::StoreScope,
        job_cards::{CreateJobCardInput, JobCardItemInput},
        JobCardService,
    },
};

use common::TestDb;

fn card_input(scooter_id: i64, store_id: i64, items: Vec<JobCardItemInput>) -> CreateJobCardInput {
    CreateJobCardInput {
        scooter_id,
        store_id: Some(store_id),
        status: None,
        description: Some("Routine service".to_string()),
        reported_issue: None,
        priority: None,
        labor_hours: dec!(2),
        labor_rate: dec!(50),
        scheduled_date: None,
        items,
    }
}

async fn scooter_status(harness: &TestDb, scooter_id: i64) -> ScooterStatus {
    ScooterEntity::find_by_id(scooter_id)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap()
        .status
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
async fn create_job_card_consumes_stock_and_seeds_checklist() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Workshop").await;
    let scooter = harness
        .seed_scooter("JC-VIN-1", store, ScooterCategory::A, 2022)
        .await;
    let part = harness.seed_part("JC-PART-1", store, dec!(10)).await;

    let service = JobCardService::new(harness.db.clone(), harness.events.clone());
    let detail = service
        .create_job_card(card_input(
            scooter,
            store,
            vec![JobCardItemInput {
                part_id: part,
                quantity: dec!(2),
                unit_price: None,
            }],
        ))
        .await
        .unwrap();

    assert!(detail.job_card.job_card_number.starts_with("JC"));
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.checklist.len(), 6);
    // labor 2h * 50 + parts 2 * 10.00
    assert_eq!(detail.job_card.total_cost, dec!(120));

    assert_eq!(part_stock(&harness, part).await, dec!(8));
    assert_eq!(
        scooter_status(&harness, scooter).await,
        ScooterStatus::Maintenance
    );
}

#[tokio::test]
async fn create_job_card_rolls_back_fully_on_insufficient_stock() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Workshop").await;
    let scooter = harness
        .seed_scooter("JC-VIN-2", store, ScooterCategory::A, 2022)
        .await;
    let part_ok = harness.seed_part("JC-OK", store, dec!(10)).await;
    let part_short = harness.seed_part("JC-SHORT", store, dec!(1)).await;

    let service = JobCardService::new(harness.db.clone(), harness.events.clone());
    let err = service
        .create_job_card(card_input(
            scooter,
            store,
            vec![
                JobCardItemInput {
                    part_id: part_ok,
                    quantity: dec!(2),
                    unit_price: None,
                },
                JobCardItemInput {
                    part_id: part_short,
                    quantity: dec!(5),
                    unit_price: None,
                },
            ],
        ))
        .await
        .expect_err("insufficient stock on any line aborts the whole card");
    assert!(matches!(err, ServiceError::InsufficientStock(_)));

    // Nothing is retained: no card, no stock movement, scooter untouched.
    assert_eq!(part_stock(&harness, part_ok).await, dec!(10));
    assert_eq!(part_stock(&harness, part_short).await, dec!(1));
    assert_eq!(
        scooter_status(&harness, scooter).await,
        ScooterStatus::Available
    );
    let cards = JobCardEntity::find().all(&*harness.db).await.unwrap();
    assert!(cards.is_empty());
}

#[tokio::test]
async fn completing_a_job_card_returns_scooter_to_service() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Workshop").await;
    let scooter = harness
        .seed_scooter("JC-VIN-3", store, ScooterCategory::B, 2023)
        .await;

    let service = JobCardService::new(harness.db.clone(), harness.events.clone());
    let detail = service
        .create_job_card(card_input(scooter, store, vec![]))
        .await
        .unwrap();

    let completed = service
        .update_status(detail.job_card.id, JobCardStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, JobCardStatus::Completed);
    assert!(completed.actual_completion.is_some());

    let scooter_row = ScooterEntity::find_by_id(scooter)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scooter_row.status, ScooterStatus::Available);
    assert!(scooter_row.last_maintenance.is_some());
}

#[tokio::test]
async fn completed_job_cards_reject_further_status_changes() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Workshop").await;
    let scooter = harness
        .seed_scooter("JC-VIN-4", store, ScooterCategory::B, 2023)
        .await;

    let service = JobCardService::new(harness.db.clone(), harness.events.clone());
    let detail = service
        .create_job_card(card_input(scooter, store, vec![]))
        .await
        .unwrap();
    service
        .update_status(detail.job_card.id, JobCardStatus::Completed)
        .await
        .unwrap();

    let err = service
        .update_status(detail.job_card.id, JobCardStatus::InProgress)
        .await
        .expect_err("terminal status is final");
    assert!(matches!(err, ServiceError::InvalidStatus(_)));
}

#[tokio::test]
async fn deleting_a_job_card_returns_parts_and_frees_the_scooter() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Workshop").await;
    let scooter = harness
        .seed_scooter("JC-VIN-5", store, ScooterCategory::C, 2022)
        .await;
    let part = harness.seed_part("JC-RET", store, dec!(10)).await;

    let service = JobCardService::new(harness.db.clone(), harness.events.clone());
    let detail = service
        .create_job_card(card_input(
            scooter,
            store,
            vec![JobCardItemInput {
                part_id: part,
                quantity: dec!(3),
                unit_price: None,
            }],
        ))
        .await
        .unwrap();
    assert_eq!(part_stock(&harness, part).await, dec!(7));

    service.delete_job_card(detail.job_card.id).await.unwrap();

    assert_eq!(part_stock(&harness, part).await, dec!(10));
    assert_eq!(
        scooter_status(&harness, scooter).await,
        ScooterStatus::Available
    );
}

#[tokio::test]
async fn deleting_a_job_card_presumes_old_scooters_retired() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Workshop").await;
    // Model year 2010 falls below the 2015 retirement threshold.
    let scooter = harness
        .seed_scooter("JC-VIN-6", store, ScooterCategory::A, 2010)
        .await;

    let service = JobCardService::new(harness.db.clone(), harness.events.clone());
    let detail = service
        .create_job_card(card_input(scooter, store, vec![]))
        .await
        .unwrap();

    service.delete_job_card(detail.job_card.id).await.unwrap();

    assert_eq!(
        scooter_status(&harness, scooter).await,
        ScooterStatus::Retired
    );
}

#[tokio::test]
async fn add_and_remove_parts_keep_stock_and_totals_consistent() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Workshop").await;
    let scooter = harness
        .seed_scooter("JC-VIN-7", store, ScooterCategory::D, 2024)
        .await;
    let part = harness.seed_part("JC-ADD", store, dec!(5)).await;

    let service = JobCardService::new(harness.db.clone(), harness.events.clone());
    let detail = service
        .create_job_card(card_input(scooter, store, vec![]))
        .await
        .unwrap();

    let item = service
        .add_part(detail.job_card.id, part, dec!(2), Some(dec!(15)))
        .await
        .unwrap();
    assert_eq!(item.line_total, dec!(30));
    assert_eq!(part_stock(&harness, part).await, dec!(3));

    let card = JobCardEntity::find_by_id(detail.job_card.id)
        .one(&*harness.db)
        .await
        .unwrap()
        .unwrap();
    // labor 2h * 50 + the added line
    assert_eq!(card.total_cost, dec!(130));

    service.remove_part(detail.job_card.id, item.id).await.unwrap();
    assert_eq!(part_stock(&harness, part).await, dec!(5));
}

#[tokio::test]
async fn job_card_listing_respects_store_scope() {
    let harness = TestDb::new().await;
    let store_a = harness.seed_store("North").await;
    let store_b = harness.seed_store("South").await;
    let scooter_a = harness
        .seed_scooter("JC-VIN-8", store_a, ScooterCategory::A, 2022)
        .await;
    let scooter_b = harness
        .seed_scooter("JC-VIN-9", store_b, ScooterCategory::A, 2022)
        .await;

    let service = JobCardService::new(harness.db.clone(), harness.events.clone());
    service
        .create_job_card(card_input(scooter_a, store_a, vec![]))
        .await
        .unwrap();
    service
        .create_job_card(card_input(scooter_b, store_b, vec![]))
        .await
        .unwrap();

    let (scoped, total) = service
        .list_job_cards(StoreScope::Store(store_a), None, 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert!(scoped.iter().all(|c| c.store_id == store_a));

    let (_, total_all) = service
        .list_job_cards(StoreScope::All, None, 1, 20)
        .await
        .unwrap();
    assert_eq!(total_all, 2);
}

#[tokio::test]
async fn job_card_store_falls_back_to_the_scooters_store() {
    let harness = TestDb::new().await;
    let store = harness.seed_store("Workshop").await;
    let scooter = harness
        .seed_scooter("VIN-FALLBACK", store, ScooterCategory::A, 2023)
        .await;
    let part = harness.seed_part("JC-FB", store, dec!(4)).await;

    let service = JobCardService::new(harness.db.clone(), harness.events.clone());
    let mut input = card_input(
        scooter,
        store,
        vec![JobCardItemInput {
            part_id: part,
            quantity: dec!(1),
            unit_price: None,
        }],
    );
    input.store_id = None;

    let detail = service.create_job_card(input).await.unwrap();
    assert_eq!(detail.job_card.store_id, store);

    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["job_card"]["store_id"], store);
    assert_eq!(json["checklist"].as_array().unwrap().len(), 6);
}
