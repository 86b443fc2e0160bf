use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_stores_table::Migration),
            Box::new(m20240101_000002_create_parts_table::Migration),
            Box::new(m20240101_000003_create_scooters_table::Migration),
            Box::new(m20240101_000004_create_stock_transfers_table::Migration),
            Box::new(m20240101_000005_create_suppliers_table::Migration),
            Box::new(m20240101_000006_create_purchases_table::Migration),
            Box::new(m20240101_000007_create_purchase_items_table::Migration),
            Box::new(m20240101_000008_create_job_cards_table::Migration),
            Box::new(m20240101_000009_create_job_card_items_table::Migration),
            Box::new(m20240101_000010_create_service_checklists_table::Migration),
            Box::new(m20240101_000011_create_customers_table::Migration),
            Box::new(m20240101_000012_create_rentals_table::Migration),
            Box::new(m20240101_000013_create_products_table::Migration),
            Box::new(m20240101_000014_create_staff_profiles_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_stores_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_stores_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Stores::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Stores::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Stores::Name).string().not_null())
                        .col(ColumnDef::new(Stores::Address).string().null())
                        .col(ColumnDef::new(Stores::Phone).string().null())
                        .col(
                            ColumnDef::new(Stores::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Stores::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Stores::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Stores::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Stores {
        Table,
        Id,
        Name,
        Address,
        Phone,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_parts_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_parts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Parts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Parts::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Parts::PartNumber).string().not_null())
                        .col(ColumnDef::new(Parts::Name).string().not_null())
                        .col(ColumnDef::new(Parts::Description).string().null())
                        .col(ColumnDef::new(Parts::StoreId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Parts::CurrentStock)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Parts::ReorderLevel)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Parts::UnitPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Parts::Category).string().null())
                        .col(ColumnDef::new(Parts::LocationInStore).string().null())
                        .col(ColumnDef::new(Parts::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Parts::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            // A part number identifies the same physical part across stores,
            // so uniqueness is per store, not global.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_parts_part_number_store")
                        .table(Parts::Table)
                        .col(Parts::PartNumber)
                        .col(Parts::StoreId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_parts_store_id")
                        .table(Parts::Table)
                        .col(Parts::StoreId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Parts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Parts {
        Table,
        Id,
        PartNumber,
        Name,
        Description,
        StoreId,
        CurrentStock,
        ReorderLevel,
        UnitPrice,
        Category,
        LocationInStore,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_scooters_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_scooters_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Scooters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Scooters::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Scooters::Vin)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Scooters::LicenseNumber).string().null())
                        .col(ColumnDef::new(Scooters::Make).string().not_null())
                        .col(ColumnDef::new(Scooters::Model).string().not_null())
                        .col(ColumnDef::new(Scooters::Year).integer().not_null())
                        .col(ColumnDef::new(Scooters::Color).string().null())
                        .col(ColumnDef::new(Scooters::Category).string().not_null())
                        .col(ColumnDef::new(Scooters::Status).string().not_null())
                        .col(
                            ColumnDef::new(Scooters::Mileage)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Scooters::StoreId).big_integer().not_null())
                        .col(ColumnDef::new(Scooters::PurchaseDate).date().null())
                        .col(ColumnDef::new(Scooters::PurchasePrice).decimal().null())
                        .col(ColumnDef::new(Scooters::LastMaintenance).date().null())
                        .col(ColumnDef::new(Scooters::Notes).string().null())
                        .col(ColumnDef::new(Scooters::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Scooters::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_scooters_store_id")
                        .table(Scooters::Table)
                        .col(Scooters::StoreId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_scooters_status")
                        .table(Scooters::Table)
                        .col(Scooters::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Scooters::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Scooters {
        Table,
        Id,
        Vin,
        LicenseNumber,
        Make,
        Model,
        Year,
        Color,
        Category,
        Status,
        Mileage,
        StoreId,
        PurchaseDate,
        PurchasePrice,
        LastMaintenance,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_stock_transfers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_stock_transfers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockTransfers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockTransfers::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::TransferNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::PartId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::SourceStoreId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::DestinationStoreId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockTransfers::Quantity).decimal().not_null())
                        .col(ColumnDef::new(StockTransfers::Status).string().not_null())
                        .col(
                            ColumnDef::new(StockTransfers::TransferDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockTransfers::Notes).string().null())
                        .col(ColumnDef::new(StockTransfers::CreatedBy).string().null())
                        .col(
                            ColumnDef::new(StockTransfers::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_transfers_source_store")
                        .table(StockTransfers::Table)
                        .col(StockTransfers::SourceStoreId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_transfers_destination_store")
                        .table(StockTransfers::Table)
                        .col(StockTransfers::DestinationStoreId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_transfers_status")
                        .table(StockTransfers::Table)
                        .col(StockTransfers::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockTransfers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum StockTransfers {
        Table,
        Id,
        TransferNumber,
        PartId,
        SourceStoreId,
        DestinationStoreId,
        Quantity,
        Status,
        TransferDate,
        Notes,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_suppliers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_suppliers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactPerson).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Address).string().null())
                        .col(ColumnDef::new(Suppliers::AccountNumber).string().null())
                        .col(ColumnDef::new(Suppliers::PaymentTerms).string().null())
                        .col(
                            ColumnDef::new(Suppliers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Suppliers::Notes).string().null())
                        .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Suppliers {
        Table,
        Id,
        Name,
        ContactPerson,
        Phone,
        Email,
        Address,
        AccountNumber,
        PaymentTerms,
        IsActive,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000006_create_purchases_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_purchases_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Purchases::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Purchases::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Purchases::InvoiceNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Purchases::SupplierId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Purchases::StoreId).big_integer().null())
                        .col(ColumnDef::new(Purchases::InvoiceDate).date().not_null())
                        .col(ColumnDef::new(Purchases::DueDate).date().null())
                        .col(ColumnDef::new(Purchases::Status).string().not_null())
                        .col(
                            ColumnDef::new(Purchases::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Purchases::AmountPaid)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Purchases::Notes).string().null())
                        .col(ColumnDef::new(Purchases::CreatedBy).string().null())
                        .col(ColumnDef::new(Purchases::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Purchases::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchases_supplier_id")
                        .table(Purchases::Table)
                        .col(Purchases::SupplierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchases_status")
                        .table(Purchases::Table)
                        .col(Purchases::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Purchases::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Purchases {
        Table,
        Id,
        InvoiceNumber,
        SupplierId,
        StoreId,
        InvoiceDate,
        DueDate,
        Status,
        TotalAmount,
        AmountPaid,
        Notes,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000007_create_purchase_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_purchase_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseItems::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseItems::PurchaseId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseItems::PartId).big_integer().null())
                        .col(ColumnDef::new(PurchaseItems::StoreId).big_integer().null())
                        .col(ColumnDef::new(PurchaseItems::Description).string().null())
                        .col(ColumnDef::new(PurchaseItems::Quantity).decimal().not_null())
                        .col(
                            ColumnDef::new(PurchaseItems::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseItems::LineTotal)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseItems::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_items_purchase_id")
                        .table(PurchaseItems::Table)
                        .col(PurchaseItems::PurchaseId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PurchaseItems {
        Table,
        Id,
        PurchaseId,
        PartId,
        StoreId,
        Description,
        Quantity,
        UnitPrice,
        LineTotal,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000008_create_job_cards_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_job_cards_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(JobCards::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(JobCards::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobCards::JobCardNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(JobCards::ScooterId).big_integer().not_null())
                        .col(ColumnDef::new(JobCards::StoreId).big_integer().not_null())
                        .col(ColumnDef::new(JobCards::Status).string().not_null())
                        .col(ColumnDef::new(JobCards::Description).string().null())
                        .col(ColumnDef::new(JobCards::ReportedIssue).string().null())
                        .col(ColumnDef::new(JobCards::Priority).string().null())
                        .col(
                            ColumnDef::new(JobCards::LaborHours)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(JobCards::LaborRate)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(JobCards::TotalCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(JobCards::PreviousScooterStatus)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(JobCards::ScheduledDate).date().null())
                        .col(ColumnDef::new(JobCards::ActualCompletion).timestamp().null())
                        .col(ColumnDef::new(JobCards::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(JobCards::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_cards_scooter_id")
                        .table(JobCards::Table)
                        .col(JobCards::ScooterId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_cards_store_id")
                        .table(JobCards::Table)
                        .col(JobCards::StoreId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_cards_status")
                        .table(JobCards::Table)
                        .col(JobCards::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(JobCards::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum JobCards {
        Table,
        Id,
        JobCardNumber,
        ScooterId,
        StoreId,
        Status,
        Description,
        ReportedIssue,
        Priority,
        LaborHours,
        LaborRate,
        TotalCost,
        PreviousScooterStatus,
        ScheduledDate,
        ActualCompletion,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000009_create_job_card_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_job_card_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(JobCardItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(JobCardItems::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobCardItems::JobCardId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobCardItems::PartId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JobCardItems::Quantity).decimal().not_null())
                        .col(ColumnDef::new(JobCardItems::UnitPrice).decimal().not_null())
                        .col(ColumnDef::new(JobCardItems::LineTotal).decimal().not_null())
                        .col(
                            ColumnDef::new(JobCardItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobCardItems::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_card_items_job_card_id")
                        .table(JobCardItems::Table)
                        .col(JobCardItems::JobCardId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(JobCardItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum JobCardItems {
        Table,
        Id,
        JobCardId,
        PartId,
        Quantity,
        UnitPrice,
        LineTotal,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000010_create_service_checklists_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000010_create_service_checklists_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ServiceChecklists::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceChecklists::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceChecklists::JobCardId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceChecklists::ItemName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceChecklists::IsChecked)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(ServiceChecklists::Notes).string().null())
                        .col(
                            ColumnDef::new(ServiceChecklists::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceChecklists::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_service_checklists_job_card_id")
                        .table(ServiceChecklists::Table)
                        .col(ServiceChecklists::JobCardId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ServiceChecklists::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ServiceChecklists {
        Table,
        Id,
        JobCardId,
        ItemName,
        IsChecked,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000011_create_customers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000011_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Customers::FirstName).string().not_null())
                        .col(ColumnDef::new(Customers::LastName).string().not_null())
                        .col(ColumnDef::new(Customers::Email).string().null())
                        .col(ColumnDef::new(Customers::Phone).string().null())
                        .col(ColumnDef::new(Customers::IdNumber).string().null())
                        .col(ColumnDef::new(Customers::Address).string().null())
                        .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Customers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Customers {
        Table,
        Id,
        FirstName,
        LastName,
        Email,
        Phone,
        IdNumber,
        Address,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000012_create_rentals_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000012_create_rentals_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Rentals::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Rentals::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Rentals::RentalNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Rentals::ScooterId).big_integer().not_null())
                        .col(ColumnDef::new(Rentals::CustomerId).big_integer().not_null())
                        .col(ColumnDef::new(Rentals::StartDate).timestamp().not_null())
                        .col(
                            ColumnDef::new(Rentals::ExpectedEndDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Rentals::ActualEndDate).timestamp().null())
                        .col(ColumnDef::new(Rentals::RateType).string().not_null())
                        .col(ColumnDef::new(Rentals::RateAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(Rentals::DepositAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Rentals::DepositReturned)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Rentals::Status).string().not_null())
                        .col(ColumnDef::new(Rentals::MileageStart).integer().null())
                        .col(ColumnDef::new(Rentals::MileageEnd).integer().null())
                        .col(ColumnDef::new(Rentals::Notes).string().null())
                        .col(ColumnDef::new(Rentals::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Rentals::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rentals_scooter_id")
                        .table(Rentals::Table)
                        .col(Rentals::ScooterId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rentals_status")
                        .table(Rentals::Table)
                        .col(Rentals::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Rentals::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Rentals {
        Table,
        Id,
        RentalNumber,
        ScooterId,
        CustomerId,
        StartDate,
        ExpectedEndDate,
        ActualEndDate,
        RateType,
        RateAmount,
        DepositAmount,
        DepositReturned,
        Status,
        MileageStart,
        MileageEnd,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000013_create_products_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000013_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(
                            ColumnDef::new(Products::Sku)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Products::Description).string().null())
                        .col(ColumnDef::new(Products::Price).decimal().not_null())
                        .col(ColumnDef::new(Products::SalePrice).decimal().null())
                        .col(ColumnDef::new(Products::ImageUrl).string().null())
                        .col(ColumnDef::new(Products::Category).string().null())
                        .col(ColumnDef::new(Products::Brand).string().null())
                        .col(
                            ColumnDef::new(Products::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::IsFeatured)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        Name,
        Sku,
        Description,
        Price,
        SalePrice,
        ImageUrl,
        Category,
        Brand,
        Stock,
        IsFeatured,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000014_create_staff_profiles_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000014_create_staff_profiles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StaffProfiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StaffProfiles::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StaffProfiles::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(StaffProfiles::Role).string().not_null())
                        .col(ColumnDef::new(StaffProfiles::StoreId).big_integer().null())
                        .col(ColumnDef::new(StaffProfiles::Phone).string().null())
                        .col(ColumnDef::new(StaffProfiles::Position).string().null())
                        .col(
                            ColumnDef::new(StaffProfiles::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StaffProfiles::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StaffProfiles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum StaffProfiles {
        Table,
        Id,
        Username,
        Role,
        StoreId,
        Phone,
        Position,
        CreatedAt,
        UpdatedAt,
    }
}
