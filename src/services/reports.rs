use sea_orm::{
    sea_query::Query, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use crate::{
    entities::{
        job_card::{self, Entity as JobCardEntity},
        part::{self, Entity as PartEntity},
        purchase::{self, Entity as PurchaseEntity},
        purchase_item::{self, Entity as PurchaseItemEntity},
        scooter::{self, Entity as ScooterEntity},
        stock_transfer::{self, Entity as TransferEntity},
        supplier::Entity as SupplierEntity,
    },
    errors::ServiceError,
    services::access::{ScopedQuery, StoreScope},
};

/// One export column: a dotted attribute path into a row's object graph and
/// the header it is rendered under.
#[derive(Debug, Clone)]
pub struct ReportColumn {
    pub path: &'static str,
    pub header: &'static str,
}

impl ReportColumn {
    pub const fn new(path: &'static str, header: &'static str) -> Self {
        Self { path, header }
    }
}

/// Walks a dotted path ("scooter.vin") through a JSON object graph. Any
/// missing link or null along the way yields an empty string rather than an
/// error, so a sparse row never breaks an export.
pub fn resolve_path(root: &Value, path: &str) -> String {
    let mut current = root;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    match current {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders rows into an export document. The file format is the
/// implementation's concern; callers only see bytes and a content type.
pub trait ReportWriter: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn file_extension(&self) -> &'static str;
    fn write(&self, columns: &[ReportColumn], rows: &[Value]) -> Vec<u8>;
}

/// CSV writer with RFC 4180 quoting.
#[derive(Default)]
pub struct CsvReportWriter;

impl CsvReportWriter {
    fn escape(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}

impl ReportWriter for CsvReportWriter {
    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn write(&self, columns: &[ReportColumn], rows: &[Value]) -> Vec<u8> {
        let mut out = String::new();
        let header: Vec<String> = columns.iter().map(|c| Self::escape(c.header)).collect();
        out.push_str(&header.join(","));
        out.push('\n');
        for row in rows {
            let fields: Vec<String> = columns
                .iter()
                .map(|c| Self::escape(&resolve_path(row, c.path)))
                .collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out.into_bytes()
    }
}

/// A generated export file.
pub struct ReportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

const PART_COLUMNS: &[ReportColumn] = &[
    ReportColumn::new("part_number", "Part Number"),
    ReportColumn::new("name", "Name"),
    ReportColumn::new("category", "Category"),
    ReportColumn::new("current_stock", "Current Stock"),
    ReportColumn::new("reorder_level", "Reorder Level"),
    ReportColumn::new("unit_price", "Unit Price"),
    ReportColumn::new("location_in_store", "Location"),
];

const SCOOTER_COLUMNS: &[ReportColumn] = &[
    ReportColumn::new("vin", "VIN"),
    ReportColumn::new("make", "Make"),
    ReportColumn::new("model", "Model"),
    ReportColumn::new("year", "Year"),
    ReportColumn::new("category", "Category"),
    ReportColumn::new("status", "Status"),
    ReportColumn::new("mileage", "Mileage"),
    ReportColumn::new("last_maintenance", "Last Maintenance"),
];

const TRANSFER_COLUMNS: &[ReportColumn] = &[
    ReportColumn::new("transfer_number", "Transfer Number"),
    ReportColumn::new("part.part_number", "Part Number"),
    ReportColumn::new("part.name", "Part Name"),
    ReportColumn::new("quantity", "Quantity"),
    ReportColumn::new("status", "Status"),
    ReportColumn::new("transfer_date", "Transfer Date"),
    ReportColumn::new("created_by", "Created By"),
];

const PURCHASE_COLUMNS: &[ReportColumn] = &[
    ReportColumn::new("invoice_number", "Invoice Number"),
    ReportColumn::new("supplier.name", "Supplier"),
    ReportColumn::new("invoice_date", "Invoice Date"),
    ReportColumn::new("status", "Status"),
    ReportColumn::new("total_amount", "Total"),
    ReportColumn::new("amount_paid", "Paid"),
];

const JOB_CARD_COLUMNS: &[ReportColumn] = &[
    ReportColumn::new("job_card_number", "Job Card"),
    ReportColumn::new("scooter.vin", "Scooter VIN"),
    ReportColumn::new("scooter.make", "Make"),
    ReportColumn::new("scooter.model", "Model"),
    ReportColumn::new("status", "Status"),
    ReportColumn::new("labor_hours", "Labor Hours"),
    ReportColumn::new("total_cost", "Total Cost"),
];

/// Builds export files for the main workshop listings.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
    writer: Arc<dyn ReportWriter>,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>, writer: Arc<dyn ReportWriter>) -> Self {
        Self { db, writer }
    }

    fn file(&self, stem: &str, columns: &[ReportColumn], rows: &[Value]) -> ReportFile {
        ReportFile {
            filename: format!("{}.{}", stem, self.writer.file_extension()),
            content_type: self.writer.content_type(),
            bytes: self.writer.write(columns, rows),
        }
    }

    #[instrument(skip(self))]
    pub async fn export_parts(&self, scope: StoreScope) -> Result<ReportFile, ServiceError> {
        let rows: Vec<Value> = PartEntity::find()
            .scoped_to(part::Column::StoreId, scope)
            .order_by_asc(part::Column::PartNumber)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|m| serde_json::to_value(m).unwrap_or(Value::Null))
            .collect();
        Ok(self.file("parts", PART_COLUMNS, &rows))
    }

    #[instrument(skip(self))]
    pub async fn export_scooters(&self, scope: StoreScope) -> Result<ReportFile, ServiceError> {
        let rows: Vec<Value> = ScooterEntity::find()
            .scoped_to(scooter::Column::StoreId, scope)
            .order_by_asc(scooter::Column::Vin)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|m| serde_json::to_value(m).unwrap_or(Value::Null))
            .collect();
        Ok(self.file("scooters", SCOOTER_COLUMNS, &rows))
    }

    #[instrument(skip(self))]
    pub async fn export_transfers(&self, scope: StoreScope) -> Result<ReportFile, ServiceError> {
        let mut query = TransferEntity::find();
        if let Some(store_id) = scope.store_id() {
            query = query.filter(
                Condition::any()
                    .add(stock_transfer::Column::SourceStoreId.eq(store_id))
                    .add(stock_transfer::Column::DestinationStoreId.eq(store_id)),
            );
        }
        let transfers = query
            .order_by_desc(stock_transfer::Column::TransferDate)
            .all(&*self.db)
            .await?;

        let part_ids: Vec<i64> = transfers.iter().map(|t| t.part_id).collect();
        let parts: HashMap<i64, part::Model> = PartEntity::find()
            .filter(part::Column::Id.is_in(part_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let rows: Vec<Value> = transfers
            .into_iter()
            .map(|t| {
                let part = parts.get(&t.part_id);
                let mut row = serde_json::to_value(&t).unwrap_or(Value::Null);
                if let (Value::Object(map), Some(part)) = (&mut row, part) {
                    map.insert(
                        "part".to_string(),
                        serde_json::to_value(part).unwrap_or(Value::Null),
                    );
                }
                row
            })
            .collect();
        Ok(self.file("transfers", TRANSFER_COLUMNS, &rows))
    }

    #[instrument(skip(self))]
    pub async fn export_purchases(&self, scope: StoreScope) -> Result<ReportFile, ServiceError> {
        let mut query = PurchaseEntity::find();
        if let Some(store_id) = scope.store_id() {
            // Same visibility rule as the purchase list: the header store, a
            // storeless header, or any line item received at the actor's store.
            query = query.filter(
                Condition::any()
                    .add(purchase::Column::StoreId.eq(store_id))
                    .add(purchase::Column::StoreId.is_null())
                    .add(
                        purchase::Column::Id.in_subquery(
                            Query::select()
                                .column(purchase_item::Column::PurchaseId)
                                .from(PurchaseItemEntity)
                                .and_where(purchase_item::Column::StoreId.eq(store_id))
                                .to_owned(),
                        ),
                    ),
            );
        }
        let purchases = query
            .order_by_desc(purchase::Column::InvoiceDate)
            .all(&*self.db)
            .await?;

        let supplier_ids: Vec<i64> = purchases.iter().map(|p| p.supplier_id).collect();
        let suppliers: HashMap<i64, Value> = SupplierEntity::find()
            .filter(crate::entities::supplier::Column::Id.is_in(supplier_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, serde_json::to_value(&s).unwrap_or(Value::Null)))
            .collect();

        let rows: Vec<Value> = purchases
            .into_iter()
            .map(|p| {
                let supplier = suppliers.get(&p.supplier_id).cloned();
                let mut row = serde_json::to_value(&p).unwrap_or(Value::Null);
                if let (Value::Object(map), Some(supplier)) = (&mut row, supplier) {
                    map.insert("supplier".to_string(), supplier);
                }
                row
            })
            .collect();
        Ok(self.file("purchases", PURCHASE_COLUMNS, &rows))
    }

    #[instrument(skip(self))]
    pub async fn export_job_cards(&self, scope: StoreScope) -> Result<ReportFile, ServiceError> {
        let cards = JobCardEntity::find()
            .scoped_to(job_card::Column::StoreId, scope)
            .order_by_desc(job_card::Column::Id)
            .all(&*self.db)
            .await?;

        let scooter_ids: Vec<i64> = cards.iter().map(|c| c.scooter_id).collect();
        let scooters: HashMap<i64, Value> = ScooterEntity::find()
            .filter(scooter::Column::Id.is_in(scooter_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, serde_json::to_value(&s).unwrap_or(Value::Null)))
            .collect();

        let rows: Vec<Value> = cards
            .into_iter()
            .map(|c| {
                let scooter = scooters.get(&c.scooter_id).cloned();
                let mut row = serde_json::to_value(&c).unwrap_or(Value::Null);
                if let (Value::Object(map), Some(scooter)) = (&mut row, scooter) {
                    map.insert("scooter".to_string(), scooter);
                }
                row
            })
            .collect();
        Ok(self.file("job_cards", JOB_CARD_COLUMNS, &rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_path_walks_nested_objects() {
        let row = json!({"scooter": {"vin": "VIN123", "year": 2022}});
        assert_eq!(resolve_path(&row, "scooter.vin"), "VIN123");
        assert_eq!(resolve_path(&row, "scooter.year"), "2022");
    }

    #[test]
    fn resolve_path_is_tolerant_of_missing_links() {
        let row = json!({"scooter": {"vin": "VIN123"}, "notes": null});
        assert_eq!(resolve_path(&row, "scooter.color"), "");
        assert_eq!(resolve_path(&row, "customer.name"), "");
        assert_eq!(resolve_path(&row, "notes"), "");
    }

    #[test]
    fn csv_writer_quotes_embedded_delimiters() {
        let columns = [
            ReportColumn::new("name", "Name"),
            ReportColumn::new("notes", "Notes"),
        ];
        let rows = [json!({"name": "Brake pad, front", "notes": "says \"ok\""})];
        let out = String::from_utf8(CsvReportWriter.write(&columns, &rows)).unwrap();
        assert_eq!(out, "Name,Notes\n\"Brake pad, front\",\"says \"\"ok\"\"\"\n");
    }
}
