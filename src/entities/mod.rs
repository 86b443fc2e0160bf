//! SeaORM entities for the dealership schema.
//!
//! Every stock-keeping record (`parts`) is scoped to exactly one store;
//! part numbers are unique within a store's catalog, not globally.

pub mod customer;
pub mod job_card;
pub mod job_card_item;
pub mod part;
pub mod product;
pub mod purchase;
pub mod purchase_item;
pub mod rental;
pub mod scooter;
pub mod service_checklist;
pub mod staff_profile;
pub mod stock_transfer;
pub mod store;
pub mod supplier;

pub use customer::Entity as Customer;
pub use job_card::Entity as JobCard;
pub use job_card_item::Entity as JobCardItem;
pub use part::Entity as Part;
pub use product::Entity as Product;
pub use purchase::Entity as Purchase;
pub use purchase_item::Entity as PurchaseItem;
pub use rental::Entity as Rental;
pub use scooter::Entity as Scooter;
pub use service_checklist::Entity as ServiceChecklist;
pub use staff_profile::Entity as StaffProfile;
pub use stock_transfer::Entity as StockTransfer;
pub use store::Entity as Store;
pub use supplier::Entity as Supplier;
