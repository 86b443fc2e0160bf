pub mod access;
pub mod cart;
pub mod customers;
pub mod fleet;
pub mod job_cards;
pub mod products;
pub mod purchases;
pub mod rentals;
pub mod reports;
pub mod staff;
pub mod stock;
pub mod stores;
pub mod suppliers;
pub mod transfers;

pub use access::StoreScope;
pub use cart::CartService;
pub use customers::CustomerService;
pub use fleet::FleetService;
pub use job_cards::JobCardService;
pub use products::ProductService;
pub use purchases::PurchaseService;
pub use rentals::RentalService;
pub use reports::ReportService;
pub use staff::StaffService;
pub use stock::StockService;
pub use stores::StoreService;
pub use suppliers::SupplierService;
pub use transfers::TransferService;
