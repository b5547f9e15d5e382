pub mod auth;
pub mod inventory_service;
pub mod ledger_service;
pub mod partner_service;
pub mod product_service;
pub mod purchase_service;
pub mod sales_service;
pub mod stock_opname_service;
pub mod stock_request_service;

pub use auth::AuthService;
pub use inventory_service::InventoryService;
pub use ledger_service::LedgerService;
pub use partner_service::PartnerService;
pub use product_service::ProductService;
pub use purchase_service::PurchaseService;
pub use sales_service::SalesService;
pub use stock_opname_service::StockOpnameService;
pub use stock_request_service::StockRequestService;
