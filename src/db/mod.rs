pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod partner_repo;
pub use partner_repo::PartnerRepository;
pub mod purchase_repo;
pub use purchase_repo::PurchaseRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod stock_opname_repo;
pub use stock_opname_repo::StockOpnameRepository;
pub mod stock_request_repo;
pub use stock_request_repo::StockRequestRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
