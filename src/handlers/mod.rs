pub mod auth;
pub mod ledger;
pub mod partners;
pub mod products;
pub mod purchases;
pub mod sales;
pub mod stock_opname;
pub mod stock_requests;
