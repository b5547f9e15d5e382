pub mod auth;
pub mod ledger;
pub mod partner;
pub mod product;
pub mod purchase;
pub mod sales;
pub mod stock;
