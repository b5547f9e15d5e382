// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        EmployeeRepository, LedgerRepository, PartnerRepository, ProductRepository,
        PurchaseRepository, SalesRepository, StockOpnameRepository, StockRequestRepository,
    },
    services::{
        AuthService, InventoryService, LedgerService, PartnerService, ProductService,
        PurchaseService, SalesService, StockOpnameService, StockRequestService,
    },
};

/// Estado compartilhado da aplicação. O pool nasce e morre aqui, na raiz
/// de composição — os services só o recebem emprestado por clone.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub partner_service: PartnerService,
    pub purchase_service: PurchaseService,
    pub sales_service: SalesService,
    pub stock_opname_service: StockOpnameService,
    pub stock_request_service: StockRequestService,
    pub ledger_service: LedgerService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("Conexão com o banco de dados estabelecida com sucesso");

        // --- Monta o grafo de dependências ---
        let product_repo = ProductRepository::new();
        let partner_repo = PartnerRepository::new();
        let inventory = InventoryService::new(product_repo.clone());

        let auth_service = AuthService::new(
            EmployeeRepository::new(),
            jwt_secret,
            db_pool.clone(),
        );
        let product_service = ProductService::new(
            db_pool.clone(),
            product_repo.clone(),
            inventory.clone(),
        );
        let partner_service = PartnerService::new(db_pool.clone(), partner_repo.clone());
        let purchase_service = PurchaseService::new(
            db_pool.clone(),
            PurchaseRepository::new(),
            partner_repo.clone(),
            inventory.clone(),
        );
        let sales_service = SalesService::new(
            db_pool.clone(),
            SalesRepository::new(),
            product_repo.clone(),
            partner_repo,
            inventory.clone(),
        );
        let stock_opname_service = StockOpnameService::new(
            db_pool.clone(),
            StockOpnameRepository::new(),
            product_repo.clone(),
            inventory,
        );
        let stock_request_service = StockRequestService::new(
            db_pool.clone(),
            StockRequestRepository::new(),
            product_repo,
        );
        let ledger_service = LedgerService::new(db_pool.clone(), LedgerRepository::new());

        Ok(Self {
            db_pool,
            auth_service,
            product_service,
            partner_service,
            purchase_service,
            sales_service,
            stock_opname_service,
            stock_request_service,
            ledger_service,
        })
    }
}
