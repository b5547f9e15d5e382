// src/services/partner_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PartnerRepository,
    models::partner::{Customer, Supplier},
};

#[derive(Clone)]
pub struct PartnerService {
    pool: PgPool,
    partner_repo: PartnerRepository,
}

impl PartnerService {
    pub fn new(pool: PgPool, partner_repo: PartnerRepository) -> Self {
        Self { pool, partner_repo }
    }

    pub async fn list_suppliers(&self, search: Option<&str>) -> Result<Vec<Supplier>, AppError> {
        self.partner_repo.list_suppliers(&self.pool, search).await
    }

    pub async fn get_supplier(&self, id: Uuid) -> Result<Supplier, AppError> {
        self.partner_repo
            .find_supplier(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fornecedor {id} não encontrado")))
    }

    pub async fn create_supplier(
        &self,
        name: &str,
        contact: Option<&str>,
        address: Option<&str>,
    ) -> Result<Supplier, AppError> {
        self.partner_repo
            .create_supplier(&self.pool, name, contact, address)
            .await
    }

    pub async fn list_customers(&self, search: Option<&str>) -> Result<Vec<Customer>, AppError> {
        self.partner_repo.list_customers(&self.pool, search).await
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, AppError> {
        self.partner_repo
            .find_customer(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cliente {id} não encontrado")))
    }

    pub async fn create_customer(
        &self,
        name: &str,
        contact: Option<&str>,
        address: Option<&str>,
    ) -> Result<Customer, AppError> {
        self.partner_repo
            .create_customer(&self.pool, name, contact, address)
            .await
    }
}
