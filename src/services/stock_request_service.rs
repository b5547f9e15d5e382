// src/services/stock_request_service.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, StockRequestRepository},
    models::{
        product::LowStockRow,
        stock::{RequestStatus, StockRequestPatch, StockRequestRow, StockRequestStats},
    },
};

#[derive(Clone)]
pub struct StockRequestService {
    pool: PgPool,
    request_repo: StockRequestRepository,
    product_repo: ProductRepository,
}

impl StockRequestService {
    pub fn new(
        pool: PgPool,
        request_repo: StockRequestRepository,
        product_repo: ProductRepository,
    ) -> Self {
        Self {
            pool,
            request_repo,
            product_repo,
        }
    }

    pub async fn create(
        &self,
        product_id: Uuid,
        request_date: NaiveDate,
        quantity: i32,
    ) -> Result<StockRequestRow, AppError> {
        self.product_repo
            .find_by_id(&self.pool, product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Produto {product_id} não encontrado")))?;

        let request = self
            .request_repo
            .insert(&self.pool, product_id, request_date, quantity)
            .await?;
        self.row(request.id).await
    }

    /// Aprovar/rejeitar é apenas o campo de status: o estoque só muda
    /// quando a compra correspondente for registrada no fluxo de compras.
    pub async fn update(&self, id: Uuid, patch: StockRequestPatch) -> Result<StockRequestRow, AppError> {
        self.request_repo
            .find(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Requisição {id} não encontrada")))?;

        self.request_repo
            .update(&self.pool, id, patch.request_date, patch.quantity, patch.status)
            .await?;
        self.row(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.request_repo.delete(&self.pool, id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("Requisição {id} não encontrada")));
        }
        Ok(())
    }

    pub async fn row(&self, id: Uuid) -> Result<StockRequestRow, AppError> {
        self.request_repo
            .row(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Requisição {id} não encontrada")))
    }

    pub async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<StockRequestRow>, AppError> {
        self.request_repo.list(&self.pool, status).await
    }

    pub async fn stats(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<StockRequestStats, AppError> {
        self.request_repo
            .stats(&self.pool, start_date, end_date)
            .await
    }

    /// Produtos no limite de reposição (estoque <= 10, como na regra do
    /// painel de requisições).
    pub async fn low_stock(&self) -> Result<Vec<LowStockRow>, AppError> {
        self.product_repo.low_stock(&self.pool, 10).await
    }
}
