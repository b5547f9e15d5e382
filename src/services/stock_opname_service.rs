// src/services/stock_opname_service.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, StockOpnameRepository},
    models::stock::{StockOpnamePatch, StockOpnameRow, StockOpnameStats},
    services::inventory_service::InventoryService,
};

/// Divergência: quantidade contada menos estoque do sistema.
pub fn discrepancy(counted_qty: i32, system_stock: i32) -> i32 {
    counted_qty - system_stock
}

#[derive(Clone)]
pub struct StockOpnameService {
    pool: PgPool,
    opname_repo: StockOpnameRepository,
    product_repo: ProductRepository,
    inventory: InventoryService,
}

impl StockOpnameService {
    pub fn new(
        pool: PgPool,
        opname_repo: StockOpnameRepository,
        product_repo: ProductRepository,
        inventory: InventoryService,
    ) -> Self {
        Self {
            pool,
            opname_repo,
            product_repo,
            inventory,
        }
    }

    // --- CREATE ---
    // Fotografa a divergência contra o estoque ATUAL; não mexe no saldo.
    pub async fn create(
        &self,
        product_id: Uuid,
        count_date: NaiveDate,
        counted_qty: i32,
    ) -> Result<StockOpnameRow, AppError> {
        let product = self
            .product_repo
            .find_by_id(&self.pool, product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Produto {product_id} não encontrado")))?;

        let diff = discrepancy(counted_qty, product.stock);
        let record = self
            .opname_repo
            .insert(&self.pool, product_id, count_date, counted_qty, diff)
            .await?;

        self.row(record.id).await
    }

    // --- UPDATE ---
    // Se a contagem mudar, a divergência é recalculada contra o estoque
    // ATUAL do produto (que pode ter andado desde o registro) — o valor
    // gravado significa sempre "relativo ao estoque na última edição".
    pub async fn update(&self, id: Uuid, patch: StockOpnamePatch) -> Result<StockOpnameRow, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = self
            .opname_repo
            .find(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Registro de opname {id} não encontrado")))?;

        let new_discrepancy = match patch.counted_qty {
            Some(counted) => {
                let product = self
                    .product_repo
                    .find_by_id(&mut *tx, existing.product_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "Produto {} não encontrado",
                            existing.product_id
                        ))
                    })?;
                Some(discrepancy(counted, product.stock))
            }
            None => None,
        };

        self.opname_repo
            .update(&mut *tx, id, patch.count_date, patch.counted_qty, new_discrepancy)
            .await?;

        tx.commit().await?;
        self.row(id).await
    }

    // --- APPLY ADJUSTMENT ---
    // Acerta o estoque para a quantidade contada e zera a divergência, na
    // mesma transação. Reaplicar num registro já liquidado é um no-op.
    pub async fn apply_adjustment(&self, id: Uuid) -> Result<StockOpnameRow, AppError> {
        let mut tx = self.pool.begin().await?;

        let record = self
            .opname_repo
            .find(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Registro de opname {id} não encontrado")))?;

        self.inventory
            .set_absolute(&mut tx, record.product_id, record.counted_qty)
            .await?;
        self.opname_repo.settle(&mut *tx, id).await?;

        tx.commit().await?;
        self.row(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.opname_repo.delete(&self.pool, id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "Registro de opname {id} não encontrado"
            )));
        }
        Ok(())
    }

    // --- Leitura ---

    pub async fn row(&self, id: Uuid) -> Result<StockOpnameRow, AppError> {
        self.opname_repo
            .row(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Registro de opname {id} não encontrado")))
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        product_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<StockOpnameRow>, i64), AppError> {
        let rows = self
            .opname_repo
            .list(&self.pool, search, product_id, start_date, end_date, limit, offset)
            .await?;
        let total = self
            .opname_repo
            .count(&self.pool, search, product_id, start_date, end_date)
            .await?;
        Ok((rows, total))
    }

    pub async fn stats(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<StockOpnameStats, AppError> {
        let summary = self
            .opname_repo
            .summary(&self.pool, start_date, end_date)
            .await?;
        let top_discrepancies = self
            .opname_repo
            .top_discrepancies(&self.pool, start_date, end_date)
            .await?;
        Ok(StockOpnameStats {
            summary,
            top_discrepancies,
        })
    }
}
