// src/services/product_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{Product, ProductStats},
    services::inventory_service::InventoryService,
};

/// Operação do ajuste manual de estoque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    Set,
    Add,
    Subtract,
}

#[derive(Clone)]
pub struct ProductService {
    pool: PgPool,
    product_repo: ProductRepository,
    inventory: InventoryService,
}

impl ProductService {
    pub fn new(pool: PgPool, product_repo: ProductRepository, inventory: InventoryService) -> Self {
        Self {
            pool,
            product_repo,
            inventory,
        }
    }

    pub async fn create(
        &self,
        name: &str,
        category: &str,
        stock: i32,
        purchase_price: Decimal,
        sale_price: Decimal,
    ) -> Result<Product, AppError> {
        self.product_repo
            .create(&self.pool, name, category, stock, purchase_price, sale_price)
            .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        category: &str,
        purchase_price: Decimal,
        sale_price: Decimal,
    ) -> Result<Product, AppError> {
        self.product_repo
            .update(&self.pool, id, name, category, purchase_price, sale_price)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Produto {id} não encontrado")))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.product_repo.delete(&self.pool, id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("Produto {id} não encontrado")));
        }
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Produto {id} não encontrado")))
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        category: Option<&str>,
        low_stock_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Product>, i64), AppError> {
        let rows = self
            .product_repo
            .list(&self.pool, search, category, low_stock_only, limit, offset)
            .await?;
        let total = self
            .product_repo
            .count(&self.pool, search, category, low_stock_only)
            .await?;
        Ok((rows, total))
    }

    pub async fn categories(&self) -> Result<Vec<String>, AppError> {
        self.product_repo.categories(&self.pool).await
    }

    /// Edição manual de saldo, roteada pelo InventoryService para manter a
    /// invariante de não-negatividade em todos os caminhos.
    pub async fn update_stock(
        &self,
        id: Uuid,
        operation: StockOperation,
        quantity: i32,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;
        let product = match operation {
            StockOperation::Set => self.inventory.set_absolute(&mut tx, id, quantity).await?,
            StockOperation::Add => self.inventory.adjust(&mut tx, id, quantity).await?,
            StockOperation::Subtract => self.inventory.adjust(&mut tx, id, -quantity).await?,
        };
        tx.commit().await?;
        Ok(product)
    }

    pub async fn stats(&self) -> Result<ProductStats, AppError> {
        let overview = self.product_repo.overview(&self.pool).await?;
        let by_category = self.product_repo.category_breakdown(&self.pool).await?;
        let low_stock = self.product_repo.low_stock(&self.pool, 10).await?;
        Ok(ProductStats {
            overview,
            by_category,
            low_stock,
        })
    }
}
