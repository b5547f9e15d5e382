// src/services/sales_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PartnerRepository, ProductRepository, SalesRepository},
    models::{
        partner::Customer,
        product::Product,
        sales::{SaleDetail, SaleItemInput, SaleListRow, SalesStats},
    },
    services::inventory_service::InventoryService,
};

/// Total da venda: Σ quantidade × preço unitário.
pub fn sale_total(items: &[SaleItemInput]) -> Decimal {
    items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.unit_price)
        .sum()
}

#[derive(Clone)]
pub struct SalesService {
    pool: PgPool,
    sales_repo: SalesRepository,
    product_repo: ProductRepository,
    partner_repo: PartnerRepository,
    inventory: InventoryService,
}

impl SalesService {
    pub fn new(
        pool: PgPool,
        sales_repo: SalesRepository,
        product_repo: ProductRepository,
        partner_repo: PartnerRepository,
        inventory: InventoryService,
    ) -> Self {
        Self {
            pool,
            sales_repo,
            product_repo,
            partner_repo,
            inventory,
        }
    }

    /// Confere existência e saldo de todos os itens ANTES de qualquer
    /// escrita, para que o caminho de erro comum não precise de rollback.
    async fn check_stock(
        &self,
        conn: &mut PgConnection,
        items: &[SaleItemInput],
    ) -> Result<(), AppError> {
        for item in items {
            let product = self
                .product_repo
                .find_by_id(&mut *conn, item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Produto {} não encontrado", item.product_id))
                })?;
            if product.stock < item.quantity {
                return Err(AppError::InsufficientStock {
                    product: product.name,
                    available: product.stock,
                });
            }
        }
        Ok(())
    }

    // --- CREATE ---
    // Tudo em uma transação. A pré-checagem dá o erro amigável; o ajuste
    // condicional do InventoryService é quem garante, mesmo sob
    // concorrência, que o saldo nunca fica negativo.
    pub async fn create(
        &self,
        customer_id: Option<Uuid>,
        sale_date: NaiveDate,
        items: &[SaleItemInput],
    ) -> Result<SaleDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        if let Some(customer_id) = customer_id {
            self.partner_repo
                .find_customer(&mut *tx, customer_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Cliente {customer_id} não encontrado"))
                })?;
        }

        // 1. Pré-checagem de todos os itens, antes de qualquer mutação
        self.check_stock(&mut tx, items).await?;

        // 2. Cabeçalho com o total derivado
        let total = sale_total(items);
        let sale = self
            .sales_repo
            .insert_header(&mut *tx, customer_id, sale_date, total)
            .await?;

        // 3. Itens + baixa de estoque
        for item in items {
            self.sales_repo
                .insert_item(&mut *tx, sale.id, item.product_id, item.quantity, item.unit_price)
                .await?;
            self.inventory
                .adjust(&mut tx, item.product_id, -item.quantity)
                .await?;
        }

        tx.commit().await?;
        self.detail(sale.id).await
    }

    // --- UPDATE (substitui, não mescla) ---
    pub async fn update(
        &self,
        id: Uuid,
        customer_id: Option<Uuid>,
        sale_date: NaiveDate,
        items: &[SaleItemInput],
    ) -> Result<SaleDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        self.sales_repo
            .find_header(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venda {id} não encontrada")))?;

        if let Some(customer_id) = customer_id {
            self.partner_repo
                .find_customer(&mut *tx, customer_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Cliente {customer_id} não encontrado"))
                })?;
        }

        // 1. Devolve o estoque dos itens antigos
        let existing = self.sales_repo.items(&mut *tx, id).await?;
        for item in &existing {
            self.inventory
                .adjust(&mut tx, item.product_id, item.quantity)
                .await?;
        }
        self.sales_repo.delete_items(&mut *tx, id).await?;

        // 2. Revalida o saldo contra o estado pós-reversão
        self.check_stock(&mut tx, items).await?;

        // 3. Regrava o cabeçalho e aplica os novos itens
        let total = sale_total(items);
        self.sales_repo
            .update_header(&mut *tx, id, customer_id, sale_date, total)
            .await?;

        for item in items {
            self.sales_repo
                .insert_item(&mut *tx, id, item.product_id, item.quantity, item.unit_price)
                .await?;
            self.inventory
                .adjust(&mut tx, item.product_id, -item.quantity)
                .await?;
        }

        tx.commit().await?;
        self.detail(id).await
    }

    // --- DELETE ---
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.sales_repo
            .find_header(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venda {id} não encontrada")))?;

        let existing = self.sales_repo.items(&mut *tx, id).await?;
        for item in &existing {
            self.inventory
                .adjust(&mut tx, item.product_id, item.quantity)
                .await?;
        }

        self.sales_repo.delete_items(&mut *tx, id).await?;
        self.sales_repo.delete_header(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(())
    }

    // --- Leitura ---

    pub async fn detail(&self, id: Uuid) -> Result<SaleDetail, AppError> {
        let header = self
            .sales_repo
            .list_row(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venda {id} não encontrada")))?;
        let items = self.sales_repo.item_rows(&self.pool, id).await?;
        Ok(SaleDetail { header, items })
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        customer_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<SaleListRow>, i64), AppError> {
        let rows = self
            .sales_repo
            .list(&self.pool, search, customer_id, start_date, end_date, limit, offset)
            .await?;
        let total = self
            .sales_repo
            .count(&self.pool, search, customer_id, start_date, end_date)
            .await?;
        Ok((rows, total))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SaleListRow>, AppError> {
        self.sales_repo.search(&self.pool, query).await
    }

    /// Produtos com estoque > 0 para a tela do PDV. É um filtro de leitura,
    /// não uma reserva: a venda concorrente ainda é barrada pelo ajuste
    /// condicional na hora de fechar.
    pub async fn available_products(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Product>, AppError> {
        self.product_repo
            .list_available(&self.pool, search, category)
            .await
    }

    pub async fn available_customers(&self, search: Option<&str>) -> Result<Vec<Customer>, AppError> {
        self.partner_repo.list_customers(&self.pool, search).await
    }

    pub async fn stats(&self) -> Result<SalesStats, AppError> {
        let overview = self.sales_repo.overview(&self.pool).await?;
        let top_customers = self.sales_repo.top_customers(&self.pool).await?;
        let top_products = self.sales_repo.top_products(&self.pool).await?;
        let sales_trend = self.sales_repo.daily_trend(&self.pool).await?;
        Ok(SalesStats {
            overview,
            top_customers,
            top_products,
            sales_trend,
        })
    }
}
