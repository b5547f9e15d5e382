// src/services/purchase_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PartnerRepository, PurchaseRepository},
    models::purchase::{
        PurchaseDetail, PurchaseItemInput, PurchaseListRow, PurchaseStats,
    },
    services::inventory_service::InventoryService,
};

/// Total da compra: Σ quantidade × custo unitário.
pub fn purchase_total(items: &[PurchaseItemInput]) -> Decimal {
    items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.unit_cost)
        .sum()
}

#[derive(Clone)]
pub struct PurchaseService {
    pool: PgPool,
    purchase_repo: PurchaseRepository,
    partner_repo: PartnerRepository,
    inventory: InventoryService,
}

impl PurchaseService {
    pub fn new(
        pool: PgPool,
        purchase_repo: PurchaseRepository,
        partner_repo: PartnerRepository,
        inventory: InventoryService,
    ) -> Self {
        Self {
            pool,
            purchase_repo,
            partner_repo,
            inventory,
        }
    }

    // --- CREATE ---
    // Cabeçalho + itens + entradas de estoque em uma única transação:
    // ou tudo entra, ou nada entra.
    pub async fn create(
        &self,
        supplier_id: Uuid,
        invoice_no: &str,
        purchase_date: NaiveDate,
        items: &[PurchaseItemInput],
    ) -> Result<PurchaseDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Fornecedor precisa existir
        self.partner_repo
            .find_supplier(&mut *tx, supplier_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fornecedor {supplier_id} não encontrado")))?;

        // 2. Cabeçalho com o total derivado
        let total = purchase_total(items);
        let purchase = self
            .purchase_repo
            .insert_header(&mut *tx, supplier_id, invoice_no, purchase_date, total)
            .await?;

        // 3. Itens + entrada de estoque (um por um, mesma transação)
        for item in items {
            self.purchase_repo
                .insert_item(&mut *tx, purchase.id, item.product_id, item.quantity, item.unit_cost)
                .await?;
            self.inventory
                .adjust(&mut tx, item.product_id, item.quantity)
                .await?;
        }

        tx.commit().await?;
        self.detail(purchase.id).await
    }

    // --- UPDATE (substitui, não mescla) ---
    // Reverte o efeito dos itens antigos, apaga, regrava o cabeçalho e
    // aplica os novos — tudo na mesma transação.
    pub async fn update(
        &self,
        id: Uuid,
        supplier_id: Uuid,
        invoice_no: &str,
        purchase_date: NaiveDate,
        items: &[PurchaseItemInput],
    ) -> Result<PurchaseDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        self.purchase_repo
            .find_header(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Compra {id} não encontrada")))?;

        self.partner_repo
            .find_supplier(&mut *tx, supplier_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fornecedor {supplier_id} não encontrado")))?;

        // 1. Reverte a entrada de estoque de cada item existente
        let existing = self.purchase_repo.items(&mut *tx, id).await?;
        for item in &existing {
            self.inventory
                .adjust(&mut tx, item.product_id, -item.quantity)
                .await?;
        }

        // 2. Apaga os itens antigos
        self.purchase_repo.delete_items(&mut *tx, id).await?;

        // 3. Regrava o cabeçalho com o novo total
        let total = purchase_total(items);
        self.purchase_repo
            .update_header(&mut *tx, id, supplier_id, invoice_no, purchase_date, total)
            .await?;

        // 4. Insere os novos itens e reaplica o estoque
        for item in items {
            self.purchase_repo
                .insert_item(&mut *tx, id, item.product_id, item.quantity, item.unit_cost)
                .await?;
            self.inventory
                .adjust(&mut tx, item.product_id, item.quantity)
                .await?;
        }

        tx.commit().await?;
        self.detail(id).await
    }

    // --- DELETE ---
    // A reversão pode falhar com estoque insuficiente se a mercadoria já
    // foi vendida; nesse caso nada é apagado.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.purchase_repo
            .find_header(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Compra {id} não encontrada")))?;

        let existing = self.purchase_repo.items(&mut *tx, id).await?;
        for item in &existing {
            self.inventory
                .adjust(&mut tx, item.product_id, -item.quantity)
                .await?;
        }

        self.purchase_repo.delete_items(&mut *tx, id).await?;
        self.purchase_repo.delete_header(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(())
    }

    // --- Leitura ---

    pub async fn detail(&self, id: Uuid) -> Result<PurchaseDetail, AppError> {
        let header = self
            .purchase_repo
            .list_row(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Compra {id} não encontrada")))?;
        let items = self.purchase_repo.item_rows(&self.pool, id).await?;
        Ok(PurchaseDetail { header, items })
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        supplier_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PurchaseListRow>, i64), AppError> {
        let rows = self
            .purchase_repo
            .list(&self.pool, search, supplier_id, start_date, end_date, limit, offset)
            .await?;
        let total = self
            .purchase_repo
            .count(&self.pool, search, supplier_id, start_date, end_date)
            .await?;
        Ok((rows, total))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<PurchaseListRow>, AppError> {
        self.purchase_repo.search(&self.pool, query).await
    }

    pub async fn stats(&self) -> Result<PurchaseStats, AppError> {
        let overview = self.purchase_repo.overview(&self.pool).await?;
        let top_suppliers = self.purchase_repo.top_suppliers(&self.pool).await?;
        let monthly_trend = self.purchase_repo.monthly_trend(&self.pool).await?;
        Ok(PurchaseStats {
            overview,
            top_suppliers,
            monthly_trend,
        })
    }
}
