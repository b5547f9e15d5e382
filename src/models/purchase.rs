// src/models/purchase.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_positive_decimal;

// --- 1. Cabeçalho da compra ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub invoice_no: String,
    pub purchase_date: NaiveDate,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Item de compra (entrada de estoque) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Item informado no payload de criação/atualização.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemInput {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,

    #[validate(custom(function = "validate_positive_decimal"))]
    pub unit_cost: Decimal,
}

// --- 3. Visões com joins ---

/// Linha de listagem: cabeçalho + fornecedor + resumo dos itens.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseListRow {
    pub id: Uuid,
    pub invoice_no: String,
    pub purchase_date: NaiveDate,
    pub total: Decimal,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub supplier_contact: Option<String>,
    pub total_items: i64,
    pub total_qty: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item com os dados do produto, para o detalhe da compra.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub product_stock: i32,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub subtotal: Decimal,
}

/// Cabeçalho + itens + totais derivados.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetail {
    #[serde(flatten)]
    pub header: PurchaseListRow,
    pub items: Vec<PurchaseItemRow>,
}

// --- 4. Estatísticas ---
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOverview {
    pub total_purchases: i64,
    pub total_value: Decimal,
    pub purchases_this_month: i64,
    pub value_this_month: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopSupplierRow {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub purchase_count: i64,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTrendRow {
    pub month: String,
    pub purchase_count: i64,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseStats {
    pub overview: PurchaseOverview,
    pub top_suppliers: Vec<TopSupplierRow>,
    pub monthly_trend: Vec<PurchaseTrendRow>,
}
