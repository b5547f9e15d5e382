// src/models/stock.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- 1. Stock opname (conferência física de estoque) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockOpname {
    pub id: Uuid,
    pub product_id: Uuid,
    pub count_date: NaiveDate,
    pub counted_qty: i32,
    // Fotografia: contado - estoque do sistema no momento do registro/edição.
    pub discrepancy: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registro com os dados do produto (estoque do sistema incluído).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockOpnameRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub system_stock: i32,
    pub count_date: NaiveDate,
    pub counted_qty: i32,
    pub discrepancy: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campos opcionais de atualização, explícitos (sem SET dinâmico).
#[derive(Debug, Clone, Default)]
pub struct StockOpnamePatch {
    pub count_date: Option<NaiveDate>,
    pub counted_qty: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockOpnameSummary {
    pub total_records: i64,
    pub overages: i64,
    pub shortages: i64,
    pub matching: i64,
    pub total_abs_discrepancy: i64,
    pub mean_abs_discrepancy: Option<rust_decimal::Decimal>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyRow {
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub discrepancy: i32,
    pub abs_discrepancy: i32,
    pub count_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOpnameStats {
    pub summary: StockOpnameSummary,
    pub top_discrepancies: Vec<DiscrepancyRow>,
}

// --- 2. Requisição de reposição de estoque ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockRequest {
    pub id: Uuid,
    pub product_id: Uuid,
    pub request_date: NaiveDate,
    pub quantity: i32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockRequestRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub current_stock: i32,
    pub request_date: NaiveDate,
    pub quantity: i32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct StockRequestPatch {
    pub request_date: Option<NaiveDate>,
    pub quantity: Option<i32>,
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockRequestStats {
    pub total_requests: i64,
    pub pending_requests: i64,
    pub approved_requests: i64,
    pub rejected_requests: i64,
    pub approved_quantity: i64,
}
