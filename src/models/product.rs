// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- 1. Produto (catálogo + saldo de estoque) ---
// O campo `stock` só é mutado pelo InventoryService.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub stock: i32,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Estatísticas do catálogo ---
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductOverview {
    pub total_products: i64,
    pub total_stock: i64,
    pub low_stock_products: i64,
    pub stock_value_at_cost: Decimal,
    pub stock_value_at_price: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownRow {
    pub category: String,
    pub product_count: i64,
    pub total_stock: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LowStockRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub stock: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub overview: ProductOverview,
    pub by_category: Vec<CategoryBreakdownRow>,
    pub low_stock: Vec<LowStockRow>,
}
