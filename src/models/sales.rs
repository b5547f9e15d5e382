// src/models/sales.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_positive_decimal;

// --- 1. Cabeçalho da venda (PDV) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub sale_date: NaiveDate,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Item de venda (saída de estoque) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Item informado no payload de criação/atualização.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemInput {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,

    #[validate(custom(function = "validate_positive_decimal"))]
    pub unit_price: Decimal,
}

// --- 3. Visões com joins ---

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleListRow {
    pub id: Uuid,
    pub sale_date: NaiveDate,
    pub total: Decimal,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub total_items: i64,
    pub total_qty: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub product_stock: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub header: SaleListRow,
    pub items: Vec<SaleItemRow>,
}

// --- 4. Estatísticas ---
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalesOverview {
    pub total_sales: i64,
    pub total_revenue: Decimal,
    pub sales_this_month: i64,
    pub revenue_this_month: Decimal,
    pub sales_today: i64,
    pub revenue_today: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomerRow {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub sale_count: i64,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopProductRow {
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub total_sold: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalesTrendRow {
    pub day: NaiveDate,
    pub sale_count: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub overview: SalesOverview,
    pub top_customers: Vec<TopCustomerRow>,
    pub top_products: Vec<TopProductRow>,
    pub sales_trend: Vec<SalesTrendRow>,
}
