// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{ApiResponse, Pagination},
        validation::validate_non_negative_decimal,
    },
    config::AppState,
    middleware::rbac::{InventoryAccess, RequireRole},
    services::product_service::StockOperation,
};

// ---
// Parâmetros de listagem
// ---
#[derive(Debug, Deserialize)]
pub struct ListProductsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub low_stock: bool,
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,

    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    #[serde(default)]
    pub stock: i32,

    #[validate(custom(function = "validate_non_negative_decimal"))]
    pub purchase_price: Decimal,

    #[validate(custom(function = "validate_non_negative_decimal"))]
    pub sale_price: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,

    #[validate(custom(function = "validate_non_negative_decimal"))]
    pub purchase_price: Decimal,

    #[validate(custom(function = "validate_non_negative_decimal"))]
    pub sale_price: Decimal,
}

/// Ajuste manual de saldo: operação explícita em vez de campos soltos.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockPayload {
    pub operation: StockOperation,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,
}

// ---
// Handlers
// ---

pub async fn list_products(
    State(app_state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let (products, total) = app_state
        .product_service
        .list(
            params.search.as_deref(),
            params.category.as_deref(),
            params.low_stock,
            limit,
            offset,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::paginated(
            "Produtos listados com sucesso",
            products,
            Pagination::new(page, limit, total),
        )),
    ))
}

pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.get(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok("Produto encontrado", product))))
}

pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<InventoryAccess>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .product_service
        .create(
            &payload.name,
            &payload.category,
            payload.stock,
            payload.purchase_price,
            payload.sale_price,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Produto criado com sucesso", product)),
    ))
}

pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .product_service
        .update(
            id,
            &payload.name,
            &payload.category,
            payload.purchase_price,
            payload.sale_price,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Produto atualizado com sucesso", product)),
    ))
}

pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Produto removido com sucesso")),
    ))
}

pub async fn update_stock(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
    Json(payload): Json<UpdateStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .product_service
        .update_stock(id, payload.operation, payload.quantity)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Estoque atualizado com sucesso", product)),
    ))
}

pub async fn list_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.product_service.categories().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Categorias listadas com sucesso", categories)),
    ))
}

pub async fn product_stats(
    State(app_state): State<AppState>,
    _guard: RequireRole<InventoryAccess>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.product_service.stats().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Estatísticas do catálogo", stats)),
    ))
}
