// src/handlers/sales.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{ApiResponse, Pagination},
    },
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole, SalesAccess},
    models::sales::SaleItemInput,
};

// ---
// Parâmetros de listagem / busca
// ---
#[derive(Debug, Deserialize)]
pub struct ListSalesParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub customer: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailableProductsParams {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailableCustomersParams {
    pub search: Option<String>,
}

// ---
// Payload
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SalePayload {
    pub customer_id: Option<Uuid>,

    pub date: NaiveDate,

    #[validate(length(min = 1, message = "A venda precisa de pelo menos um item."), nested)]
    pub items: Vec<SaleItemInput>,
}

// ---
// Handlers
// ---

pub async fn list_sales(
    State(app_state): State<AppState>,
    Query(params): Query<ListSalesParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let (rows, total) = app_state
        .sales_service
        .list(
            params.search.as_deref(),
            params.customer,
            params.start_date,
            params.end_date,
            limit,
            offset,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::paginated(
            "Vendas listadas com sucesso",
            rows,
            Pagination::new(page, limit, total),
        )),
    ))
}

pub async fn get_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.sales_service.detail(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok("Detalhe da venda", detail))))
}

pub async fn create_sale(
    State(app_state): State<AppState>,
    _guard: RequireRole<SalesAccess>,
    Json(payload): Json<SalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .sales_service
        .create(payload.customer_id, payload.date, &payload.items)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Venda registrada com sucesso", detail)),
    ))
}

pub async fn update_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<SalesAccess>,
    Json(payload): Json<SalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .sales_service
        .update(id, payload.customer_id, payload.date, &payload.items)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Venda atualizada com sucesso", detail)),
    ))
}

// Excluir venda é restrito ao administrador.
pub async fn delete_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sales_service.delete(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Venda removida com sucesso")),
    ))
}

pub async fn search_sales(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params
        .query
        .as_deref()
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            AppError::BusinessRule("O termo de busca não pode ser vazio.".to_string())
        })?;

    let rows = app_state.sales_service.search(query).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Resultado da busca de vendas", rows)),
    ))
}

pub async fn sales_stats(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.sales_service.stats().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Estatísticas de vendas", stats)),
    ))
}

/// Tela do PDV: apenas produtos com estoque disponível.
pub async fn available_products(
    State(app_state): State<AppState>,
    Query(params): Query<AvailableProductsParams>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .sales_service
        .available_products(params.search.as_deref(), params.category.as_deref())
        .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Produtos disponíveis", products)),
    ))
}

pub async fn available_customers(
    State(app_state): State<AppState>,
    Query(params): Query<AvailableCustomersParams>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state
        .sales_service
        .available_customers(params.search.as_deref())
        .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Clientes disponíveis", customers)),
    ))
}
