// src/handlers/stock_requests.rs

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
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::rbac::{InventoryAccess, RequireRole},
    models::stock::{RequestStatus, StockRequestPatch},
};

#[derive(Debug, Deserialize)]
pub struct ListRequestsParams {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestPayload {
    pub product_id: Uuid,

    pub request_date: NaiveDate,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestPayload {
    pub request_date: Option<NaiveDate>,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: Option<i32>,

    pub status: Option<RequestStatus>,
}

// ---
// Handlers
// ---

pub async fn list_requests(
    State(app_state): State<AppState>,
    _guard: RequireRole<InventoryAccess>,
    Query(params): Query<ListRequestsParams>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.stock_request_service.list(params.status).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Requisições listadas com sucesso", rows)),
    ))
}

pub async fn get_request(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.stock_request_service.row(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Requisição de estoque", row)),
    ))
}

pub async fn create_request(
    State(app_state): State<AppState>,
    _guard: RequireRole<InventoryAccess>,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let row = app_state
        .stock_request_service
        .create(payload.product_id, payload.request_date, payload.quantity)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Requisição criada com sucesso", row)),
    ))
}

/// Aprovar/rejeitar muda apenas o status; a entrada de estoque em si
/// acontece no fluxo de compras.
pub async fn update_request(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
    Json(payload): Json<UpdateRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let patch = StockRequestPatch {
        request_date: payload.request_date,
        quantity: payload.quantity,
        status: payload.status,
    };
    let row = app_state.stock_request_service.update(id, patch).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Requisição atualizada com sucesso", row)),
    ))
}

pub async fn delete_request(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
) -> Result<impl IntoResponse, AppError> {
    app_state.stock_request_service.delete(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Requisição removida com sucesso")),
    ))
}

pub async fn request_stats(
    State(app_state): State<AppState>,
    _guard: RequireRole<InventoryAccess>,
    Query(params): Query<DateRangeParams>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state
        .stock_request_service
        .stats(params.start_date, params.end_date)
        .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Estatísticas de requisições", stats)),
    ))
}

pub async fn low_stock_products(
    State(app_state): State<AppState>,
    _guard: RequireRole<InventoryAccess>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.stock_request_service.low_stock().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Produtos com estoque baixo", rows)),
    ))
}
