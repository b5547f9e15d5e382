// src/handlers/stock_opname.rs

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
    middleware::rbac::{InventoryAccess, RequireRole},
    models::stock::StockOpnamePatch,
};

#[derive(Debug, Deserialize)]
pub struct ListOpnameParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub product: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpnamePayload {
    pub product_id: Uuid,

    pub count_date: NaiveDate,

    #[validate(range(min = 0, message = "A quantidade contada não pode ser negativa."))]
    pub counted_quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOpnamePayload {
    pub count_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "A quantidade contada não pode ser negativa."))]
    pub counted_quantity: Option<i32>,
}

// ---
// Handlers
// ---

pub async fn list_opname(
    State(app_state): State<AppState>,
    _guard: RequireRole<InventoryAccess>,
    Query(params): Query<ListOpnameParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let (rows, total) = app_state
        .stock_opname_service
        .list(
            params.search.as_deref(),
            params.product,
            params.start_date,
            params.end_date,
            limit,
            offset,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::paginated(
            "Registros de opname listados com sucesso",
            rows,
            Pagination::new(page, limit, total),
        )),
    ))
}

pub async fn get_opname(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.stock_opname_service.row(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Registro de opname", row)),
    ))
}

pub async fn create_opname(
    State(app_state): State<AppState>,
    _guard: RequireRole<InventoryAccess>,
    Json(payload): Json<CreateOpnamePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let row = app_state
        .stock_opname_service
        .create(payload.product_id, payload.count_date, payload.counted_quantity)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Opname registrado com sucesso", row)),
    ))
}

pub async fn update_opname(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
    Json(payload): Json<UpdateOpnamePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let patch = StockOpnamePatch {
        count_date: payload.count_date,
        counted_qty: payload.counted_quantity,
    };
    let row = app_state.stock_opname_service.update(id, patch).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Opname atualizado com sucesso", row)),
    ))
}

pub async fn delete_opname(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
) -> Result<impl IntoResponse, AppError> {
    app_state.stock_opname_service.delete(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Opname removido com sucesso")),
    ))
}

/// Acerta o estoque do produto para a quantidade contada e zera a
/// divergência do registro.
pub async fn apply_adjustment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<InventoryAccess>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.stock_opname_service.apply_adjustment(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(
            format!(
                "Estoque do produto {} ajustado para {} unidades",
                row.product_name, row.counted_qty
            ),
            row,
        )),
    ))
}

pub async fn opname_stats(
    State(app_state): State<AppState>,
    _guard: RequireRole<InventoryAccess>,
    Query(params): Query<DateRangeParams>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state
        .stock_opname_service
        .stats(params.start_date, params.end_date)
        .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Estatísticas de opname", stats)),
    ))
}
