// src/handlers/purchases.rs

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
    middleware::rbac::{AdminOnly, FinanceAccess, RequireRole},
    models::purchase::PurchaseItemInput,
};

// ---
// Parâmetros de listagem / busca
// ---
#[derive(Debug, Deserialize)]
pub struct ListPurchasesParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub supplier: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

// ---
// Payload: criação e atualização compartilham o mesmo corpo
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePayload {
    pub supplier_id: Uuid,

    #[validate(length(min = 1, message = "O número da fatura é obrigatório."))]
    pub invoice_no: String,

    pub date: NaiveDate,

    #[validate(length(min = 1, message = "A compra precisa de pelo menos um item."), nested)]
    pub items: Vec<PurchaseItemInput>,
}

// ---
// Handlers
// ---

pub async fn list_purchases(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
    Query(params): Query<ListPurchasesParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let (rows, total) = app_state
        .purchase_service
        .list(
            params.search.as_deref(),
            params.supplier,
            params.start_date,
            params.end_date,
            limit,
            offset,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::paginated(
            "Compras listadas com sucesso",
            rows,
            Pagination::new(page, limit, total),
        )),
    ))
}

pub async fn get_purchase(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<FinanceAccess>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.purchase_service.detail(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Detalhe da compra", detail)),
    ))
}

pub async fn create_purchase(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
    Json(payload): Json<PurchasePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .purchase_service
        .create(
            payload.supplier_id,
            &payload.invoice_no,
            payload.date,
            &payload.items,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Compra criada com sucesso", detail)),
    ))
}

pub async fn update_purchase(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<FinanceAccess>,
    Json(payload): Json<PurchasePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .purchase_service
        .update(
            id,
            payload.supplier_id,
            &payload.invoice_no,
            payload.date,
            &payload.items,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Compra atualizada com sucesso", detail)),
    ))
}

// Excluir compra é restrito ao administrador.
pub async fn delete_purchase(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    app_state.purchase_service.delete(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Compra removida com sucesso")),
    ))
}

pub async fn search_purchases(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params
        .query
        .as_deref()
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            AppError::BusinessRule("O termo de busca não pode ser vazio.".to_string())
        })?;

    let rows = app_state.purchase_service.search(query).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Resultado da busca de compras", rows)),
    ))
}

pub async fn purchase_stats(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.purchase_service.stats().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Estatísticas de compras", stats)),
    ))
}
