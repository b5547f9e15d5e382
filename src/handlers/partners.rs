// src/handlers/partners.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::rbac::{FinanceAccess, RequireRole, SalesAccess},
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
}

// ---
// Fornecedores
// ---

pub async fn list_suppliers(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let suppliers = app_state
        .partner_service
        .list_suppliers(params.search.as_deref())
        .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Fornecedores listados com sucesso", suppliers)),
    ))
}

pub async fn get_supplier(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let supplier = app_state.partner_service.get_supplier(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Fornecedor encontrado", supplier)),
    ))
}

pub async fn create_supplier(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
    Json(payload): Json<PartnerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let supplier = app_state
        .partner_service
        .create_supplier(
            &payload.name,
            payload.contact.as_deref(),
            payload.address.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Fornecedor criado com sucesso", supplier)),
    ))
}

// ---
// Clientes
// ---

pub async fn list_customers(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state
        .partner_service
        .list_customers(params.search.as_deref())
        .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Clientes listados com sucesso", customers)),
    ))
}

pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.partner_service.get_customer(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Cliente encontrado", customer)),
    ))
}

pub async fn create_customer(
    State(app_state): State<AppState>,
    _guard: RequireRole<SalesAccess>,
    Json(payload): Json<PartnerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .partner_service
        .create_customer(
            &payload.name,
            payload.contact.as_deref(),
            payload.address.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Cliente criado com sucesso", customer)),
    ))
}
