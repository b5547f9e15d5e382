// src/handlers/ledger.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
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
    middleware::rbac::{FinanceAccess, RequireRole},
    models::ledger::{AccountKind, JournalEntryPatch},
};

// ---
// Parâmetros
// ---
#[derive(Debug, Deserialize)]
pub struct ListAccountsParams {
    pub search: Option<String>,
    pub kind: Option<AccountKind>,
}

#[derive(Debug, Deserialize)]
pub struct ListEntriesParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub account: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// "debit" ou "credit" filtra pelo lado do lançamento.
    pub side: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrialBalanceParams {
    /// 'YYYY' ou 'YYYY-MM'.
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountPayload {
    #[validate(length(min = 1, message = "O nome da conta é obrigatório."))]
    pub name: String,

    pub kind: AccountKind,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryPayload {
    pub account_id: Uuid,

    pub date: NaiveDate,

    #[validate(custom(function = "validate_non_negative_decimal"))]
    #[serde(default)]
    pub debit: Decimal,

    #[validate(custom(function = "validate_non_negative_decimal"))]
    #[serde(default)]
    pub credit: Decimal,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryPayload {
    pub account_id: Option<Uuid>,
    pub date: Option<NaiveDate>,

    #[validate(custom(function = "validate_non_negative_decimal"))]
    pub debit: Option<Decimal>,

    #[validate(custom(function = "validate_non_negative_decimal"))]
    pub credit: Option<Decimal>,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: Option<String>,
}

// ---
// Plano de contas
// ---

pub async fn list_accounts(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
    Query(params): Query<ListAccountsParams>,
) -> Result<impl IntoResponse, AppError> {
    let accounts = app_state
        .ledger_service
        .list_accounts(params.search.as_deref(), params.kind)
        .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Contas listadas com sucesso", accounts)),
    ))
}

pub async fn list_accounts_by_kind(
    State(app_state): State<AppState>,
    Path(kind): Path<String>,
    _guard: RequireRole<FinanceAccess>,
) -> Result<impl IntoResponse, AppError> {
    let kind = AccountKind::parse(&kind).ok_or_else(|| {
        AppError::BusinessRule(format!("Tipo de conta inválido: '{kind}'"))
    })?;
    let accounts = app_state.ledger_service.list_accounts(None, Some(kind)).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Contas listadas com sucesso", accounts)),
    ))
}

pub async fn get_account(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<FinanceAccess>,
) -> Result<impl IntoResponse, AppError> {
    let account = app_state.ledger_service.account(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok("Conta encontrada", account))))
}

pub async fn create_account(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
    Json(payload): Json<AccountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let account = app_state
        .ledger_service
        .create_account(&payload.name, payload.kind)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Conta criada com sucesso", account)),
    ))
}

pub async fn update_account(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<FinanceAccess>,
    Json(payload): Json<AccountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let account = app_state
        .ledger_service
        .update_account(id, &payload.name, payload.kind)
        .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Conta atualizada com sucesso", account)),
    ))
}

pub async fn delete_account(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<FinanceAccess>,
) -> Result<impl IntoResponse, AppError> {
    app_state.ledger_service.delete_account(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Conta removida com sucesso")),
    ))
}

// ---
// Lançamentos
// ---

pub async fn list_entries(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
    Query(params): Query<ListEntriesParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let debit_side = match params.side.as_deref() {
        Some("debit") => Some(true),
        Some("credit") => Some(false),
        Some(other) => {
            return Err(AppError::BusinessRule(format!(
                "Filtro de lado inválido: '{other}' (use 'debit' ou 'credit')"
            )));
        }
        None => None,
    };

    let (rows, total) = app_state
        .ledger_service
        .list_entries(
            params.search.as_deref(),
            params.account,
            params.start_date,
            params.end_date,
            debit_side,
            limit,
            offset,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::paginated(
            "Lançamentos listados com sucesso",
            rows,
            Pagination::new(page, limit, total),
        )),
    ))
}

pub async fn get_entry(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<FinanceAccess>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.ledger_service.entry(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok("Detalhe do lançamento", row))))
}

pub async fn create_entry(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
    Json(payload): Json<CreateEntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let row = app_state
        .ledger_service
        .create_entry(
            payload.account_id,
            payload.date,
            payload.debit,
            payload.credit,
            &payload.description,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Lançamento criado com sucesso", row)),
    ))
}

pub async fn update_entry(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<FinanceAccess>,
    Json(payload): Json<UpdateEntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let patch = JournalEntryPatch {
        account_id: payload.account_id,
        entry_date: payload.date,
        debit: payload.debit,
        credit: payload.credit,
        description: payload.description,
    };
    let row = app_state.ledger_service.update_entry(id, patch).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Lançamento atualizado com sucesso", row)),
    ))
}

pub async fn delete_entry(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    _guard: RequireRole<FinanceAccess>,
) -> Result<impl IntoResponse, AppError> {
    app_state.ledger_service.delete_entry(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Lançamento removido com sucesso")),
    ))
}

pub async fn search_entries(
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

    let rows = app_state.ledger_service.search_entries(query).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Resultado da busca de lançamentos", rows)),
    ))
}

// ---
// Relatórios
// ---

pub async fn trial_balance(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
    Query(params): Query<TrialBalanceParams>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .ledger_service
        .trial_balance(params.period.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok("Balancete", report))))
}

pub async fn general_ledger(
    State(app_state): State<AppState>,
    Path(account_id): Path<Uuid>,
    _guard: RequireRole<FinanceAccess>,
    Query(params): Query<DateRangeParams>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .ledger_service
        .general_ledger(account_id, params.start_date, params.end_date)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok("Razão da conta", report))))
}

pub async fn journal_stats(
    State(app_state): State<AppState>,
    _guard: RequireRole<FinanceAccess>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.ledger_service.stats().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Estatísticas do diário", stats)),
    ))
}
