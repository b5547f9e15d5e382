// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedEmployee,
    models::auth::EmployeeProfile,
};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "O usuário é obrigatório."))]
    pub username: String,

    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Login realizado com sucesso", response)),
    ))
}

pub async fn get_me(employee: AuthenticatedEmployee) -> Result<impl IntoResponse, AppError> {
    let profile = EmployeeProfile::from(&employee.0);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Perfil do funcionário", profile)),
    ))
}
