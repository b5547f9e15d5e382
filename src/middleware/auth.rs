// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::Employee};

/// Middleware de autenticação: valida o Bearer token, carrega o
/// funcionário ativo e o injeta nos extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header
        && let Some(token) = auth_header.strip_prefix("Bearer ")
    {
        let employee = app_state.auth_service.validate_token(token).await?;
        request.extensions_mut().insert(employee);
        return Ok(next.run(request).await);
    }

    Err(AppError::InvalidToken)
}

/// Extrator para obter o funcionário autenticado diretamente nos handlers.
pub struct AuthenticatedEmployee(pub Employee);

impl<S> FromRequestParts<S> for AuthenticatedEmployee
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Employee>()
            .cloned()
            .map(AuthenticatedEmployee)
            .ok_or(AppError::InvalidToken)
    }
}
