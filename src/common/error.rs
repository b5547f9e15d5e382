use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    Validation(#[from] validator::ValidationErrors),

    // Regra de negócio violada (itens vazios, débito/crédito inválido, ...).
    #[error("{0}")]
    BusinessRule(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Estoque insuficiente para o produto '{product}' (disponível: {available})")]
    InsufficientStock { product: String, available: i32 },

    // Violação de chave única (nº de fatura, nome de conta, username).
    #[error("{0}")]
    Conflict(String),

    #[error("Usuário ou senha inválidos")]
    InvalidCredentials,

    #[error("Token de autenticação inválido ou ausente")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("Erro de banco de dados")]
    Database(#[from] sqlx::Error),

    // `anyhow::Error` captura o contexto de qualquer erro inesperado.
    #[error("Erro interno do servidor")]
    Internal(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Detalhes de diagnóstico só saem fora de produção.
fn expose_diagnostics() -> bool {
    std::env::var("APP_ENV").as_deref() != Ok("production")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::Validation(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "success": false,
                    "message": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::BusinessRule(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::InsufficientStock { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string(), None)
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::InvalidCredentials | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string(), None)
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),

            // Falhas de infraestrutura viram 500. O log fica com o detalhe;
            // a resposta só o carrega fora de produção.
            e => {
                tracing::error!("Erro interno do servidor: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        let body = if expose_diagnostics() && detail.is_some() {
            Json(json!({ "success": false, "message": message, "error": detail }))
        } else {
            Json(json!({ "success": false, "message": message }))
        };
        (status, body).into_response()
    }
}

impl AppError {
    /// Converte violação de chave única do Postgres em `Conflict`.
    pub fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
        if let Some(db_err) = err.as_database_error()
            && db_err.is_unique_violation()
        {
            return AppError::Conflict(message.to_string());
        }
        AppError::Database(err)
    }
}
