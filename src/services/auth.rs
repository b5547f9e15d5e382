// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EmployeeRepository,
    models::auth::{Claims, Employee, EmployeeProfile, LoginResponse},
};

#[derive(Clone)]
pub struct AuthService {
    employee_repo: EmployeeRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(employee_repo: EmployeeRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self {
            employee_repo,
            jwt_secret,
            pool,
        }
    }

    /// Login por username ou e-mail; só funcionários ativos passam.
    pub async fn login(&self, login: &str, password: &str) -> Result<LoginResponse, AppError> {
        let employee = self
            .employee_repo
            .find_active_by_login(&self.pool, login)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Verificação do bcrypt em thread separada para não travar o runtime
        let password_clone = password.to_owned();
        let hash_clone = employee.password_hash.clone();
        let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {e}"))??;

        if !is_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(employee.id)?;
        Ok(LoginResponse {
            employee: EmployeeProfile::from(&employee),
            token,
        })
    }

    /// Valida o token e carrega o funcionário (precisa continuar ativo).
    pub async fn validate_token(&self, token: &str) -> Result<Employee, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.employee_repo
            .find_active_by_id(&self.pool, token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, employee_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: employee_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
