// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- 1. Papéis de acesso ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Admin,
    Finance,
    Inventory,
    Sales,
}

// --- 2. Funcionário (linha completa, com hash de senha) ---
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: EmployeeRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Visão pública do funcionário (sem o hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: EmployeeRole,
}

impl From<&Employee> for EmployeeProfile {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            username: e.username.clone(),
            email: e.email.clone(),
            role: e.role,
        }
    }
}

// --- 3. Claims do JWT ---
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

/// Resposta do login: perfil + token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub employee: EmployeeProfile,
    pub token: String,
}
