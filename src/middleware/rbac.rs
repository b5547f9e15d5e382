// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::auth::{Employee, EmployeeRole}};

/// 1. O trait que define um conjunto de papéis aceitos
pub trait RoleSet: Send + Sync + 'static {
    fn allowed() -> &'static [EmployeeRole];
    fn label() -> &'static str;
}

/// 2. O extrator (guardião): falha com 403 se o papel do funcionário
/// autenticado não estiver no conjunto. Depende do `auth_guard` já ter
/// populado os extensions.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let employee = parts
            .extensions
            .get::<Employee>()
            .ok_or(AppError::InvalidToken)?;

        if !T::allowed().contains(&employee.role) {
            return Err(AppError::Forbidden(format!(
                "Acesso negado: esta ação exige o perfil {}.",
                T::label()
            )));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// CONJUNTOS DE PAPÉIS
// ---
// O admin passa em todos; os demais seguem a área da rota.

pub struct AdminOnly;
impl RoleSet for AdminOnly {
    fn allowed() -> &'static [EmployeeRole] {
        &[EmployeeRole::Admin]
    }
    fn label() -> &'static str {
        "administrador"
    }
}

pub struct FinanceAccess;
impl RoleSet for FinanceAccess {
    fn allowed() -> &'static [EmployeeRole] {
        &[EmployeeRole::Admin, EmployeeRole::Finance]
    }
    fn label() -> &'static str {
        "financeiro"
    }
}

pub struct InventoryAccess;
impl RoleSet for InventoryAccess {
    fn allowed() -> &'static [EmployeeRole] {
        &[EmployeeRole::Admin, EmployeeRole::Inventory]
    }
    fn label() -> &'static str {
        "inventário"
    }
}

pub struct SalesAccess;
impl RoleSet for SalesAccess {
    fn allowed() -> &'static [EmployeeRole] {
        &[EmployeeRole::Admin, EmployeeRole::Sales]
    }
    fn label() -> &'static str {
        "vendas"
    }
}
