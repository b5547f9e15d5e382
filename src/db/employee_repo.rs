// src/db/employee_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Employee};

// Repositório de funcionários, usado pelo fluxo de autenticação.
#[derive(Clone)]
pub struct EmployeeRepository;

impl EmployeeRepository {
    pub fn new() -> Self {
        Self
    }

    /// Busca por username OU e-mail, somente funcionários ativos.
    pub async fn find_active_by_login<'e, E>(
        &self,
        executor: E,
        login: &str,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE (username = $1 OR email = $1) AND active",
        )
        .bind(login)
        .fetch_optional(executor)
        .await?;
        Ok(employee)
    }

    pub async fn find_active_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee =
            sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1 AND active")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(employee)
    }
}
