// src/db/stock_request_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock::{RequestStatus, StockRequest, StockRequestRow, StockRequestStats},
};

const ROW_SELECT: &str = r#"
    SELECT
        r.id,
        r.product_id,
        p.name AS product_name,
        p.category,
        p.stock AS current_stock,
        r.request_date,
        r.quantity,
        r.status,
        r.created_at,
        r.updated_at
    FROM stock_requests r
    JOIN products p ON p.id = r.product_id
"#;

#[derive(Clone)]
pub struct StockRequestRepository;

impl StockRequestRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<StockRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request =
            sqlx::query_as::<_, StockRequest>("SELECT * FROM stock_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(request)
    }

    pub async fn row<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<StockRequestRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{ROW_SELECT} WHERE r.id = $1");
        let row = sqlx::query_as::<_, StockRequestRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        status: Option<RequestStatus>,
    ) -> Result<Vec<StockRequestRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{ROW_SELECT}
            WHERE ($1::request_status IS NULL OR r.status = $1)
            ORDER BY r.request_date DESC, r.created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, StockRequestRow>(&sql)
            .bind(status)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        request_date: NaiveDate,
        quantity: i32,
    ) -> Result<StockRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, StockRequest>(
            r#"
            INSERT INTO stock_requests (product_id, request_date, quantity, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(request_date)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(request)
    }

    /// Atualização explícita; aprovar/rejeitar é só o campo `status`,
    /// sem efeito sobre o estoque do produto.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        request_date: Option<NaiveDate>,
        quantity: Option<i32>,
        status: Option<RequestStatus>,
    ) -> Result<StockRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, StockRequest>(
            r#"
            UPDATE stock_requests
            SET request_date = COALESCE($2, request_date),
                quantity = COALESCE($3, quantity),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request_date)
        .bind(quantity)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(request)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM stock_requests WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn stats<'e, E>(
        &self,
        executor: E,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<StockRequestStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stats = sqlx::query_as::<_, StockRequestStats>(
            r#"
            SELECT
                COUNT(*) AS total_requests,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_requests,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved_requests,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected_requests,
                COALESCE(SUM(quantity) FILTER (WHERE status = 'approved'), 0) AS approved_quantity
            FROM stock_requests
            WHERE ($1::date IS NULL OR request_date >= $1)
              AND ($2::date IS NULL OR request_date <= $2)
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await?;
        Ok(stats)
    }
}
