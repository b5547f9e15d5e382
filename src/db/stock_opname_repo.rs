// src/db/stock_opname_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock::{DiscrepancyRow, StockOpname, StockOpnameRow, StockOpnameSummary},
};

const ROW_SELECT: &str = r#"
    SELECT
        o.id,
        o.product_id,
        p.name AS product_name,
        p.category,
        p.stock AS system_stock,
        o.count_date,
        o.counted_qty,
        o.discrepancy,
        o.created_at,
        o.updated_at
    FROM stock_opname o
    JOIN products p ON p.id = o.product_id
"#;

#[derive(Clone)]
pub struct StockOpnameRepository;

impl StockOpnameRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<StockOpname>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, StockOpname>("SELECT * FROM stock_opname WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(record)
    }

    pub async fn row<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<StockOpnameRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{ROW_SELECT} WHERE o.id = $1");
        let row = sqlx::query_as::<_, StockOpnameRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        product_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StockOpnameRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{ROW_SELECT}
            WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%' OR p.category ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR o.product_id = $2)
              AND ($3::date IS NULL OR o.count_date >= $3)
              AND ($4::date IS NULL OR o.count_date <= $4)
            ORDER BY o.count_date DESC, o.created_at DESC
            LIMIT $5 OFFSET $6
            "#
        );
        let rows = sqlx::query_as::<_, StockOpnameRow>(&sql)
            .bind(search)
            .bind(product_id)
            .bind(start_date)
            .bind(end_date)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn count<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        product_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM stock_opname o
            JOIN products p ON p.id = o.product_id
            WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%' OR p.category ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR o.product_id = $2)
              AND ($3::date IS NULL OR o.count_date >= $3)
              AND ($4::date IS NULL OR o.count_date <= $4)
            "#,
        )
        .bind(search)
        .bind(product_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        count_date: NaiveDate,
        counted_qty: i32,
        discrepancy: i32,
    ) -> Result<StockOpname, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, StockOpname>(
            r#"
            INSERT INTO stock_opname (product_id, count_date, counted_qty, discrepancy)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(count_date)
        .bind(counted_qty)
        .bind(discrepancy)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    /// Atualização explícita: os campos ausentes mantêm o valor atual.
    /// `discrepancy` acompanha `counted_qty` — sempre recalculado por quem chama.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        count_date: Option<NaiveDate>,
        counted_qty: Option<i32>,
        discrepancy: Option<i32>,
    ) -> Result<StockOpname, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, StockOpname>(
            r#"
            UPDATE stock_opname
            SET count_date = COALESCE($2, count_date),
                counted_qty = COALESCE($3, counted_qty),
                discrepancy = COALESCE($4, discrepancy),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(count_date)
        .bind(counted_qty)
        .bind(discrepancy)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    /// Marca o registro como liquidado após o apply-adjustment.
    pub async fn settle<'e, E>(&self, executor: E, id: Uuid) -> Result<StockOpname, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, StockOpname>(
            r#"
            UPDATE stock_opname
            SET discrepancy = 0, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM stock_opname WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Estatísticas
    // ---

    pub async fn summary<'e, E>(
        &self,
        executor: E,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<StockOpnameSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let summary = sqlx::query_as::<_, StockOpnameSummary>(
            r#"
            SELECT
                COUNT(*) AS total_records,
                COUNT(*) FILTER (WHERE discrepancy > 0) AS overages,
                COUNT(*) FILTER (WHERE discrepancy < 0) AS shortages,
                COUNT(*) FILTER (WHERE discrepancy = 0) AS matching,
                COALESCE(SUM(ABS(discrepancy)), 0) AS total_abs_discrepancy,
                AVG(ABS(discrepancy)) AS mean_abs_discrepancy
            FROM stock_opname
            WHERE ($1::date IS NULL OR count_date >= $1)
              AND ($2::date IS NULL OR count_date <= $2)
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await?;
        Ok(summary)
    }

    /// Top 10 divergências por valor absoluto.
    pub async fn top_discrepancies<'e, E>(
        &self,
        executor: E,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DiscrepancyRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, DiscrepancyRow>(
            r#"
            SELECT
                o.product_id,
                p.name AS product_name,
                p.category,
                o.discrepancy,
                ABS(o.discrepancy) AS abs_discrepancy,
                o.count_date
            FROM stock_opname o
            JOIN products p ON p.id = o.product_id
            WHERE ($1::date IS NULL OR o.count_date >= $1)
              AND ($2::date IS NULL OR o.count_date <= $2)
            ORDER BY ABS(o.discrepancy) DESC
            LIMIT 10
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
