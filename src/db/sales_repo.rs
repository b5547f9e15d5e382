// src/db/sales_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{
        Sale, SaleItem, SaleItemRow, SaleListRow, SalesOverview, SalesTrendRow, TopCustomerRow,
        TopProductRow,
    },
};

// Cabeçalho + cliente (opcional) + resumo dos itens.
const LIST_SELECT: &str = r#"
    SELECT
        v.id,
        v.sale_date,
        v.total,
        v.customer_id,
        c.name AS customer_name,
        c.contact AS customer_contact,
        COUNT(si.id) AS total_items,
        COALESCE(SUM(si.quantity), 0) AS total_qty,
        v.created_at,
        v.updated_at
    FROM sales v
    LEFT JOIN customers c ON c.id = v.customer_id
    LEFT JOIN sale_items si ON si.sale_id = v.id
"#;

#[derive(Clone)]
pub struct SalesRepository;

impl SalesRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Leitura
    // ---

    pub async fn find_header<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    pub async fn list_row<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<SaleListRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{LIST_SELECT} WHERE v.id = $1 GROUP BY v.id, c.id");
        let row = sqlx::query_as::<_, SaleListRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        customer_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SaleListRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{LIST_SELECT}
            WHERE ($1::text IS NULL OR v.id::text ILIKE '%' || $1 || '%' OR c.name ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR v.customer_id = $2)
              AND ($3::date IS NULL OR v.sale_date >= $3)
              AND ($4::date IS NULL OR v.sale_date <= $4)
            GROUP BY v.id, c.id
            ORDER BY v.created_at DESC
            LIMIT $5 OFFSET $6
            "#
        );
        let rows = sqlx::query_as::<_, SaleListRow>(&sql)
            .bind(search)
            .bind(customer_id)
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
        customer_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM sales v
            LEFT JOIN customers c ON c.id = v.customer_id
            WHERE ($1::text IS NULL OR v.id::text ILIKE '%' || $1 || '%' OR c.name ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR v.customer_id = $2)
              AND ($3::date IS NULL OR v.sale_date >= $3)
              AND ($4::date IS NULL OR v.sale_date <= $4)
            "#,
        )
        .bind(search)
        .bind(customer_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn search<'e, E>(&self, executor: E, query: &str) -> Result<Vec<SaleListRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{LIST_SELECT}
            WHERE v.id::text ILIKE '%' || $1 || '%' OR c.name ILIKE '%' || $1 || '%'
            GROUP BY v.id, c.id
            ORDER BY v.created_at DESC
            LIMIT 20
            "#
        );
        let rows = sqlx::query_as::<_, SaleListRow>(&sql)
            .bind(query)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn items<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM sale_items WHERE sale_id = $1 ORDER BY created_at, id",
        )
        .bind(sale_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn item_rows<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
    ) -> Result<Vec<SaleItemRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT
                si.id,
                si.product_id,
                pr.name AS product_name,
                pr.category,
                pr.stock AS product_stock,
                si.quantity,
                si.unit_price,
                si.quantity * si.unit_price AS subtotal
            FROM sale_items si
            JOIN products pr ON pr.id = si.product_id
            WHERE si.sale_id = $1
            ORDER BY si.created_at, si.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    // ---
    // Escrita (sempre dentro da transação do workflow)
    // ---

    pub async fn insert_header<'e, E>(
        &self,
        executor: E,
        customer_id: Option<Uuid>,
        sale_date: NaiveDate,
        total: Decimal,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (customer_id, sale_date, total)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(sale_date)
        .bind(total)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    pub async fn update_header<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        customer_id: Option<Uuid>,
        sale_date: NaiveDate,
        total: Decimal,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales
            SET customer_id = $2, sale_date = $3, total = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(sale_date)
        .bind(total)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(sale_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn delete_items<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM sale_items WHERE sale_id = $1")
            .bind(sale_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_header<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Estatísticas
    // ---

    pub async fn overview<'e, E>(&self, executor: E) -> Result<SalesOverview, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let overview = sqlx::query_as::<_, SalesOverview>(
            r#"
            SELECT
                COUNT(*) AS total_sales,
                COALESCE(SUM(total), 0) AS total_revenue,
                COUNT(*) FILTER (
                    WHERE date_trunc('month', sale_date) = date_trunc('month', CURRENT_DATE)
                ) AS sales_this_month,
                COALESCE(SUM(total) FILTER (
                    WHERE date_trunc('month', sale_date) = date_trunc('month', CURRENT_DATE)
                ), 0) AS revenue_this_month,
                COUNT(*) FILTER (WHERE sale_date = CURRENT_DATE) AS sales_today,
                COALESCE(SUM(total) FILTER (WHERE sale_date = CURRENT_DATE), 0) AS revenue_today
            FROM sales
            "#,
        )
        .fetch_one(executor)
        .await?;
        Ok(overview)
    }

    pub async fn top_customers<'e, E>(&self, executor: E) -> Result<Vec<TopCustomerRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, TopCustomerRow>(
            r#"
            SELECT
                c.id AS customer_id,
                c.name AS customer_name,
                COUNT(v.id) AS sale_count,
                COALESCE(SUM(v.total), 0) AS total_spent
            FROM customers c
            LEFT JOIN sales v ON v.customer_id = c.id
            GROUP BY c.id, c.name
            ORDER BY total_spent DESC
            LIMIT 5
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn top_products<'e, E>(&self, executor: E) -> Result<Vec<TopProductRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, TopProductRow>(
            r#"
            SELECT
                pr.id AS product_id,
                pr.name AS product_name,
                pr.category,
                COALESCE(SUM(si.quantity), 0) AS total_sold,
                COALESCE(SUM(si.quantity * si.unit_price), 0) AS total_revenue
            FROM products pr
            LEFT JOIN sale_items si ON si.product_id = pr.id
            GROUP BY pr.id, pr.name, pr.category
            ORDER BY total_sold DESC
            LIMIT 5
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Vendas por dia nos últimos 7 dias.
    pub async fn daily_trend<'e, E>(&self, executor: E) -> Result<Vec<SalesTrendRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, SalesTrendRow>(
            r#"
            SELECT
                sale_date AS day,
                COUNT(*) AS sale_count,
                COALESCE(SUM(total), 0) AS total_revenue
            FROM sales
            WHERE sale_date >= CURRENT_DATE - INTERVAL '7 days'
            GROUP BY sale_date
            ORDER BY sale_date DESC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
