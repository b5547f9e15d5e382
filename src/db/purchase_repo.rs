// src/db/purchase_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::purchase::{
        Purchase, PurchaseItem, PurchaseItemRow, PurchaseListRow, PurchaseOverview,
        PurchaseTrendRow, TopSupplierRow,
    },
};

// SELECT compartilhado entre listagem e detalhe: cabeçalho + fornecedor +
// resumo dos itens.
const LIST_SELECT: &str = r#"
    SELECT
        p.id,
        p.invoice_no,
        p.purchase_date,
        p.total,
        p.supplier_id,
        s.name AS supplier_name,
        s.contact AS supplier_contact,
        COUNT(pi.id) AS total_items,
        COALESCE(SUM(pi.quantity), 0) AS total_qty,
        p.created_at,
        p.updated_at
    FROM purchases p
    JOIN suppliers s ON s.id = p.supplier_id
    LEFT JOIN purchase_items pi ON pi.purchase_id = p.id
"#;

#[derive(Clone)]
pub struct PurchaseRepository;

impl PurchaseRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Leitura
    // ---

    pub async fn find_header<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Purchase>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let purchase = sqlx::query_as::<_, Purchase>("SELECT * FROM purchases WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(purchase)
    }

    pub async fn list_row<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<PurchaseListRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{LIST_SELECT} WHERE p.id = $1 GROUP BY p.id, s.id");
        let row = sqlx::query_as::<_, PurchaseListRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        supplier_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PurchaseListRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{LIST_SELECT}
            WHERE ($1::text IS NULL OR p.invoice_no ILIKE '%' || $1 || '%' OR s.name ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR p.supplier_id = $2)
              AND ($3::date IS NULL OR p.purchase_date >= $3)
              AND ($4::date IS NULL OR p.purchase_date <= $4)
            GROUP BY p.id, s.id
            ORDER BY p.created_at DESC
            LIMIT $5 OFFSET $6
            "#
        );
        let rows = sqlx::query_as::<_, PurchaseListRow>(&sql)
            .bind(search)
            .bind(supplier_id)
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
        supplier_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM purchases p
            JOIN suppliers s ON s.id = p.supplier_id
            WHERE ($1::text IS NULL OR p.invoice_no ILIKE '%' || $1 || '%' OR s.name ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR p.supplier_id = $2)
              AND ($3::date IS NULL OR p.purchase_date >= $3)
              AND ($4::date IS NULL OR p.purchase_date <= $4)
            "#,
        )
        .bind(search)
        .bind(supplier_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    /// Busca rápida por nº de fatura ou fornecedor, limitada a 20 resultados.
    pub async fn search<'e, E>(
        &self,
        executor: E,
        query: &str,
    ) -> Result<Vec<PurchaseListRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{LIST_SELECT}
            WHERE p.invoice_no ILIKE '%' || $1 || '%' OR s.name ILIKE '%' || $1 || '%'
            GROUP BY p.id, s.id
            ORDER BY p.created_at DESC
            LIMIT 20
            "#
        );
        let rows = sqlx::query_as::<_, PurchaseListRow>(&sql)
            .bind(query)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn items<'e, E>(
        &self,
        executor: E,
        purchase_id: Uuid,
    ) -> Result<Vec<PurchaseItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, PurchaseItem>(
            "SELECT * FROM purchase_items WHERE purchase_id = $1 ORDER BY created_at, id",
        )
        .bind(purchase_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn item_rows<'e, E>(
        &self,
        executor: E,
        purchase_id: Uuid,
    ) -> Result<Vec<PurchaseItemRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, PurchaseItemRow>(
            r#"
            SELECT
                pi.id,
                pi.product_id,
                pr.name AS product_name,
                pr.category,
                pr.stock AS product_stock,
                pi.quantity,
                pi.unit_cost,
                pi.quantity * pi.unit_cost AS subtotal
            FROM purchase_items pi
            JOIN products pr ON pr.id = pi.product_id
            WHERE pi.purchase_id = $1
            ORDER BY pi.created_at, pi.id
            "#,
        )
        .bind(purchase_id)
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
        supplier_id: Uuid,
        invoice_no: &str,
        purchase_date: NaiveDate,
        total: Decimal,
    ) -> Result<Purchase, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (supplier_id, invoice_no, purchase_date, total)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(supplier_id)
        .bind(invoice_no)
        .bind(purchase_date)
        .bind(total)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::map_unique_violation(e, "Já existe uma compra com este número de fatura."))
    }

    pub async fn update_header<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        supplier_id: Uuid,
        invoice_no: &str,
        purchase_date: NaiveDate,
        total: Decimal,
    ) -> Result<Purchase, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Purchase>(
            r#"
            UPDATE purchases
            SET supplier_id = $2, invoice_no = $3, purchase_date = $4, total = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(supplier_id)
        .bind(invoice_no)
        .bind(purchase_date)
        .bind(total)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::map_unique_violation(e, "Já existe uma compra com este número de fatura."))
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        purchase_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_cost: Decimal,
    ) -> Result<PurchaseItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, PurchaseItem>(
            r#"
            INSERT INTO purchase_items (purchase_id, product_id, quantity, unit_cost)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(purchase_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_cost)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn delete_items<'e, E>(&self, executor: E, purchase_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM purchase_items WHERE purchase_id = $1")
            .bind(purchase_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_header<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Estatísticas
    // ---

    pub async fn overview<'e, E>(&self, executor: E) -> Result<PurchaseOverview, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let overview = sqlx::query_as::<_, PurchaseOverview>(
            r#"
            SELECT
                COUNT(*) AS total_purchases,
                COALESCE(SUM(total), 0) AS total_value,
                COUNT(*) FILTER (
                    WHERE date_trunc('month', purchase_date) = date_trunc('month', CURRENT_DATE)
                ) AS purchases_this_month,
                COALESCE(SUM(total) FILTER (
                    WHERE date_trunc('month', purchase_date) = date_trunc('month', CURRENT_DATE)
                ), 0) AS value_this_month
            FROM purchases
            "#,
        )
        .fetch_one(executor)
        .await?;
        Ok(overview)
    }

    pub async fn top_suppliers<'e, E>(&self, executor: E) -> Result<Vec<TopSupplierRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, TopSupplierRow>(
            r#"
            SELECT
                s.id AS supplier_id,
                s.name AS supplier_name,
                COUNT(p.id) AS purchase_count,
                COALESCE(SUM(p.total), 0) AS total_value
            FROM suppliers s
            LEFT JOIN purchases p ON p.supplier_id = s.id
            GROUP BY s.id, s.name
            ORDER BY total_value DESC
            LIMIT 5
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Compras por mês nos últimos 6 meses.
    pub async fn monthly_trend<'e, E>(&self, executor: E) -> Result<Vec<PurchaseTrendRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, PurchaseTrendRow>(
            r#"
            SELECT
                to_char(purchase_date, 'YYYY-MM') AS month,
                COUNT(*) AS purchase_count,
                COALESCE(SUM(total), 0) AS total_value
            FROM purchases
            WHERE purchase_date >= CURRENT_DATE - INTERVAL '6 months'
            GROUP BY 1
            ORDER BY 1 DESC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
