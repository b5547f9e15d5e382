// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{CategoryBreakdownRow, LowStockRow, Product, ProductOverview},
};

#[derive(Clone)]
pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Leitura
    // ---

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Listagem com filtros opcionais de busca, categoria e faixa de estoque.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        category: Option<&str>,
        low_stock_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR category = $2)
              AND (NOT $3 OR stock <= 10)
            ORDER BY name ASC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(search)
        .bind(category)
        .bind(low_stock_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn count<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        category: Option<&str>,
        low_stock_only: bool,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR category = $2)
              AND (NOT $3 OR stock <= 10)
            "#,
        )
        .bind(search)
        .bind(category)
        .bind(low_stock_only)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    /// Produtos disponíveis para o PDV (somente com estoque > 0).
    pub async fn list_available<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE stock > 0
              AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR category ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR category = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(search)
        .bind(category)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn categories<'e, E>(&self, executor: E) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products ORDER BY category ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(categories)
    }

    // ---
    // Escrita
    // ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        category: &str,
        stock: i32,
        purchase_price: Decimal,
        sale_price: Decimal,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, category, stock, purchase_price, sale_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(stock)
        .bind(purchase_price)
        .bind(sale_price)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    /// Atualiza os dados cadastrais; o estoque fica de fora de propósito.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        category: &str,
        purchase_price: Decimal,
        sale_price: Decimal,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, category = $3, purchase_price = $4, sale_price = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(purchase_price)
        .bind(sale_price)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Mutação de estoque (usada somente pelo InventoryService)
    // ---

    /// Ajuste condicional e atômico: só aplica se o resultado não for
    /// negativo. `None` = nenhuma linha afetada (produto ausente OU saldo
    /// insuficiente); quem chama desambigua.
    pub async fn adjust_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        delta: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET stock = stock + $2, updated_at = NOW()
            WHERE id = $1 AND stock + $2 >= 0
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Escrita absoluta do saldo (apply-adjustment do opname, edição manual).
    pub async fn set_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        value: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET stock = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(value)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    // ---
    // Estatísticas
    // ---

    pub async fn overview<'e, E>(&self, executor: E) -> Result<ProductOverview, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let overview = sqlx::query_as::<_, ProductOverview>(
            r#"
            SELECT
                COUNT(*) AS total_products,
                COALESCE(SUM(stock), 0) AS total_stock,
                COUNT(*) FILTER (WHERE stock <= 10) AS low_stock_products,
                COALESCE(SUM(stock * purchase_price), 0) AS stock_value_at_cost,
                COALESCE(SUM(stock * sale_price), 0) AS stock_value_at_price
            FROM products
            "#,
        )
        .fetch_one(executor)
        .await?;
        Ok(overview)
    }

    pub async fn category_breakdown<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<CategoryBreakdownRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, CategoryBreakdownRow>(
            r#"
            SELECT category,
                   COUNT(*) AS product_count,
                   COALESCE(SUM(stock), 0) AS total_stock
            FROM products
            GROUP BY category
            ORDER BY product_count DESC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn low_stock<'e, E>(
        &self,
        executor: E,
        threshold: i32,
    ) -> Result<Vec<LowStockRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, LowStockRow>(
            r#"
            SELECT id, name, category, stock
            FROM products
            WHERE stock <= $1
            ORDER BY stock ASC
            LIMIT 10
            "#,
        )
        .bind(threshold)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
