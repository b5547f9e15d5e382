// src/db/partner_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::partner::{Customer, Supplier},
};

// Fornecedores e clientes: cadastros simples consumidos pelas compras e
// pelo PDV.
#[derive(Clone)]
pub struct PartnerRepository;

impl PartnerRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Fornecedores
    // ---

    pub async fn find_supplier<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(supplier)
    }

    pub async fn list_suppliers<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
    ) -> Result<Vec<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT * FROM suppliers
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR contact ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(search)
        .fetch_all(executor)
        .await?;
        Ok(suppliers)
    }

    pub async fn create_supplier<'e, E>(
        &self,
        executor: E,
        name: &str,
        contact: Option<&str>,
        address: Option<&str>,
    ) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, contact, address)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(contact)
        .bind(address)
        .fetch_one(executor)
        .await?;
        Ok(supplier)
    }

    // ---
    // Clientes
    // ---

    pub async fn find_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(customer)
    }

    pub async fn list_customers<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR contact ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(search)
        .fetch_all(executor)
        .await?;
        Ok(customers)
    }

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        name: &str,
        contact: Option<&str>,
        address: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, contact, address)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(contact)
        .bind(address)
        .fetch_one(executor)
        .await?;
        Ok(customer)
    }
}
