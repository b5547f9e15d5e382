// src/services/inventory_service.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{common::error::AppError, db::ProductRepository, models::product::Product};

/// Ponto único de mutação do estoque. Compras, vendas e opname passam
/// todos por aqui; nenhum outro código escreve em `products.stock`.
#[derive(Clone)]
pub struct InventoryService {
    product_repo: ProductRepository,
}

impl InventoryService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    /// Ajusta o saldo em `delta` (positivo ou negativo) com um único UPDATE
    /// condicional: a checagem "não pode ficar negativo" e a escrita são a
    /// mesma instrução, então duas requisições concorrentes nunca deixam o
    /// saldo abaixo de zero.
    pub async fn adjust(
        &self,
        conn: &mut PgConnection,
        product_id: Uuid,
        delta: i32,
    ) -> Result<Product, AppError> {
        if let Some(product) = self
            .product_repo
            .adjust_stock(&mut *conn, product_id, delta)
            .await?
        {
            return Ok(product);
        }

        // Nenhuma linha afetada: ou o produto não existe, ou o saldo
        // ficaria negativo. Uma leitura desambigua.
        match self.product_repo.find_by_id(&mut *conn, product_id).await? {
            Some(product) => Err(AppError::InsufficientStock {
                product: product.name,
                available: product.stock,
            }),
            None => Err(AppError::NotFound(format!(
                "Produto {product_id} não encontrado"
            ))),
        }
    }

    /// Escreve o saldo absoluto (apply-adjustment do opname e edição manual).
    pub async fn set_absolute(
        &self,
        conn: &mut PgConnection,
        product_id: Uuid,
        value: i32,
    ) -> Result<Product, AppError> {
        self.product_repo
            .set_stock(&mut *conn, product_id, value)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Produto {product_id} não encontrado")))
    }
}
