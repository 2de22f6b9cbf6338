use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::{ProductRepository, ProductTx};
use crate::dtos::product::NewProduct;
use crate::error::{AppError, AppResult};
use crate::models::product::Product;

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn begin(&self) -> AppResult<Box<dyn ProductTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgProductTx { tx }))
    }
}

pub struct PgProductTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ProductTx for PgProductTx {
    async fn find_by_id(&mut self, id: i64) -> AppResult<Option<Product>> {
        // Row lock keeps a concurrent update/delete of the same id out until commit.
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products WHERE id = $1 FOR UPDATE"
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(product)
    }

    async fn exists_by_name_ignore_case(&mut self, name: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE LOWER(name) = LOWER($1))"
        )
        .bind(name)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn insert(&mut self, product: &NewProduct) -> AppResult<Product> {
        let created = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, price, stock)
             VALUES ($1, $2, $3)
             RETURNING id, name, price, stock"
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(created)
    }

    async fn update(&mut self, product: &Product) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET name = $2, price = $3, stock = $4
             WHERE id = $1
             RETURNING id, name, price, stock"
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product not found: id={}", product.id)))
    }

    async fn delete(&mut self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let PgProductTx { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}
