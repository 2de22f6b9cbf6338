use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{ProductRepository, ProductTx};
use crate::dtos::product::NewProduct;
use crate::error::{AppError, AppResult};
use crate::models::product::Product;

#[derive(Debug, Default, Clone)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Product>,
}

impl Table {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        let needle = name.to_lowercase();
        self.rows
            .values()
            .any(|p| Some(p.id) != except && p.name.to_lowercase() == needle)
    }

    fn unique_violation(name: &str) -> AppError {
        AppError::Integrity(format!(
            "duplicate key value violates unique constraint \"uk_products_name_lower\": {name}"
        ))
    }
}

/// Process-local store with the same contract as the Postgres one.
///
/// Transactions hold the table lock until they are committed or dropped, so
/// they never interleave.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    table: Arc<Mutex<Table>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> AppResult<Vec<Product>> {
        let table = self.table.lock().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let table = self.table.lock().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn begin(&self) -> AppResult<Box<dyn ProductTx>> {
        let guard = Arc::clone(&self.table).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryProductTx { guard, staged }))
    }
}

pub struct InMemoryProductTx {
    guard: OwnedMutexGuard<Table>,
    staged: Table,
}

#[async_trait]
impl ProductTx for InMemoryProductTx {
    async fn find_by_id(&mut self, id: i64) -> AppResult<Option<Product>> {
        Ok(self.staged.rows.get(&id).cloned())
    }

    async fn exists_by_name_ignore_case(&mut self, name: &str) -> AppResult<bool> {
        Ok(self.staged.name_taken(name, None))
    }

    async fn insert(&mut self, product: &NewProduct) -> AppResult<Product> {
        if self.staged.name_taken(&product.name, None) {
            return Err(Table::unique_violation(&product.name));
        }

        self.staged.last_id += 1;
        let row = Product {
            id: self.staged.last_id,
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
        };
        self.staged.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&mut self, product: &Product) -> AppResult<Product> {
        if !self.staged.rows.contains_key(&product.id) {
            return Err(AppError::not_found(format!("Product not found: id={}", product.id)));
        }
        if self.staged.name_taken(&product.name, Some(product.id)) {
            return Err(Table::unique_violation(&product.name));
        }

        self.staged.rows.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn delete(&mut self, id: i64) -> AppResult<bool> {
        Ok(self.staged.rows.remove(&id).is_some())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let InMemoryProductTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
