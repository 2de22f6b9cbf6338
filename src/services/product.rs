// src/services/product.rs
use std::sync::Arc;

use tracing::{info, warn};

use crate::dtos::product::NewProduct;
use crate::error::{AppError, AppResult};
use crate::models::product::Product;
use crate::repository::ProductRepository;

const DUPLICATE_NAME: &str = "A product with this name already exists.";

fn not_found(id: i64) -> AppError {
    AppError::not_found(format!("Product not found: id={id}"))
}

/// Product business rules. Each mutation runs its checks and its write in
/// one storage transaction.
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: impl ProductRepository + 'static) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Product>> {
        self.repository.find_all().await
    }

    pub async fn get(&self, id: i64) -> AppResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: NewProduct) -> AppResult<Product> {
        let mut tx = self.repository.begin().await?;

        if tx.exists_by_name_ignore_case(&input.name).await? {
            warn!(name = %input.name, "Rejected duplicate product name");
            return Err(AppError::conflict(DUPLICATE_NAME));
        }

        let product = tx.insert(&input).await?;
        tx.commit().await?;

        info!(product_id = product.id, name = %product.name, "Created product");
        Ok(product)
    }

    pub async fn update(&self, id: i64, input: NewProduct) -> AppResult<Product> {
        let mut tx = self.repository.begin().await?;

        let mut product = tx.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

        let renamed = product.name.to_lowercase() != input.name.to_lowercase();
        if renamed && tx.exists_by_name_ignore_case(&input.name).await? {
            warn!(product_id = id, name = %input.name, "Rejected duplicate product name");
            return Err(AppError::conflict(DUPLICATE_NAME));
        }

        product.name = input.name;
        product.price = input.price;
        product.stock = input.stock;

        let product = tx.update(&product).await?;
        tx.commit().await?;

        info!(product_id = id, "Updated product");
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;

        if tx.find_by_id(id).await?.is_none() {
            return Err(not_found(id));
        }
        tx.delete(id).await?;
        tx.commit().await?;

        info!(product_id = id, "Deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryProductRepository, ProductTx};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn input(name: &str, cents: i64, stock: i32) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            stock,
        }
    }

    fn service() -> ProductService {
        ProductService::new(InMemoryProductRepository::new())
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let service = service();

        let created = service.create(input("Widget", 999, 5)).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.price, Decimal::new(999, 2));
        assert_eq!(fetched.stock, 5);
    }

    #[tokio::test]
    async fn create_rejects_name_in_any_casing() {
        let service = service();
        service.create(input("Widget", 999, 5)).await.unwrap();

        for name in ["Widget", "widget", "WIDGET", "wIdGeT"] {
            let err = service.create(input(name, 100, 1)).await.unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)), "{name} should conflict");
        }
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_id() {
        let service = service();
        let created = service.create(input("Widget", 999, 5)).await.unwrap();

        let updated = service
            .update(created.id, input("Widget Pro", 1099, 7))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Widget Pro");
        assert_eq!(updated.price, Decimal::new(1099, 2));
        assert_eq!(updated.stock, 7);
        assert_eq!(service.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_rejects_another_products_name() {
        let service = service();
        service.create(input("Widget", 999, 5)).await.unwrap();
        let gadget = service.create(input("Gadget", 500, 1)).await.unwrap();

        let err = service
            .update(gadget.id, input("WIDGET", 500, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(service.get(gadget.id).await.unwrap().name, "Gadget");
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let err = service().update(42, input("Widget", 1, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Product not found: id=42"));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let service = service();
        let created = service.create(input("Widget", 999, 5)).await.unwrap();

        service.delete(created.id).await.unwrap();

        assert!(matches!(service.get(created.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(created.id).await, Err(AppError::NotFound(_))));
    }

    /// Wraps the in-memory store and counts uniqueness queries.
    struct CountingRepository {
        inner: InMemoryProductRepository,
        name_checks: Arc<AtomicUsize>,
    }

    struct CountingTx {
        inner: Box<dyn ProductTx>,
        name_checks: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProductRepository for CountingRepository {
        async fn find_all(&self) -> AppResult<Vec<Product>> {
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
            self.inner.find_by_id(id).await
        }

        async fn begin(&self) -> AppResult<Box<dyn ProductTx>> {
            Ok(Box::new(CountingTx {
                inner: self.inner.begin().await?,
                name_checks: Arc::clone(&self.name_checks),
            }))
        }
    }

    #[async_trait]
    impl ProductTx for CountingTx {
        async fn find_by_id(&mut self, id: i64) -> AppResult<Option<Product>> {
            self.inner.find_by_id(id).await
        }

        async fn exists_by_name_ignore_case(&mut self, name: &str) -> AppResult<bool> {
            self.name_checks.fetch_add(1, Ordering::SeqCst);
            self.inner.exists_by_name_ignore_case(name).await
        }

        async fn insert(&mut self, product: &NewProduct) -> AppResult<Product> {
            self.inner.insert(product).await
        }

        async fn update(&mut self, product: &Product) -> AppResult<Product> {
            self.inner.update(product).await
        }

        async fn delete(&mut self, id: i64) -> AppResult<bool> {
            self.inner.delete(id).await
        }

        async fn commit(self: Box<Self>) -> AppResult<()> {
            self.inner.commit().await
        }
    }

    #[tokio::test]
    async fn update_with_unchanged_name_skips_uniqueness_check() {
        let name_checks = Arc::new(AtomicUsize::new(0));
        let service = ProductService::new(CountingRepository {
            inner: InMemoryProductRepository::new(),
            name_checks: Arc::clone(&name_checks),
        });

        let created = service.create(input("Widget", 999, 5)).await.unwrap();
        assert_eq!(name_checks.load(Ordering::SeqCst), 1);

        service.update(created.id, input("Widget", 1099, 5)).await.unwrap();
        service.update(created.id, input("WIDGET", 1099, 5)).await.unwrap();
        assert_eq!(name_checks.load(Ordering::SeqCst), 1);

        service.update(created.id, input("Gizmo", 1099, 5)).await.unwrap();
        assert_eq!(name_checks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_create_leaves_store_untouched() {
        let repo = InMemoryProductRepository::new();
        let service = ProductService::new(repo.clone());
        service.create(input("Widget", 999, 5)).await.unwrap();

        let _ = service.create(input("widget", 100, 1)).await;

        // The aborted transaction released the lock and wrote nothing.
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Widget");
    }
}
