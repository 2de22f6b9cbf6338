//! Product storage.
//!
//! Reads that do not guard a write go straight through [`ProductRepository`].
//! Everything that must see a consistent view together with a write runs on a
//! [`ProductTx`] obtained from [`ProductRepository::begin`]. Dropping a
//! transaction without calling [`ProductTx::commit`] discards its changes.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::dtos::product::NewProduct;
use crate::error::AppResult;
use crate::models::product::Product;

pub use memory::InMemoryProductRepository;
pub use postgres::PgProductRepository;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, ordered by id.
    async fn find_all(&self) -> AppResult<Vec<Product>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>>;

    async fn begin(&self) -> AppResult<Box<dyn ProductTx>>;
}

#[async_trait]
pub trait ProductTx: Send {
    async fn find_by_id(&mut self, id: i64) -> AppResult<Option<Product>>;

    /// True when any product's name equals `name` after lower-casing both.
    async fn exists_by_name_ignore_case(&mut self, name: &str) -> AppResult<bool>;

    /// Inserts a row and returns it with its generated id.
    async fn insert(&mut self, product: &NewProduct) -> AppResult<Product>;

    /// Overwrites name, price and stock of an existing row.
    async fn update(&mut self, product: &Product) -> AppResult<Product>;

    /// Returns false when no row had this id.
    async fn delete(&mut self, id: i64) -> AppResult<bool>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}
