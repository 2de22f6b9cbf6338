use sqlx::PgPool;

use crate::repository::{PgProductRepository, ProductRepository};
use crate::services::product::ProductService;

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
}

impl AppState {
    pub fn new(db_pool: PgPool) -> Self {
        Self::with_repository(PgProductRepository::new(db_pool))
    }

    pub fn with_repository(repository: impl ProductRepository + 'static) -> Self {
        Self {
            products: ProductService::new(repository),
        }
    }
}
