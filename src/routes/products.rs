use axum::{routing::get, Router};

use crate::handlers::product::{
    create_product, delete_product, get_product, get_products, update_product,
};
use crate::routes::API_BASE;
use crate::state::AppState;

pub const PRODUCTS: &str = "/products";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(PRODUCTS, get(get_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Value of the Location header for a created product.
pub fn product_location(id: i64) -> String {
    format!("{API_BASE}{PRODUCTS}/{id}")
}
