pub mod products;

use std::any::Any;

use axum::{
    http::Uri,
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::error_path::attach_request_path;
use crate::state::AppState;

pub const API_BASE: &str = "/api/v1";

pub fn create_router() -> Router<AppState> {
    Router::new().merge(products::routes())
}

/// Full application: API under [`API_BASE`], health check, and the
/// middleware every response passes through.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .nest(API_BASE, create_router())
        .route("/health", get(health_check))
        .fallback(route_not_found);

    with_error_handling(router)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Panics become 500s, and every failing response gets the uniform body.
pub fn with_error_handling<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(attach_request_path))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::internal(format!("Unexpected failure: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use axum::{body::Body, http::{Request, StatusCode}};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn explodes() -> &'static str {
        panic!("stock ledger corrupted")
    }

    #[tokio::test]
    async fn panic_in_handler_returns_500_payload() {
        let app = with_error_handling(Router::new().route("/boom", get(explodes)));

        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, 500);
        assert_eq!(body.error, "Internal Server Error");
        assert_eq!(body.message, "Unexpected failure: stock ledger corrupted");
        assert_eq!(body.path, "/boom");
    }
}
