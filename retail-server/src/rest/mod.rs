pub mod catalog;
pub mod chat;
pub mod schemas;

pub use chat::ChatController;

use crate::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use retail_runner::Chatbot;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        // Development mode: allow all origins.
        cors.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> =
            config.allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

/// Create the server application.
pub fn create_app(chatbot: Arc<Chatbot>, config: &ServerConfig) -> Router {
    let chat_controller = ChatController::new(chatbot);

    let api_router = Router::new()
        .route("/chat", post(chat::chat))
        .route("/sessions/{session_id}/history", get(chat::session_history))
        .route("/sessions/{session_id}/reset", post(chat::reset_session))
        .route("/sessions/{session_id}", delete(chat::delete_session))
        .with_state(chat_controller)
        .route("/products/search", post(catalog::search_products))
        .route("/products/{product_id}", get(catalog::get_product))
        .route("/orders/track", post(catalog::track_order))
        .route("/orders/{order_id}", get(catalog::get_order))
        .route("/cart/coupon", post(catalog::apply_coupon))
        .route("/cart/{customer_id}", get(catalog::get_cart))
        .route("/cart/{customer_id}/add", post(catalog::add_to_cart))
        .route("/returns", post(catalog::create_return))
        .route("/returns/{return_id}", get(catalog::get_return_status))
        .route("/recommendations/{customer_id}", get(catalog::get_recommendations));

    Router::new()
        .route("/", get(catalog::root))
        .route("/health", get(catalog::health))
        .nest("/api/v1", api_router)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(config)),
        )
}
