use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use retail_runner::{Chatbot, Orchestrator};
use retail_server::{ServerConfig, create_app};
use retail_session::{InMemorySessionStore, SessionStore};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::default());
    let orchestrator = Arc::new(Orchestrator::with_agents(retail_agent::default_agents()));
    let chatbot = Arc::new(Chatbot::new(orchestrator, store, 50));
    create_app(chatbot, &ServerConfig::default())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_root_endpoint() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["name"].as_str().unwrap().contains("Retail"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["agents"], "ready");
}

#[tokio::test]
async fn test_chat_product_query() {
    let request = post_json(
        "/api/v1/chat",
        json!({ "message": "Do you have the iPhone 15 Pro?", "customer_id": "TEST-001" }),
    );
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["session_id"].as_str().unwrap().starts_with("SES-"));
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_order_tracking() {
    let request = post_json(
        "/api/v1/chat",
        json!({ "message": "Where is my order #12345?", "customer_id": "TEST-001" }),
    );
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["intent"], "order_status");
    assert_eq!(body["agent"], "OrderAgent");
    assert_eq!(body["data"]["order_id"], "12345");
}

#[tokio::test]
async fn test_chat_session_continuity() {
    let app = test_app();

    let first = app
        .clone()
        .oneshot(post_json("/api/v1/chat", json!({ "message": "hello", "customer_id": "C1" })))
        .await
        .unwrap();
    let first_body = body_json(first).await;
    let session_id = first_body["session_id"].as_str().unwrap().to_string();

    let second = app
        .oneshot(post_json(
            "/api/v1/chat",
            json!({ "message": "track my order", "session_id": session_id, "customer_id": "C1" }),
        ))
        .await
        .unwrap();
    let second_body = body_json(second).await;
    assert_eq!(second_body["session_id"], session_id.as_str());
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let request = post_json("/api/v1/chat", json!({ "message": "   " }));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_history_endpoint() {
    let app = test_app();

    let chat = app
        .clone()
        .oneshot(post_json("/api/v1/chat", json!({ "message": "hi there", "customer_id": "C2" })))
        .await
        .unwrap();
    let session_id =
        body_json(chat).await["session_id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(get(&format!("/api/v1/sessions/{session_id}/history")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["history"].as_array().unwrap().len(), 2);
    assert_eq!(body["history"][0]["role"], "user");
}

#[tokio::test]
async fn test_delete_session() {
    let app = test_app();

    let chat = app
        .clone()
        .oneshot(post_json("/api/v1/chat", json!({ "message": "hello", "customer_id": "C3" })))
        .await
        .unwrap();
    let session_id =
        body_json(chat).await["session_id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/sessions/{session_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/sessions/{session_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_products() {
    let request = post_json("/api/v1/products/search", json!({ "query": "iPhone" }));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total_results"], 1);
    assert_eq!(body["products"][0]["id"], "PROD-001");
}

#[tokio::test]
async fn test_get_product_details() {
    let response = test_app().oneshot(get("/api/v1/products/PROD-001")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], "PROD-001");
    assert!(body["variants"].is_array());
}

#[tokio::test]
async fn test_track_order() {
    let request = post_json("/api/v1/orders/track", json!({ "order_id": "ORD-12345" }));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["order_id"], "ORD-12345");
    assert_eq!(body["status"], "in_transit");
}

#[tokio::test]
async fn test_get_cart() {
    let response = test_app().oneshot(get("/api/v1/cart/CUST-001")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["cart_id"], "CART-CUST-001");
    assert_eq!(body["total"], 1186.92);
}

#[tokio::test]
async fn test_apply_valid_coupon() {
    let request =
        post_json("/api/v1/cart/coupon", json!({ "cart_id": "CART-001", "coupon_code": "SAVE10" }));
    let response = test_app().oneshot(request).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["discount"], 109.90);
}

#[tokio::test]
async fn test_apply_invalid_coupon() {
    let request = post_json(
        "/api/v1/cart/coupon",
        json!({ "cart_id": "CART-001", "coupon_code": "INVALID" }),
    );
    let response = test_app().oneshot(request).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn test_create_return() {
    let request = post_json(
        "/api/v1/returns",
        json!({ "order_id": "ORD-12345", "reason": "Changed my mind" }),
    );
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["return_id"].as_str().unwrap().starts_with("RET-"));
    assert_eq!(body["order_id"], "ORD-12345");
    assert_eq!(body["status"], "initiated");
}
