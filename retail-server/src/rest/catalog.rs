//! Thin demo endpoints that bypass the agent core and answer with fixed
//! example data, mirroring the chatbot's mock backends.

use crate::rest::schemas::{
    CartItem, CartResponse, CouponRequest, CouponResponse, HealthResponse, OrderStatusResponse,
    OrderTrackRequest, ProductInfo, ProductSearchRequest, ProductSearchResponse,
    ReturnCreateRequest, ReturnResponse,
};
use axum::{
    Json,
    extract::{Path, Query},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Retail Order Query Chatbot",
        "version": VERSION,
        "description": "Multi-agent retail customer service chatbot",
        "docs": "/docs"
    }))
}

pub async fn health() -> Json<HealthResponse> {
    let services = [("api", "running"), ("agents", "ready"), ("sessions", "ready")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        timestamp: Utc::now(),
        services,
    })
}

fn demo_products() -> Vec<ProductInfo> {
    vec![
        ProductInfo {
            id: "PROD-001".to_string(),
            name: "iPhone 15 Pro - Blue Titanium".to_string(),
            price: 999.00,
            in_stock: true,
            rating: Some(4.8),
        },
        ProductInfo {
            id: "PROD-002".to_string(),
            name: "Samsung Galaxy S24 Ultra".to_string(),
            price: 1199.00,
            in_stock: true,
            rating: Some(4.7),
        },
    ]
}

pub async fn search_products(
    Json(request): Json<ProductSearchRequest>,
) -> Json<ProductSearchResponse> {
    let query_lower = request.query.to_lowercase();
    let mut products: Vec<ProductInfo> = demo_products()
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&query_lower))
        .collect();

    if let Some(max_price) = request.max_price {
        products.retain(|p| p.price <= max_price);
    }
    if request.in_stock_only {
        products.retain(|p| p.in_stock);
    }

    let total_results = products.len();
    Json(ProductSearchResponse { query: request.query, products, total_results })
}

pub async fn get_product(Path(product_id): Path<String>) -> Json<Value> {
    Json(json!({
        "id": product_id,
        "name": "iPhone 15 Pro - Blue Titanium",
        "description": "The most advanced iPhone ever.",
        "price": 999.00,
        "in_stock": true,
        "variants": [
            { "storage": "128GB", "price": 999.00 },
            { "storage": "256GB", "price": 1099.00 }
        ],
        "rating": 4.8,
        "reviews_count": 1250
    }))
}

pub async fn track_order(Json(request): Json<OrderTrackRequest>) -> Json<OrderStatusResponse> {
    Json(OrderStatusResponse {
        order_id: request.order_id,
        status: "in_transit".to_string(),
        status_display: "In Transit 🚚".to_string(),
        carrier: "FedEx".to_string(),
        tracking_number: "7894561230123".to_string(),
        estimated_delivery: "Jan 7, 2024".to_string(),
        last_update: "Package departed Memphis, TN".to_string(),
    })
}

pub async fn get_order(Path(order_id): Path<String>) -> Json<Value> {
    Json(json!({
        "order_id": order_id,
        "status": "in_transit",
        "order_date": "2024-01-03",
        "items": [
            { "name": "iPhone 15 Pro - Blue", "quantity": 1, "price": 999.00 }
        ],
        "subtotal": 999.00,
        "tax": 79.92,
        "total": 1078.92
    }))
}

pub async fn get_cart(Path(customer_id): Path<String>) -> Json<CartResponse> {
    Json(CartResponse {
        cart_id: format!("CART-{customer_id}"),
        items: vec![CartItem {
            product_id: "PROD-001".to_string(),
            name: "iPhone 15 Pro - Blue 256GB".to_string(),
            price: 1099.00,
            quantity: 1,
        }],
        subtotal: 1099.00,
        tax: 87.92,
        shipping: 0.00,
        discount: 0.00,
        total: 1186.92,
    })
}

#[derive(Deserialize)]
pub struct AddToCartParams {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

pub async fn add_to_cart(
    Path(customer_id): Path<String>,
    Query(params): Query<AddToCartParams>,
) -> Json<Value> {
    tracing::info!(
        customer_id = %customer_id,
        product_id = %params.product_id,
        quantity = params.quantity,
        "adding item to cart"
    );
    Json(json!({
        "success": true,
        "message": "Item added to cart!",
        "cart_total": 1186.92
    }))
}

const VALID_COUPONS: &[&str] = &["SAVE10", "FREESHIP", "WELCOME20"];

pub async fn apply_coupon(Json(request): Json<CouponRequest>) -> Json<CouponResponse> {
    let code = request.coupon_code.to_uppercase();
    if VALID_COUPONS.contains(&code.as_str()) {
        Json(CouponResponse {
            valid: true,
            coupon_code: code,
            discount: 109.90,
            message: format!("Coupon {} applied! You saved $109.90", request.coupon_code),
        })
    } else {
        Json(CouponResponse {
            valid: false,
            coupon_code: request.coupon_code,
            discount: 0.0,
            message: "Invalid or expired coupon code".to_string(),
        })
    }
}

pub async fn create_return(Json(request): Json<ReturnCreateRequest>) -> Json<ReturnResponse> {
    let hex = Uuid::new_v4().simple().to_string();
    let return_id = format!("RET-{}", hex[..8].to_uppercase());
    tracing::info!(order_id = %request.order_id, reason = %request.reason, "return initiated");

    Json(ReturnResponse {
        return_label_url: format!("https://returns.example.com/{return_id}"),
        return_id,
        order_id: request.order_id,
        status: "initiated".to_string(),
        refund_estimate: "3-5 business days after receipt".to_string(),
    })
}

pub async fn get_return_status(Path(return_id): Path<String>) -> Json<Value> {
    Json(json!({
        "return_id": return_id,
        "status": "in_transit",
        "refund_amount": 999.00,
        "estimated_refund_date": "Jan 15, 2024"
    }))
}

pub async fn get_recommendations(Path(customer_id): Path<String>) -> Json<Value> {
    Json(json!({
        "customer_id": customer_id,
        "recommendations": [
            {
                "id": "PROD-010",
                "name": "AirPods Pro 2",
                "price": 249.00,
                "reason": "Based on your iPhone purchase"
            },
            {
                "id": "PROD-011",
                "name": "MagSafe Charger",
                "price": 39.00,
                "reason": "Popular with iPhone users"
            }
        ]
    }))
}
