use chrono::{DateTime, Utc};
use retail_runner::ChatOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_customer_id() -> String {
    "anonymous".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
    #[serde(default = "default_customer_id")]
    pub customer_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatOutcome> for ChatResponse {
    fn from(outcome: ChatOutcome) -> Self {
        let response = outcome.response;
        Self {
            success: response.success,
            message: response.message,
            session_id: outcome.session_id,
            data: response.data,
            intent: response.intent.map(|intent| intent.as_str().to_string()),
            agent: response.agent,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductSearchRequest {
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default = "default_true")]
    pub in_stock_only: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct ProductInfo {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ProductSearchResponse {
    pub query: String,
    pub products: Vec<ProductInfo>,
    pub total_results: usize,
}

#[derive(Debug, Deserialize)]
pub struct OrderTrackRequest {
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub order_id: String,
    pub status: String,
    pub status_display: String,
    pub carrier: String,
    pub tracking_number: String,
    pub estimated_delivery: String,
    pub last_update: String,
}

#[derive(Debug, Serialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart_id: String,
    pub items: Vec<CartItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Deserialize)]
pub struct CouponRequest {
    pub cart_id: String,
    pub coupon_code: String,
}

#[derive(Debug, Serialize)]
pub struct CouponResponse {
    pub valid: bool,
    pub coupon_code: String,
    pub discount: f64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ReturnCreateRequest {
    pub order_id: String,
    pub reason: String,
    #[serde(default = "default_items")]
    pub items: String,
}

fn default_items() -> String {
    "all".to_string()
}

#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    pub return_id: String,
    pub order_id: String,
    pub status: String,
    pub return_label_url: String,
    pub refund_estimate: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub services: std::collections::HashMap<String, String>,
}
