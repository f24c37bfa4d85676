use crate::{FunctionTool, context_customer_id};
use async_trait::async_trait;
use retail_core::{Agent, AgentResult, Result, RetailError, Tool};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;

const AGENT_NAME: &str = "RecommendationAgent";

/// Provides personalized product recommendations: similar items,
/// cross-sells, and trending products.
pub struct RecommendationAgent {
    tools: Vec<Arc<dyn Tool>>,
}

impl RecommendationAgent {
    pub fn new() -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(FunctionTool::new(
                "get_similar_products",
                "Get products similar to a given product",
                get_similar_products,
            )),
            Arc::new(FunctionTool::new(
                "get_personalized_recommendations",
                "Get personalized recommendations for a customer",
                get_personalized_recommendations,
            )),
            Arc::new(FunctionTool::new(
                "get_cross_sell_items",
                "Get cross-sell suggestions based on the cart",
                get_cross_sell_items,
            )),
            Arc::new(FunctionTool::new(
                "get_trending_products",
                "Get currently trending products",
                get_trending_products,
            )),
        ];
        Self { tools }
    }

    fn select_tool(task: &str) -> &'static str {
        let lowered = task.to_lowercase();
        if lowered.contains("trending") || lowered.contains("popular") {
            "get_trending_products"
        } else if ["goes with", "bundle", "cart"].iter().any(|kw| lowered.contains(kw)) {
            "get_cross_sell_items"
        } else if ["similar", "like this", "alternative"].iter().any(|kw| lowered.contains(kw)) {
            "get_similar_products"
        } else {
            "get_personalized_recommendations"
        }
    }
}

impl Default for RecommendationAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for RecommendationAgent {
    fn name(&self) -> &str {
        AGENT_NAME
    }

    fn description(&self) -> &str {
        "Provides personalized product recommendations"
    }

    async fn execute(&self, task: &str, context: Option<&Value>) -> Result<AgentResult> {
        let started = Instant::now();
        let tool_name = Self::select_tool(task);
        tracing::info!(agent = AGENT_NAME, tool = tool_name, "executing task");

        let args = match tool_name {
            "get_personalized_recommendations" => {
                json!({ "customer_id": context_customer_id(context) })
            }
            "get_cross_sell_items" => json!({ "cart_items": "PROD-001" }),
            _ => json!({ "product_id": "PROD-001" }),
        };

        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == tool_name)
            .ok_or_else(|| RetailError::Tool(format!("unknown tool: {tool_name}")))?;
        let data = tool.execute(args).await?;

        let message = match tool_name {
            "get_trending_products" => "Here's what's trending right now.".to_string(),
            "get_cross_sell_items" => {
                "These go great with what's already in your cart.".to_string()
            }
            "get_similar_products" => "Here are a few similar options you might like.".to_string(),
            _ => "Based on your history, I think you'll like these.".to_string(),
        };

        Ok(AgentResult::success(AGENT_NAME, message, data)
            .with_execution_time(started.elapsed().as_secs_f64()))
    }
}

fn get_similar_products(args: Value) -> Result<Value> {
    let product_id = args["product_id"].as_str().unwrap_or("PROD-001");

    Ok(json!({
        "product_id": product_id,
        "similar_products": [
            { "id": "PROD-002", "name": "Samsung Galaxy S24 Ultra", "price": 1199.00, "match_score": 0.92 },
            { "id": "PROD-003", "name": "Google Pixel 8 Pro", "price": 999.00, "match_score": 0.88 },
            { "id": "PROD-004", "name": "OnePlus 12", "price": 799.00, "match_score": 0.85 }
        ]
    }))
}

fn get_personalized_recommendations(args: Value) -> Result<Value> {
    let customer_id = args["customer_id"].as_str().unwrap_or("anonymous");

    Ok(json!({
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
            },
            {
                "id": "PROD-012",
                "name": "iPhone 15 Pro Case",
                "price": 49.00,
                "reason": "Protect your new phone"
            }
        ],
        "based_on": ["purchase_history", "browsing_behavior", "similar_customers"]
    }))
}

fn get_cross_sell_items(args: Value) -> Result<Value> {
    let cart_items: Vec<&str> =
        args["cart_items"].as_str().unwrap_or_default().split(',').collect();

    Ok(json!({
        "cart_items": cart_items,
        "cross_sell": [
            {
                "id": "PROD-020",
                "name": "AppleCare+ for iPhone",
                "price": 199.00,
                "savings": "Save 20% when bought with iPhone"
            },
            {
                "id": "PROD-021",
                "name": "Lightning to USB-C Cable",
                "price": 19.00,
                "reason": "Essential accessory"
            }
        ]
    }))
}

fn get_trending_products(args: Value) -> Result<Value> {
    let category = args["category"].as_str().unwrap_or("all");

    Ok(json!({
        "category": category,
        "trending": [
            { "id": "PROD-001", "name": "iPhone 15 Pro", "sales_trend": "+45%", "rank": 1 },
            { "id": "PROD-030", "name": "PS5 Slim", "sales_trend": "+38%", "rank": 2 },
            { "id": "PROD-031", "name": "Stanley Tumbler", "sales_trend": "+120%", "rank": 3 }
        ],
        "period": "last_7_days"
    }))
}
