use crate::FunctionTool;
use async_trait::async_trait;
use retail_core::{Agent, AgentResult, Result, RetailError, Tool, extract_entities};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;

const AGENT_NAME: &str = "ProductAgent";

/// Handles product searches, details, availability checks, and
/// comparisons. Also the fallback target for general inquiries.
pub struct ProductAgent {
    tools: Vec<Arc<dyn Tool>>,
}

impl ProductAgent {
    pub fn new() -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(FunctionTool::new(
                "search_products",
                "Search for products matching a query",
                search_products,
            )),
            Arc::new(FunctionTool::new(
                "get_product_details",
                "Get detailed information about a product",
                get_product_details,
            )),
            Arc::new(FunctionTool::new(
                "check_inventory",
                "Check product inventory and availability",
                check_inventory,
            )),
            Arc::new(FunctionTool::new(
                "compare_products",
                "Compare multiple products",
                compare_products,
            )),
        ];
        Self { tools }
    }

    fn select_tool(task: &str) -> &'static str {
        let lowered = task.to_lowercase();
        if lowered.contains("compare") {
            "compare_products"
        } else if ["stock", "available", "availability", "inventory"]
            .iter()
            .any(|kw| lowered.contains(kw))
        {
            "check_inventory"
        } else if lowered.contains("spec") || lowered.contains("detail") {
            "get_product_details"
        } else {
            "search_products"
        }
    }

    fn build_args(tool: &str, task: &str) -> Value {
        match tool {
            "search_products" => json!({ "query": task }),
            "check_inventory" => {
                let entities = extract_entities(task);
                json!({ "product_id": "PROD-001", "variant": entities.color })
            }
            "compare_products" => json!({ "product_ids": "PROD-001,PROD-002" }),
            _ => json!({ "product_id": "PROD-001" }),
        }
    }

    fn summarize(tool: &str, data: &Value) -> String {
        match tool {
            "search_products" => {
                let total = data["total_results"].as_u64().unwrap_or(0);
                if total == 0 {
                    "I couldn't find any products matching that. Could you try different \
                     keywords?"
                        .to_string()
                } else {
                    format!("I found {total} product(s) that might be what you're looking for.")
                }
            }
            "get_product_details" => {
                let name = data["name"].as_str().unwrap_or("that product");
                format!("Here are the details for {name}.")
            }
            "check_inventory" => {
                if data["in_stock"].as_bool().unwrap_or(false) {
                    let quantity = data["quantity"].as_u64().unwrap_or(0);
                    format!("Good news: it's in stock ({quantity} available).")
                } else {
                    "I'm sorry, that item is currently out of stock.".to_string()
                }
            }
            _ => "Here's a side-by-side comparison of those products.".to_string(),
        }
    }
}

impl Default for ProductAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for ProductAgent {
    fn name(&self) -> &str {
        AGENT_NAME
    }

    fn description(&self) -> &str {
        "Handles product queries, searches, and information"
    }

    async fn execute(&self, task: &str, _context: Option<&Value>) -> Result<AgentResult> {
        let started = Instant::now();
        let tool_name = Self::select_tool(task);
        tracing::info!(agent = AGENT_NAME, tool = tool_name, "executing task");

        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == tool_name)
            .ok_or_else(|| RetailError::Tool(format!("unknown tool: {tool_name}")))?;
        let data = tool.execute(Self::build_args(tool_name, task)).await?;
        let message = Self::summarize(tool_name, &data);

        Ok(AgentResult::success(AGENT_NAME, message, data)
            .with_execution_time(started.elapsed().as_secs_f64()))
    }
}

fn catalog() -> Vec<Value> {
    vec![
        json!({
            "id": "PROD-001",
            "name": "iPhone 15 Pro - Blue Titanium",
            "category": "Electronics",
            "price": 999.00,
            "variants": [
                { "storage": "128GB", "price": 999.00, "stock": 15 },
                { "storage": "256GB", "price": 1099.00, "stock": 8 },
                { "storage": "512GB", "price": 1299.00, "stock": 2 },
                { "storage": "1TB", "price": 1499.00, "stock": 5 }
            ],
            "in_stock": true,
            "rating": 4.8,
            "reviews": 1250
        }),
        json!({
            "id": "PROD-002",
            "name": "Samsung Galaxy S24 Ultra",
            "category": "Electronics",
            "price": 1199.00,
            "variants": [
                { "storage": "256GB", "price": 1199.00, "stock": 20 },
                { "storage": "512GB", "price": 1399.00, "stock": 12 }
            ],
            "in_stock": true,
            "rating": 4.7,
            "reviews": 890
        }),
        json!({
            "id": "PROD-003",
            "name": "Nike Air Max 270 - Running Shoes",
            "category": "Footwear",
            "price": 150.00,
            "sizes": [7, 8, 9, 10, 11, 12],
            "colors": ["Black", "White", "Red"],
            "in_stock": true,
            "rating": 4.5,
            "reviews": 2340
        }),
    ]
}

// Matches term-wise rather than on the raw query string: the query here is
// the customer's whole message, not a cleaned-up search phrase.
fn search_products(args: Value) -> Result<Value> {
    let query = args["query"].as_str().unwrap_or_default();
    let max_price = args["max_price"].as_f64().unwrap_or(0.0);

    let terms: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric()).to_string())
        .filter(|t| t.len() > 2)
        .collect();

    let mut results: Vec<Value> = catalog()
        .into_iter()
        .filter(|p| {
            let name = p["name"].as_str().unwrap_or_default().to_lowercase();
            terms.is_empty() || terms.iter().any(|t| name.contains(t.as_str()))
        })
        .collect();

    if max_price > 0.0 {
        results.retain(|p| p["price"].as_f64().unwrap_or(0.0) <= max_price);
    }
    let total_results = results.len();

    Ok(json!({
        "query": query,
        "products": results,
        "total_results": total_results
    }))
}

fn get_product_details(args: Value) -> Result<Value> {
    let product_id = args["product_id"].as_str().unwrap_or("PROD-001");

    Ok(json!({
        "id": product_id,
        "name": "iPhone 15 Pro - Blue Titanium",
        "description": "The most advanced iPhone ever with A17 Pro chip.",
        "category": "Electronics",
        "brand": "Apple",
        "price": 999.00,
        "specs": {
            "display": "6.1-inch Super Retina XDR",
            "chip": "A17 Pro",
            "camera": "48MP main camera",
            "battery": "Up to 29 hours video playback"
        },
        "variants": [
            { "storage": "128GB", "price": 999.00 },
            { "storage": "256GB", "price": 1099.00 },
            { "storage": "512GB", "price": 1299.00 },
            { "storage": "1TB", "price": 1499.00 }
        ],
        "colors": ["Blue Titanium", "Black Titanium", "White Titanium", "Natural Titanium"],
        "in_stock": true,
        "rating": 4.8,
        "reviews_count": 1250
    }))
}

fn check_inventory(args: Value) -> Result<Value> {
    let product_id = args["product_id"].as_str().unwrap_or("PROD-001");
    let variant = args["variant"].as_str().unwrap_or_default();

    Ok(json!({
        "product_id": product_id,
        "variant": variant,
        "in_stock": true,
        "quantity": 15,
        "low_stock_threshold": 5,
        "is_low_stock": false,
        "restock_date": null,
        "stores_with_stock": ["Main Warehouse", "Store NYC", "Store LA"]
    }))
}

fn compare_products(args: Value) -> Result<Value> {
    let product_ids = args["product_ids"].as_str().unwrap_or_default();
    let ids: Vec<&str> = product_ids.split(',').filter(|s| !s.is_empty()).collect();

    Ok(json!({
        "requested": ids,
        "products": [
            { "id": "PROD-001", "name": "iPhone 15 Pro", "price": 999, "rating": 4.8 },
            { "id": "PROD-002", "name": "Samsung Galaxy S24", "price": 1199, "rating": 4.7 }
        ],
        "comparison_attributes": {
            "display": { "PROD-001": "6.1 inch", "PROD-002": "6.8 inch" },
            "camera": { "PROD-001": "48MP", "PROD-002": "200MP" },
            "battery": { "PROD-001": "3274 mAh", "PROD-002": "5000 mAh" }
        }
    }))
}
