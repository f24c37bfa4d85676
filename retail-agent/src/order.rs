use crate::{FunctionTool, context_customer_id};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use retail_core::{Agent, AgentResult, Result, RetailError, Tool, extract_entities};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;

const AGENT_NAME: &str = "OrderAgent";

/// Handles order tracking, status inquiries, and shipping updates.
pub struct OrderAgent {
    tools: Vec<Arc<dyn Tool>>,
}

impl OrderAgent {
    pub fn new() -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(FunctionTool::new("track_order", "Track an order by order id", track_order)),
            Arc::new(FunctionTool::new(
                "get_order_details",
                "Get complete order details",
                get_order_details,
            )),
            Arc::new(FunctionTool::new(
                "get_customer_orders",
                "Get all orders for a customer",
                get_customer_orders,
            )),
            Arc::new(FunctionTool::new(
                "estimate_delivery",
                "Get the estimated delivery date for an order",
                estimate_delivery,
            )),
            Arc::new(FunctionTool::new(
                "request_delivery_update",
                "Subscribe to delivery notifications",
                request_delivery_update,
            )),
        ];
        Self { tools }
    }

    fn select_tool(task: &str) -> &'static str {
        let lowered = task.to_lowercase();
        if ["my orders", "order history", "all my orders"].iter().any(|kw| lowered.contains(kw)) {
            "get_customer_orders"
        } else if ["notify", "notification", "alert"].iter().any(|kw| lowered.contains(kw)) {
            "request_delivery_update"
        } else if ["when will", "estimate", "how long"].iter().any(|kw| lowered.contains(kw)) {
            "estimate_delivery"
        } else if ["detail", "receipt", "total"].iter().any(|kw| lowered.contains(kw)) {
            "get_order_details"
        } else {
            "track_order"
        }
    }

    fn summarize(tool: &str, data: &Value) -> String {
        match tool {
            "track_order" => {
                let order_id = data["order_id"].as_str().unwrap_or("your order");
                let carrier = data["carrier"].as_str().unwrap_or("the carrier");
                let eta = data["estimated_delivery"].as_str().unwrap_or("soon");
                format!(
                    "Order {order_id} is in transit with {carrier} and should arrive by {eta}."
                )
            }
            "get_order_details" => {
                let order_id = data["order_id"].as_str().unwrap_or("your order");
                format!("Here's everything on order {order_id}.")
            }
            "get_customer_orders" => {
                let total = data["total_orders"].as_u64().unwrap_or(0);
                format!("You have {total} recent order(s).")
            }
            "estimate_delivery" => {
                let eta = data["estimated_delivery"].as_str().unwrap_or("soon");
                format!("Your order is estimated to arrive on {eta}.")
            }
            _ => "You're all set. We'll send delivery updates as your package moves.".to_string(),
        }
    }
}

impl Default for OrderAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for OrderAgent {
    fn name(&self) -> &str {
        AGENT_NAME
    }

    fn description(&self) -> &str {
        "Handles order tracking and status inquiries"
    }

    async fn execute(&self, task: &str, context: Option<&Value>) -> Result<AgentResult> {
        let started = Instant::now();
        let tool_name = Self::select_tool(task);
        tracing::info!(agent = AGENT_NAME, tool = tool_name, "executing task");

        let order_id = extract_entities(task).order_id.unwrap_or_else(|| "ORD-12345".to_string());
        let args = match tool_name {
            "get_customer_orders" => json!({ "customer_id": context_customer_id(context) }),
            _ => json!({ "order_id": order_id }),
        };

        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == tool_name)
            .ok_or_else(|| RetailError::Tool(format!("unknown tool: {tool_name}")))?;
        let data = tool.execute(args).await?;
        let message = Self::summarize(tool_name, &data);

        Ok(AgentResult::success(AGENT_NAME, message, data)
            .with_execution_time(started.elapsed().as_secs_f64()))
    }
}

fn track_order(args: Value) -> Result<Value> {
    let order_id = args["order_id"].as_str().unwrap_or("ORD-12345");

    Ok(json!({
        "order_id": order_id,
        "status": "in_transit",
        "status_display": "In Transit 🚚",
        "ordered_date": "2024-01-03",
        "shipped_date": "2024-01-04",
        "carrier": "FedEx",
        "tracking_number": "7894561230123",
        "estimated_delivery": "2024-01-07",
        "latest_update": {
            "timestamp": "2024-01-05 14:30",
            "location": "Memphis, TN",
            "status": "Package departed - On the way to destination"
        },
        "tracking_history": [
            { "date": "2024-01-04", "status": "Shipped", "location": "Warehouse" },
            { "date": "2024-01-04", "status": "In Transit", "location": "Chicago, IL" },
            { "date": "2024-01-05", "status": "In Transit", "location": "Memphis, TN" }
        ],
        "items": [
            { "name": "iPhone 15 Pro - Blue", "quantity": 1, "price": 999.00 }
        ]
    }))
}

fn get_order_details(args: Value) -> Result<Value> {
    let order_id = args["order_id"].as_str().unwrap_or("ORD-12345");

    Ok(json!({
        "order_id": order_id,
        "customer_id": "CUST-12345",
        "status": "processing",
        "order_date": "2024-01-03",
        "items": [
            {
                "name": "iPhone 15 Pro - Blue",
                "sku": "IPH15P-BL-256",
                "quantity": 1,
                "price": 1099.00
            }
        ],
        "subtotal": 1099.00,
        "tax": 87.92,
        "shipping": 0.00,
        "total": 1186.92,
        "shipping_address": {
            "name": "John Doe",
            "street": "123 Main St",
            "city": "New York",
            "state": "NY",
            "zip": "10001"
        },
        "payment_method": "Visa ending in 4242"
    }))
}

fn get_customer_orders(args: Value) -> Result<Value> {
    let customer_id = args["customer_id"].as_str().unwrap_or("anonymous");

    Ok(json!({
        "customer_id": customer_id,
        "orders": [
            {
                "order_id": "ORD-12345",
                "date": "2024-01-03",
                "status": "in_transit",
                "total": 1186.92,
                "items_count": 1
            },
            {
                "order_id": "ORD-12344",
                "date": "2023-12-20",
                "status": "delivered",
                "total": 299.99,
                "items_count": 2
            }
        ],
        "total_orders": 2
    }))
}

fn estimate_delivery(args: Value) -> Result<Value> {
    let order_id = args["order_id"].as_str().unwrap_or("ORD-12345");
    let estimated = (Utc::now() + Duration::days(3)).format("%Y-%m-%d").to_string();

    Ok(json!({
        "order_id": order_id,
        "estimated_delivery": estimated,
        "delivery_window": "9:00 AM - 5:00 PM",
        "carrier": "FedEx",
        "delivery_type": "Standard",
        "can_expedite": true,
        "expedite_cost": 15.00
    }))
}

fn request_delivery_update(args: Value) -> Result<Value> {
    let order_id = args["order_id"].as_str().unwrap_or("ORD-12345");

    Ok(json!({
        "order_id": order_id,
        "notification_type": "email",
        "subscribed": true,
        "events": ["out_for_delivery", "delivered", "exception"]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        assert_eq!(OrderAgent::select_tool("Where is my order #12345?"), "track_order");
        assert_eq!(OrderAgent::select_tool("show my orders"), "get_customer_orders");
        assert_eq!(OrderAgent::select_tool("when will it arrive?"), "estimate_delivery");
        assert_eq!(OrderAgent::select_tool("order total please"), "get_order_details");
        assert_eq!(OrderAgent::select_tool("notify me about delivery"), "request_delivery_update");
    }

    #[tokio::test]
    async fn test_track_uses_extracted_order_id() {
        let agent = OrderAgent::new();
        let result = agent.execute("Where is my order #98765?", None).await.unwrap();

        assert!(result.success);
        assert_eq!(result.agent_name, "OrderAgent");
        assert_eq!(result.data["order_id"], "98765");
        assert_eq!(result.data["carrier"], "FedEx");
    }

    #[tokio::test]
    async fn test_customer_orders_reads_context() {
        let agent = OrderAgent::new();
        let context = json!({ "context": { "customer_id": "CUST-77" } });
        let result = agent.execute("show my orders", Some(&context)).await.unwrap();

        assert_eq!(result.data["customer_id"], "CUST-77");
        assert_eq!(result.data["total_orders"], 2);
    }
}
