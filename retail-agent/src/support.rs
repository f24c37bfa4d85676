use crate::{FunctionTool, generate_ref};
use async_trait::async_trait;
use retail_core::{Agent, AgentResult, Result, RetailError, Tool, extract_entities};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;

const AGENT_NAME: &str = "SupportAgent";

/// Handles returns, refunds, exchanges, and complaints.
pub struct SupportAgent {
    tools: Vec<Arc<dyn Tool>>,
}

impl SupportAgent {
    pub fn new() -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(FunctionTool::new(
                "check_return_eligibility",
                "Check if an order is eligible for return",
                check_return_eligibility,
            )),
            Arc::new(FunctionTool::new(
                "initiate_return",
                "Initiate a return request",
                initiate_return,
            )),
            Arc::new(FunctionTool::new(
                "get_return_status",
                "Get the status of a return request",
                get_return_status,
            )),
            Arc::new(FunctionTool::new("process_refund", "Process a refund", process_refund)),
            Arc::new(FunctionTool::new(
                "create_support_ticket",
                "Create a support ticket for complex issues",
                create_support_ticket,
            )),
        ];
        Self { tools }
    }

    fn select_tool(task: &str) -> &'static str {
        let lowered = task.to_lowercase();
        if lowered.contains("status") {
            "get_return_status"
        } else if lowered.contains("refund") {
            "process_refund"
        } else if ["eligib", "can i return", "policy"].iter().any(|kw| lowered.contains(kw)) {
            "check_return_eligibility"
        } else if ["complaint", "ticket", "speak", "human", "manager"]
            .iter()
            .any(|kw| lowered.contains(kw))
        {
            "create_support_ticket"
        } else {
            "initiate_return"
        }
    }
}

impl Default for SupportAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for SupportAgent {
    fn name(&self) -> &str {
        AGENT_NAME
    }

    fn description(&self) -> &str {
        "Handles returns, refunds, and customer complaints"
    }

    async fn execute(&self, task: &str, _context: Option<&Value>) -> Result<AgentResult> {
        let started = Instant::now();
        let tool_name = Self::select_tool(task);
        tracing::info!(agent = AGENT_NAME, tool = tool_name, "executing task");

        let order_id = extract_entities(task).order_id.unwrap_or_else(|| "ORD-12345".to_string());
        let args = match tool_name {
            "create_support_ticket" => {
                json!({ "issue_type": "general", "description": task, "order_id": order_id })
            }
            "initiate_return" => json!({ "order_id": order_id, "reason": task, "items": "all" }),
            _ => json!({ "order_id": order_id, "return_id": "RET-UNKNOWN" }),
        };

        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == tool_name)
            .ok_or_else(|| RetailError::Tool(format!("unknown tool: {tool_name}")))?;
        let data = tool.execute(args).await?;

        let message = match tool_name {
            "get_return_status" => "Here's the latest on your return.".to_string(),
            "process_refund" => {
                "I'm sorry for the trouble. Your refund is being processed and should land in \
                 3-5 business days."
                    .to_string()
            }
            "check_return_eligibility" => {
                "Good news: that order is within the return window.".to_string()
            }
            "create_support_ticket" => {
                let ticket = data["ticket_id"].as_str().unwrap_or("your ticket");
                format!("I've opened {ticket} for you. Our team will respond within 24-48 hours.")
            }
            _ => {
                let return_id = data["return_id"].as_str().unwrap_or("your return");
                format!(
                    "I've started return {return_id}. A prepaid label is on its way to your email."
                )
            }
        };

        Ok(AgentResult::success(AGENT_NAME, message, data)
            .with_execution_time(started.elapsed().as_secs_f64()))
    }
}

fn check_return_eligibility(args: Value) -> Result<Value> {
    let order_id = args["order_id"].as_str().unwrap_or("ORD-12345");

    Ok(json!({
        "order_id": order_id,
        "eligible": true,
        "return_window_days": 30,
        "days_remaining": 25,
        "return_type": ["full_refund", "exchange", "store_credit"],
        "items": [
            {
                "name": "iPhone 15 Pro - Blue",
                "returnable": true,
                "refund_amount": 999.00
            }
        ],
        "return_conditions": [
            "Item must be unused and in original packaging",
            "All accessories must be included",
            "Original receipt required"
        ]
    }))
}

fn initiate_return(args: Value) -> Result<Value> {
    let order_id = args["order_id"].as_str().unwrap_or("ORD-12345");
    let reason = args["reason"].as_str().unwrap_or_default();
    let items = args["items"].as_str().unwrap_or("all");
    let return_id = generate_ref("RET");

    Ok(json!({
        "return_id": return_id,
        "order_id": order_id,
        "status": "initiated",
        "reason": reason,
        "items": items,
        "return_label": "https://example.com/return-label/12345",
        "drop_off_locations": [
            "Any FedEx location",
            "Schedule pickup"
        ],
        "refund_estimate": {
            "amount": 999.00,
            "method": "original_payment",
            "processing_days": "3-5 business days after receipt"
        }
    }))
}

fn get_return_status(args: Value) -> Result<Value> {
    let return_id = args["return_id"].as_str().unwrap_or("RET-UNKNOWN");

    Ok(json!({
        "return_id": return_id,
        "status": "in_transit",
        "tracker": [
            { "date": "2024-01-05", "status": "Return initiated" },
            { "date": "2024-01-06", "status": "Package dropped off" },
            { "date": "2024-01-07", "status": "In transit to warehouse" }
        ],
        "estimated_arrival": "2024-01-10",
        "refund_after_inspection": true
    }))
}

fn process_refund(args: Value) -> Result<Value> {
    let order_id = args["order_id"].as_str().unwrap_or("ORD-12345");
    let refund_id = generate_ref("REF");

    Ok(json!({
        "refund_id": refund_id,
        "order_id": order_id,
        "status": "processing",
        "refund_amount": 999.00,
        "refund_method": "original_payment",
        "estimated_processing": "3-5 business days",
        "confirmation_sent": true
    }))
}

fn create_support_ticket(args: Value) -> Result<Value> {
    let issue_type = args["issue_type"].as_str().unwrap_or("general");
    let ticket_id = generate_ref("TKT");
    let confirmation = format!("We've received your request. Ticket #{ticket_id}");

    Ok(json!({
        "ticket_id": ticket_id,
        "issue_type": issue_type,
        "priority": "normal",
        "status": "open",
        "estimated_response": "24-48 hours",
        "agent_assigned": false,
        "confirmation": confirmation
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        assert_eq!(SupportAgent::select_tool("what's my return status?"), "get_return_status");
        assert_eq!(SupportAgent::select_tool("I want a refund"), "process_refund");
        assert_eq!(
            SupportAgent::select_tool("can I return this? what's the policy"),
            "check_return_eligibility"
        );
        assert_eq!(SupportAgent::select_tool("I want to speak to a manager"), "create_support_ticket");
        assert_eq!(SupportAgent::select_tool("return my purchase"), "initiate_return");
    }

    #[tokio::test]
    async fn test_initiate_return() {
        let agent = SupportAgent::new();
        let result = agent.execute("I want to return order #555", None).await.unwrap();

        assert!(result.success);
        assert_eq!(result.agent_name, "SupportAgent");
        assert_eq!(result.data["order_id"], "555");
        assert_eq!(result.data["status"], "initiated");
        assert!(result.data["return_id"].as_str().unwrap().starts_with("RET-"));
    }

    #[tokio::test]
    async fn test_refund() {
        let agent = SupportAgent::new();
        let result = agent.execute("give me a refund please", None).await.unwrap();

        assert!(result.success);
        assert_eq!(result.data["status"], "processing");
        assert!(result.data["refund_id"].as_str().unwrap().starts_with("REF-"));
    }
}
