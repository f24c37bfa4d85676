use async_trait::async_trait;
use retail_core::{Result, Tool};
use serde_json::Value;

type Handler = Box<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// A [`Tool`] built from a plain function. The agents in this crate front
/// mock backend data, so handlers are synchronous payload builders.
pub struct FunctionTool {
    name: String,
    description: String,
    handler: Handler,
}

impl FunctionTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self { name: name.into(), description: description.into(), handler: Box::new(handler) }
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        (self.handler)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_function_tool() {
        let tool = FunctionTool::new("echo", "echoes its args", |args| Ok(json!({"got": args})));
        assert_eq!(tool.name(), "echo");
        assert_eq!(tool.description(), "echoes its args");

        let result = tool.execute(json!("hi")).await.unwrap();
        assert_eq!(result, json!({"got": "hi"}));
    }
}
