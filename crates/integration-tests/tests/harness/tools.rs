//! Scripted tool client standing in for a remote MCP server

use std::sync::Mutex;

use async_trait::async_trait;
use parley_mcp::{McpError, ToolArguments, ToolClient, ToolDescriptor, ToolOutput};

/// Tool client with a fixed catalog that answers every call from a script
pub struct ScriptedTools {
    names: Vec<String>,
    reply: String,
    calls: Mutex<Vec<(String, ToolArguments)>>,
}

impl ScriptedTools {
    /// Catalog of `names`, each answering `reply`
    pub fn new(names: &[&str], reply: &str) -> Self {
        Self {
            names: names.iter().map(|&n| n.to_owned()).collect(),
            reply: reply.to_owned(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call received, in order
    pub fn calls(&self) -> Vec<(String, ToolArguments)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolClient for ScriptedTools {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        Ok(self
            .names
            .iter()
            .map(|name| ToolDescriptor {
                name: name.clone(),
                description: Some(format!("{name} tool")),
                input_schema: Some(serde_json::json!({"type": "object"})),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<ToolOutput, McpError> {
        self.calls.lock().unwrap().push((name.to_owned(), arguments));

        if self.names.iter().any(|n| n == name) {
            Ok(ToolOutput::text(self.reply.clone()))
        } else {
            Err(McpError::Execution(format!("unknown tool {name}")))
        }
    }
}
