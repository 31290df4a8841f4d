/// Tool offered to the model for one completion
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: Option<String>,
    /// JSON Schema for the arguments
    pub parameters: Option<serde_json::Value>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: Option<String>, parameters: Option<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            description,
            parameters,
        }
    }
}
