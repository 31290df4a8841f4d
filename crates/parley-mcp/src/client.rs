//! rmcp-backed tool client

use std::borrow::Cow;

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, CallToolResult, Tool};
use rmcp::service::{RoleClient, RunningService, ServiceError, ServiceExt as _};
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;
use secrecy::ExposeSecret;
use tokio::sync::Mutex;

use crate::endpoint::ToolEndpoint;
use crate::error::McpError;
use crate::output::ToolOutput;
use crate::transport::ToolHttpClient;
use crate::{ToolArguments, ToolClient, ToolDescriptor};

type Session = RunningService<RoleClient, ()>;

/// Tool client speaking MCP over streamable HTTP
///
/// The session is opened on first use and kept. A failed connect leaves the
/// slot empty, so the next call tries again.
pub struct McpToolClient {
    endpoint: ToolEndpoint,
    http: reqwest::Client,
    session: Mutex<Option<Session>>,
}

impl McpToolClient {
    pub fn new(endpoint: ToolEndpoint) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
            session: Mutex::new(None),
        }
    }

    async fn connect(&self) -> Result<Session, McpError> {
        let mut transport_config = StreamableHttpClientTransportConfig::with_uri(self.endpoint.url.as_str());

        if let Some(token) = &self.endpoint.token {
            // Sent as a bearer credential by the transport
            transport_config = transport_config.auth_header(token.expose_secret());
        }

        let transport =
            StreamableHttpClientTransport::with_client(ToolHttpClient::new(self.http.clone()), transport_config);

        let session = ().serve(transport).await.map_err(|e| {
            tracing::warn!(url = %self.endpoint.url, error = %e, "MCP handshake failed");
            McpError::Transport(format!("handshake failed: {e}"))
        })?;

        tracing::info!(url = %self.endpoint.url, "connected to MCP server");

        Ok(session)
    }

    async fn try_list(session: &Session) -> Result<Vec<Tool>, ServiceError> {
        session.list_all_tools().await
    }

    async fn try_call(session: &Session, name: &str, arguments: &ToolArguments) -> Result<CallToolResult, ServiceError> {
        session
            .call_tool(CallToolRequestParam {
                name: Cow::Owned(name.to_owned()),
                arguments: Some(arguments.clone()),
            })
            .await
    }
}

/// Whether the session should be thrown away after this error
///
/// Protocol errors and undecodable replies come from a live server; anything
/// else means the connection itself is suspect.
const fn is_transport_failure(error: &ServiceError) -> bool {
    !matches!(error, ServiceError::McpError(_) | ServiceError::UnexpectedResponse)
}

fn service_error(error: ServiceError) -> McpError {
    match error {
        ServiceError::McpError(data) => McpError::Execution(data.message.into_owned()),
        ServiceError::UnexpectedResponse => McpError::Execution("unexpected response from tool server".to_owned()),
        other => McpError::Transport(other.to_string()),
    }
}

fn descriptor(tool: Tool) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.name.into_owned(),
        description: tool.description.map(Cow::into_owned),
        input_schema: serde_json::to_value(&*tool.input_schema).ok(),
    }
}

fn output(result: &CallToolResult) -> Result<ToolOutput, McpError> {
    let value = serde_json::to_value(result).map_err(|e| McpError::Internal(e.into()))?;
    Ok(ToolOutput::from_json(&value))
}

#[async_trait]
impl ToolClient for McpToolClient {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        let mut slot = self.session.lock().await;

        if let Some(session) = slot.as_ref() {
            match Self::try_list(session).await {
                Ok(tools) => return Ok(tools.into_iter().map(descriptor).collect()),
                Err(e) if is_transport_failure(&e) => {
                    tracing::warn!(error = %e, "MCP transport failure, reconnecting");
                    *slot = None;
                }
                Err(e) => return Err(service_error(e)),
            }
        }

        let session = slot.insert(self.connect().await?);
        let tools = Self::try_list(session).await.map_err(service_error)?;

        Ok(tools.into_iter().map(descriptor).collect())
    }

    async fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<ToolOutput, McpError> {
        let mut slot = self.session.lock().await;

        if let Some(session) = slot.as_ref() {
            match Self::try_call(session, name, &arguments).await {
                Ok(result) => return output(&result),
                Err(e) if is_transport_failure(&e) => {
                    tracing::warn!(tool = name, error = %e, "MCP transport failure, reconnecting");
                    *slot = None;
                }
                Err(e) => return Err(service_error(e)),
            }
        }

        let session = slot.insert(self.connect().await?);
        let result = Self::try_call(session, name, &arguments)
            .await
            .map_err(service_error)?;

        output(&result)
    }
}
