#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod chat;
mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use parley_chat::{ChatHandlerConfig, HandlerDependencies, HandlerRegistry, ResponsesAgentRuntime};
use parley_config::Config;
use parley_llm::OpenAiProvider;
use parley_mcp::{McpToolClient, ToolEndpoint};
use tower_http::trace::TraceLayer;

use crate::chat::ChatState;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// Nothing connects here: the tool server session opens on the first
    /// request that needs it.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let provider = Arc::new(OpenAiProvider::new(&config.llm)?);
        let endpoint = ToolEndpoint::from_config(&config.mcp);
        let tools = Arc::new(McpToolClient::new(endpoint.clone()));
        let runtime = Arc::new(ResponsesAgentRuntime::new(provider.clone()));

        let registry = HandlerRegistry::new(HandlerDependencies {
            provider,
            tools,
            endpoint,
            runtime,
        });

        tracing::info!(
            model = %config.chat.model,
            mcp_url = %config.mcp.url,
            max_tool_loops = config.chat.max_tool_loops,
            "chat engine configured"
        );

        Ok(Self::with_registry(config, registry))
    }

    /// Build the server around an existing handler registry
    pub fn with_registry(config: &Config, registry: HandlerRegistry) -> Self {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let state = ChatState {
            registry: Arc::new(registry),
            config: Arc::new(ChatHandlerConfig::from_config(&config.chat)),
            max_messages: config.chat.max_messages,
        };

        let mut app = Router::new().merge(chat::chat_router(state));

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.layer(TraceLayer::new_for_http());

        Self {
            router: app,
            listen_address,
        }
    }

    /// Get the configured listen address
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
