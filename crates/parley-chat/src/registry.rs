//! Resolution of strategy names to cached handler instances

use std::sync::Arc;

use dashmap::DashMap;
use parley_llm::Provider;
use parley_mcp::{ToolClient, ToolEndpoint};

use crate::agents::{AgentRuntime, AgentsHandler};
use crate::error::ChatError;
use crate::handler::{ChatHandler, HandlerMode};
use crate::native::NativeHandler;
use crate::proxy::ProxyHandler;

/// The `mode` field as the client sent it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedMode {
    /// Field absent
    Missing,
    /// Field present but `null`
    Null,
    Named(String),
}

impl From<Option<Option<String>>> for RequestedMode {
    fn from(field: Option<Option<String>>) -> Self {
        match field {
            None => Self::Missing,
            Some(None) => Self::Null,
            Some(Some(name)) => Self::Named(name),
        }
    }
}

impl RequestedMode {
    /// The strategy this names, or why it names none
    pub fn resolve(&self) -> Result<HandlerMode, ChatError> {
        match self {
            Self::Missing => Err(ChatError::MissingMode),
            Self::Null => Err(ChatError::NullMode),
            Self::Named(name) if name.is_empty() => Err(ChatError::EmptyMode),
            Self::Named(name) => HandlerMode::parse(name).ok_or_else(|| ChatError::UnknownMode(name.clone())),
        }
    }
}

/// Collaborators handlers are built from
#[derive(Clone)]
pub struct HandlerDependencies {
    pub provider: Arc<dyn Provider>,
    pub tools: Arc<dyn ToolClient>,
    pub endpoint: ToolEndpoint,
    pub runtime: Arc<dyn AgentRuntime>,
}

/// One lazily built handler per strategy
pub struct HandlerRegistry {
    dependencies: HandlerDependencies,
    cache: DashMap<HandlerMode, Arc<dyn ChatHandler>>,
}

impl HandlerRegistry {
    pub fn new(dependencies: HandlerDependencies) -> Self {
        Self {
            dependencies,
            cache: DashMap::new(),
        }
    }

    /// Cached handler for `requested`, built on first use
    pub fn get(&self, requested: &RequestedMode) -> Result<Arc<dyn ChatHandler>, ChatError> {
        let mode = requested.resolve()?;

        let handler = self
            .cache
            .entry(mode)
            .or_insert_with(|| {
                tracing::debug!(mode = %mode, "constructing chat handler");
                self.build(mode)
            })
            .value()
            .clone();

        Ok(handler)
    }

    /// Drop every cached handler; the next `get` builds a fresh one
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn build(&self, mode: HandlerMode) -> Arc<dyn ChatHandler> {
        let deps = &self.dependencies;

        match mode {
            HandlerMode::Proxy => Arc::new(ProxyHandler::new(deps.provider.clone(), deps.tools.clone())),
            HandlerMode::Native => Arc::new(NativeHandler::new(deps.provider.clone(), deps.endpoint.clone())),
            HandlerMode::Agents => Arc::new(AgentsHandler::new(deps.runtime.clone(), deps.endpoint.clone())),
        }
    }
}
