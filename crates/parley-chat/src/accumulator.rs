//! Reassembly of streamed tool-call fragments

use std::collections::BTreeMap;

use parley_llm::types::{ToolCall, ToolCallFragment};

#[derive(Debug, Default)]
struct ToolCallBuilder {
    id: Option<String>,
    name: String,
    arguments: String,
}

/// Collects tool-call fragments keyed by their index in the turn
#[derive(Debug, Default)]
pub(crate) struct ToolCallAccumulator {
    builders: BTreeMap<u32, ToolCallBuilder>,
}

impl ToolCallAccumulator {
    pub(crate) fn push(&mut self, fragment: ToolCallFragment) {
        let builder = self.builders.entry(fragment.index).or_default();

        if let Some(id) = fragment.id.filter(|id| !id.is_empty()) {
            builder.id = Some(id);
        }
        if let Some(name) = fragment.name {
            builder.name.push_str(&name);
        }
        if let Some(arguments) = fragment.arguments {
            builder.arguments.push_str(&arguments);
        }
    }

    /// Completed calls in index order
    ///
    /// Fragments that never received a name are dropped.
    pub(crate) fn finish(self) -> Vec<ToolCall> {
        self.builders
            .into_iter()
            .filter_map(|(index, builder)| {
                if builder.name.is_empty() {
                    tracing::warn!(index, "dropping tool call without a name");
                    return None;
                }

                let id = builder.id.unwrap_or_else(|| format!("call_{index}"));
                Some(ToolCall::new(id, builder.name, builder.arguments))
            })
            .collect()
    }
}
