/// Event produced while streaming a completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Piece of assistant text
    Content(String),
    /// Piece of a tool call
    ToolCall(ToolCallFragment),
    /// Provider signalled the end of the turn
    Done,
}

/// Fragment of a tool call, keyed by its position in the turn
///
/// The id and name usually arrive once; argument pieces must be
/// concatenated per index. Fragments of different calls may interleave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallFragment {
    pub index: u32,
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: Option<String>,
}
