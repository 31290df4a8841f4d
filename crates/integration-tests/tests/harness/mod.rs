#![allow(dead_code)]

pub mod config;
pub mod mock_llm;
pub mod tools;

/// Parse SSE data payloads from raw response text
pub fn parse_sse_data(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.starts_with("data: "))
        .map(|line| line.trim_start_matches("data: ").to_owned())
        .collect()
}

/// Decoded frames of a chat stream, without the final `[DONE]`
///
/// Panics when the stream does not end with exactly one `[DONE]`.
pub fn chat_frames(text: &str) -> Vec<serde_json::Value> {
    let mut data = parse_sse_data(text);
    assert_eq!(data.pop().as_deref(), Some("[DONE]"), "stream must end with [DONE]: {text}");
    assert!(!data.iter().any(|d| d == "[DONE]"), "[DONE] must appear once: {text}");

    data.iter()
        .map(|d| serde_json::from_str(d).expect("frame is JSON"))
        .collect()
}

/// Concatenated `content` frames
pub fn content_of(frames: &[serde_json::Value]) -> String {
    frames.iter().filter_map(|f| f["content"].as_str()).collect()
}

/// `(name, status)` of every `toolCall` frame
pub fn tool_statuses(frames: &[serde_json::Value]) -> Vec<(String, String)> {
    frames
        .iter()
        .filter_map(|f| {
            let call = f.get("toolCall")?;
            Some((call["name"].as_str()?.to_owned(), call["status"].as_str()?.to_owned()))
        })
        .collect()
}

/// `(type, message)` of every `system` frame
pub fn notices(frames: &[serde_json::Value]) -> Vec<(String, String)> {
    frames
        .iter()
        .filter_map(|f| {
            let system = f.get("system")?;
            Some((system["type"].as_str()?.to_owned(), system["message"].as_str()?.to_owned()))
        })
        .collect()
}
