//! Wire formats spoken to OpenAI-compatible providers

pub mod openai;
pub mod responses;
