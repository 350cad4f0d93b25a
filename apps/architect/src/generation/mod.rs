// Structured generation: prompt composition and the schema-validating client.
// All model calls go through llm_client; nothing here talks HTTP.

pub mod client;
pub mod prompts;
