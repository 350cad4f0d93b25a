// Shared prompt constants used by the LLM client itself.
// Operation-specific prompts live in generation/prompts.rs.

/// System prompt for structured calls. The schema is enforced by the forced
/// tool call; this keeps the model from padding the reply with prose.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond by calling the provided tool with a complete, valid argument object. \
    Do NOT include any text outside the tool call. \
    Do NOT include explanations or apologies.";

/// System prompt for free-text revisions.
pub const WRITING_ASSISTANT_SYSTEM: &str = "You are a helpful writing assistant. \
    You revise documents exactly as instructed and output only the revised document. \
    Do NOT add commentary, preambles or markdown code fences.";

/// Closing directive appended to every structured prompt.
pub const EMPHASIS_INSTRUCTION: &str = "\
    Execute your core task based on the provided data. \
    Adhere strictly to the requested output format defined by the schema. \
    Ensure every change in the revised documents is highlighted using **bold** markdown.";
