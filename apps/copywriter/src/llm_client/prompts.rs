// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file holds the cross-cutting assistant persona.

/// System message sent ahead of every copywriting prompt.
pub const COPYWRITER_SYSTEM: &str =
    "You are a helpful assistant that writes ecommerce product copy.";
