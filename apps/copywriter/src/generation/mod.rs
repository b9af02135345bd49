// Product copy generation: prompt, provider call, parse-with-fallback.
// All LLM calls go through llm_client; nothing here talks to the provider directly.

pub mod generator;
pub mod handlers;
pub mod prompts;
