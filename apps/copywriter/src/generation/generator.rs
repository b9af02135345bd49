//! Copy generation: turns one product record into marketing copy.
//!
//! Flow: resolve model → build prompt → provider chat call →
//!       extract reply text → parse, or fall back to a deterministic result.
//!
//! A reply that is not a JSON object is an expected outcome, not an error.
//! Only a failed provider call is propagated.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::generation::prompts::{COPY_MAX_TOKENS, COPY_PROMPT_TEMPLATE};
use crate::llm_client::prompts::COPYWRITER_SYSTEM;
use crate::llm_client::{ChatMessage, ChatProvider, ChatRequest, LlmError};

/// Model used when neither the call nor the environment names one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Keys the prompt asks the provider to emit.
pub const COPY_KEYS: [&str; 4] = ["title", "description", "bullets", "seo_keywords"];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// An open-ended product description. No schema is enforced; key order is preserved.
pub type ProductRecord = Map<String, Value>;

/// Per-call generation options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationOptions {
    /// Provider model, overriding the configured default.
    pub model: Option<String>,
}

/// Substitute copy used when the provider reply is not a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackCopy {
    pub title: String,
    pub description: String,
    pub bullets: Vec<String>,
    pub seo_keywords: Vec<String>,
}

/// Outcome of one generation. Both variants serialize to a bare JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CopyResult {
    /// The provider's JSON object, passed through unchanged.
    Parsed(Map<String, Value>),
    Fallback(FallbackCopy),
}

impl CopyResult {
    pub fn is_fallback(&self) -> bool {
        matches!(self, CopyResult::Fallback(_))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// Generates product copy through a `ChatProvider`.
///
/// Cheap to clone; shared by the batch runner and the HTTP handlers.
#[derive(Clone)]
pub struct CopyGenerator {
    provider: Arc<dyn ChatProvider>,
    default_model: Option<String>,
}

impl CopyGenerator {
    /// `default_model` is the process-wide configured model (`OPENAI_MODEL`), if any.
    pub fn new(provider: Arc<dyn ChatProvider>, default_model: Option<String>) -> Self {
        Self {
            provider,
            default_model,
        }
    }

    /// Model for this call: option, then configured default, then `DEFAULT_MODEL`.
    pub fn model_for<'a>(&'a self, options: &'a GenerationOptions) -> &'a str {
        resolve_model(options.model.as_deref(), self.default_model.as_deref())
    }

    /// Generates copy for one product record.
    ///
    /// Makes exactly one provider call. Provider failures propagate; an
    /// unparseable reply yields `CopyResult::Fallback`.
    pub async fn generate(
        &self,
        product: &ProductRecord,
        options: &GenerationOptions,
    ) -> Result<CopyResult, LlmError> {
        let model = self.model_for(options);

        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(COPYWRITER_SYSTEM),
                ChatMessage::user(build_copy_prompt(product)),
            ],
            max_tokens: COPY_MAX_TOKENS,
        };

        debug!("Requesting product copy from model {model}");
        let response = self.provider.chat(&request).await?;

        Ok(parse_copy(response.text(), product))
    }
}

/// Picks the first non-empty of `option` and `configured`, else `DEFAULT_MODEL`.
pub fn resolve_model<'a>(option: Option<&'a str>, configured: Option<&'a str>) -> &'a str {
    option
        .filter(|m| !m.is_empty())
        .or(configured.filter(|m| !m.is_empty()))
        .unwrap_or(DEFAULT_MODEL)
}

/// Fills the copy prompt with the pretty-printed product record.
pub fn build_copy_prompt(product: &ProductRecord) -> String {
    let product_json = format!("{:#}", Value::Object(product.clone()));
    COPY_PROMPT_TEMPLATE.replace("{product_json}", &product_json)
}

/// Parses the reply as a JSON object, or builds the fallback copy.
pub fn parse_copy(reply: &str, product: &ProductRecord) -> CopyResult {
    match serde_json::from_str::<Value>(reply) {
        Ok(Value::Object(copy)) => {
            let missing: Vec<&str> = COPY_KEYS
                .iter()
                .copied()
                .filter(|k| !copy.contains_key(*k))
                .collect();
            if !missing.is_empty() {
                warn!("Provider copy is missing keys {missing:?}; passing it through unchanged");
            }
            CopyResult::Parsed(copy)
        }
        Ok(other) => {
            debug!("Provider reply is JSON but not an object ({other}); using fallback copy");
            CopyResult::Fallback(fallback_copy(reply, product))
        }
        Err(e) => {
            debug!("Provider reply is not JSON ({e}); using fallback copy");
            CopyResult::Fallback(fallback_copy(reply, product))
        }
    }
}

fn fallback_copy(reply: &str, product: &ProductRecord) -> FallbackCopy {
    FallbackCopy {
        title: fallback_title(product),
        description: reply.to_string(),
        bullets: Vec::new(),
        seo_keywords: Vec::new(),
    }
}

/// The product's own `title`. Strings are used verbatim, other truthy scalars
/// as their JSON text; missing, null, false, 0 and "" give an empty title.
fn fallback_title(product: &ProductRecord) -> String {
    match product.get("title") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(v @ (Value::Array(_) | Value::Object(_))) => v.to_string(),
        _ => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
