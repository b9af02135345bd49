// LLM prompt constants for the Generation module.

/// Product copy prompt template. Replace `{product_json}` before sending.
pub const COPY_PROMPT_TEMPLATE: &str = "You are an expert ecommerce copywriter and SEO specialist.
Write a short SEO-optimized product title (<= 70 chars), a 60–120 word product description that includes target keywords, and 5 bullet point features. Use the product data below. Keep language persuasive and factual.

Product data:
{product_json}


Output as JSON with keys: title, description, bullets, seo_keywords.";

/// Output-length cap for copy generation.
pub const COPY_MAX_TOKENS: u32 = 400;
