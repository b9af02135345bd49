//! Batch runner. Generates copy for every record in a JSON file.
//!
//! Records are processed one at a time. The first provider failure aborts the
//! run before anything is written.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::generation::generator::{CopyGenerator, CopyResult, GenerationOptions, ProductRecord};

/// One line of the batch output: the input record and its generated copy.
#[derive(Debug, Serialize)]
pub struct BatchRecord {
    pub product: ProductRecord,
    pub result: CopyResult,
}

/// Reads `input`, generates copy for each record, writes the pretty-printed
/// pairs to `output`. Returns the number of records written.
pub async fn run_batch(
    generator: &CopyGenerator,
    input: &Path,
    output: &Path,
    options: &GenerationOptions,
) -> Result<usize> {
    let products = read_products(input)?;
    let mut records = Vec::with_capacity(products.len());

    for product in products {
        info!("Generating for: {}", product_label(&product));
        let result = generator
            .generate(&product, options)
            .await
            .with_context(|| format!("Generation failed for {}", product_label(&product)))?;
        records.push(BatchRecord { product, result });
    }

    let json = serde_json::to_string_pretty(&records).context("Failed to serialize batch output")?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write output file {}", output.display()))?;

    info!("Done — output written to {}", output.display());
    Ok(records.len())
}

fn read_products(input: &Path) -> Result<Vec<ProductRecord>> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file {}", input.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Input file {} is not a JSON array of objects", input.display()))
}

/// Log label for a record: its `sku`, else its `title`, else "unknown".
fn product_label(product: &ProductRecord) -> String {
    ["sku", "title"]
        .iter()
        .filter_map(|key| product.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use tempfile::TempDir;

    use crate::llm_client::{ChatResponse, LlmError, MockChatProvider};

    fn generator_replying(reply: &'static str, calls: usize) -> CopyGenerator {
        let mut provider = MockChatProvider::new();
        provider
            .expect_chat()
            .times(calls)
            .returning(move |_| Ok(ChatResponse::with_content(reply)));
        CopyGenerator::new(Arc::new(provider), None)
    }

    fn write_input(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("sample_input.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn read_output(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_batch_writes_parsed_results() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, r#"[{"sku":"X1","title":"Widget"}]"#);
        let output = dir.path().join("output.json");
        let generator = generator_replying(
            r#"{"title":"T","description":"D","bullets":["b1"],"seo_keywords":["k1"]}"#,
            1,
        );

        let written = run_batch(&generator, &input, &output, &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(
            read_output(&output),
            json!([{
                "product": {"sku": "X1", "title": "Widget"},
                "result": {"title": "T", "description": "D", "bullets": ["b1"], "seo_keywords": ["k1"]}
            }])
        );
    }

    #[tokio::test]
    async fn test_batch_writes_fallback_for_plain_text() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, r#"[{"title":"Widget"}]"#);
        let output = dir.path().join("output.json");
        let generator = generator_replying("Some plain text", 1);

        run_batch(&generator, &input, &output, &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(
            read_output(&output),
            json!([{
                "product": {"title": "Widget"},
                "result": {"title": "Widget", "description": "Some plain text", "bullets": [], "seo_keywords": []}
            }])
        );
    }

    #[tokio::test]
    async fn test_batch_output_is_pretty_printed_in_input_order() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, r#"[{"sku":"A"},{"sku":"B"},{"sku":"C"}]"#);
        let output = dir.path().join("output.json");
        let generator = generator_replying("{}", 3);

        let written = run_batch(&generator, &input, &output, &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(written, 3);
        let raw = std::fs::read_to_string(&output).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"product\""));
        let skus: Vec<String> = serde_json::from_str::<Value>(&raw)
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["product"]["sku"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(skus, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_provider_failure_aborts_batch_without_output() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, r#"[{"sku":"A"},{"sku":"B"},{"sku":"C"}]"#);
        let output = dir.path().join("output.json");

        let mut provider = MockChatProvider::new();
        let mut seq = mockall::Sequence::new();
        provider
            .expect_chat()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ChatResponse::with_content("{}")));
        provider
            .expect_chat()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(LlmError::Api {
                    status: 401,
                    message: "Incorrect API key provided".to_string(),
                })
            });
        let generator = CopyGenerator::new(Arc::new(provider), None);

        let err = run_batch(&generator, &input, &output, &GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("Incorrect API key provided"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_missing_input_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let generator = generator_replying("{}", 0);

        let err = run_batch(
            &generator,
            &dir.path().join("missing.json"),
            &dir.path().join("output.json"),
            &GenerationOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[tokio::test]
    async fn test_malformed_input_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, r#"{"sku": "not an array"}"#);
        let output = dir.path().join("output.json");
        let generator = generator_replying("{}", 0);

        let err = run_batch(&generator, &input, &output, &GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("is not a JSON array of objects"));
        assert!(!output.exists());
    }

    #[test]
    fn test_product_label_prefers_sku_then_title() {
        let label = |value: Value| match value {
            Value::Object(map) => product_label(&map),
            _ => unreachable!(),
        };
        assert_eq!(label(json!({"sku": "X1", "title": "Widget"})), "X1");
        assert_eq!(label(json!({"title": "Widget"})), "Widget");
        assert_eq!(label(json!({"sku": "", "title": "Widget"})), "Widget");
        assert_eq!(label(json!({"color": "red"})), "unknown");
    }
}
