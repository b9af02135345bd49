//! Batch copy generation over a JSON file of product records.
//!
//! ```bash
//! copywriter-batch --input examples/sample_input.json --output examples/output.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use copywriter::batch::run_batch;
use copywriter::config::Config;
use copywriter::generation::generator::{CopyGenerator, GenerationOptions};
use copywriter::llm_client::LlmClient;
use copywriter::logging;

/// Generate SEO product copy for every record in a JSON array file.
#[derive(Parser, Debug)]
#[command(name = "copywriter-batch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file of product objects
    #[arg(short, long, default_value = "examples/sample_input.json")]
    input: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "examples/output.json")]
    output: PathBuf,

    /// Provider model, overriding OPENAI_MODEL
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    logging::init(&config.rust_log);

    let llm = LlmClient::new(config.openai_api_key.clone(), &config.openai_base_url);
    let generator = CopyGenerator::new(Arc::new(llm), config.openai_model.clone());
    let options = GenerationOptions { model: args.model };

    let written = run_batch(&generator, &args.input, &args.output, &options).await?;
    info!("Generated copy for {written} products");

    Ok(())
}
