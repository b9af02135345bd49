//! Product copywriter: generates SEO marketing copy for product records
//! through a chat-completion provider.
//!
//! Two front ends share the generator: the `copywriter-api` HTTP service and
//! the `copywriter-batch` file runner.

pub mod batch;
pub mod config;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod logging;
pub mod routes;
pub mod state;
