use crate::generation::generator::CopyGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests never coordinate through it.
#[derive(Clone)]
pub struct AppState {
    pub generator: CopyGenerator,
}
