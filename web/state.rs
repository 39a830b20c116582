use std::sync::Arc;

use leafscan::{AppConfig, Classifier, LazyModel};

/// Everything a handler needs. Built once in `main` and never mutated
/// afterwards; the model slot fills itself on first use.
pub struct AppState {
    pub config: AppConfig,
    pub model: LazyModel<Box<dyn Classifier>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let model = LazyModel::onnx(config.model_path.clone());
        AppState::with_model(config, model)
    }

    pub fn with_model(config: AppConfig, model: LazyModel<Box<dyn Classifier>>) -> Self {
        AppState { config, model }
    }
}

/// Shared state type — an `Arc<AppState>` passed to every handler.
pub type SharedState = Arc<AppState>;
