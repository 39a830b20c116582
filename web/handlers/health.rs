use std::io::Cursor;
use tiny_http::Response;

use crate::state::SharedState;

/// `GET /healthz`
///
/// Plain-text liveness probe; also reports whether the model is cached yet.
pub fn handle_get(state: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let model = if state.model.is_loaded() { "loaded" } else { "not loaded" };
    crate::routes::text_response(200, &format!("ok\nmodel: {}\n", model))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ndarray::Array4;

    use leafscan::{AppConfig, Classifier, LazyModel};

    use super::*;
    use crate::routes::testing::{send, state_without_model};
    use crate::state::AppState;

    struct Uniform;

    impl Classifier for Uniform {
        fn predict(&self, _batch: &Array4<f32>) -> leafscan::Result<Vec<f32>> {
            Ok(vec![0.2; leafscan::NUM_CLASSES])
        }
    }

    #[test]
    fn reports_model_not_loaded_before_first_use() {
        let (state, _) = state_without_model(AppConfig::default());
        let sent = send(handle_get(&state));
        assert_eq!(sent.status, 200);
        assert_eq!(sent.text(), "ok\nmodel: not loaded\n");
    }

    #[test]
    fn reports_model_loaded_once_cached() {
        let model: LazyModel<Box<dyn Classifier>> =
            LazyModel::new(|| Ok(Box::new(Uniform) as Box<dyn Classifier>));
        let state = Arc::new(AppState::with_model(AppConfig::default(), model));
        state.model.preload().unwrap();

        let sent = send(handle_get(&state));
        assert_eq!(sent.status, 200);
        assert_eq!(sent.text(), "ok\nmodel: loaded\n");
    }
}
