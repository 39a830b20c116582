pub mod error;
pub mod labels;
pub mod preprocess;
pub mod inference;
pub mod decision;
pub mod pipeline;
pub mod gallery;
pub mod config;
pub mod logging;

// Convenience re-exports
pub use error::{Error, Result};
pub use labels::{ClassLabel, NUM_CLASSES};
pub use preprocess::{decode_input, preprocess, INPUT_SIZE};
pub use inference::{Classifier, LazyModel, OnnxClassifier};
pub use decision::{decide, Decision, Guidance, Outcome, PredictionResult, CONFIDENCE_THRESHOLD};
pub use pipeline::{classify_bytes, classify_image, select_source, InputSource};
pub use config::AppConfig;
