//! ONNX Runtime backed leaf classifier.
//!
//! The MobileNetV2 model is trained in Keras and exported to ONNX. It takes
//! an NHWC float tensor `[1, 224, 224, 3]` and ends in a softmax over the
//! five leaf classes.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use tracing::{debug, info, instrument};

use crate::error::{Error, Result};
use crate::inference::Classifier;
use crate::labels::NUM_CLASSES;

pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    path: PathBuf,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("path", &self.path)
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

fn model_err(e: impl std::fmt::Display) -> Error {
    Error::Model(e.to_string())
}

impl OnnxClassifier {
    /// Loads the model artifact from disk.
    ///
    /// # Errors
    /// - `ModelNotFound` when `path` does not exist
    /// - `Model` when ONNX Runtime rejects the file
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelNotFound(path.to_path_buf()));
        }

        info!("Loading leaf classifier from {}", path.display());
        let started = Instant::now();

        let session = Session::builder()
            .map_err(model_err)?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(model_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(model_err)?
            .commit_from_file(path)
            .map_err(model_err)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| Error::Model("model declares no inputs".into()))?;

        if let Some(input) = session.inputs.first() {
            debug!("Classifier expected input: {:?}", input.input_type);
        }

        info!(
            input = %input_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Leaf classifier loaded"
        );

        Ok(OnnxClassifier {
            session: Mutex::new(session),
            input_name,
            path: path.to_path_buf(),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, batch: &Array4<f32>) -> Result<Vec<f32>> {
        let input_value = Value::from_array(batch.to_owned())?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Inference("session lock poisoned".into()))?;

        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_value])?;
        let probabilities: Vec<f32> = outputs[0].try_extract_array::<f32>()?.iter().copied().collect();

        if probabilities.len() != NUM_CLASSES {
            return Err(Error::OutputShape { expected: NUM_CLASSES, got: probabilities.len() });
        }
        Ok(probabilities)
    }
}
