use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::inference::{Classifier, OnnxClassifier};

type Loader<C> = Box<dyn Fn() -> Result<C> + Send + Sync>;

/// A model that is loaded on first use and then shared for the life of the
/// process.
///
/// The slot is filled at most once. A failed load leaves it empty, so the
/// next `get()` tries again instead of replaying the old error.
pub struct LazyModel<C> {
    loader: Loader<C>,
    slot: Mutex<Option<Arc<C>>>,
}

impl<C> LazyModel<C> {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<C> + Send + Sync + 'static,
    {
        LazyModel { loader: Box::new(loader), slot: Mutex::new(None) }
    }

    /// Returns the shared model, loading it if this is the first call.
    pub fn get(&self) -> Result<Arc<C>> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| Error::Model("model slot lock poisoned".into()))?;

        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let started = Instant::now();
        let model = match (self.loader)() {
            Ok(m) => Arc::new(m),
            Err(e) => {
                warn!(error = %e, "model load failed; will retry on next request");
                return Err(e);
            }
        };
        info!(elapsed_ms = started.elapsed().as_millis() as u64, "model cached for process lifetime");
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Loads eagerly; used at server start-up.
    pub fn preload(&self) -> Result<()> {
        self.get().map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl LazyModel<Box<dyn Classifier>> {
    /// Lazily loads the ONNX model at `path`, boxed behind the `Classifier`
    /// seam.
    pub fn onnx(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        LazyModel::new(move || {
            OnnxClassifier::load(&path).map(|c| Box::new(c) as Box<dyn Classifier>)
        })
    }
}
