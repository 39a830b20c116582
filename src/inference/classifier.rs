use ndarray::Array4;

use crate::error::Result;

/// Anything that turns a preprocessed batch into class probabilities.
///
/// `predict` receives the `[1, 224, 224, 3]` tensor produced by
/// `preprocess::preprocess` and returns one probability per class, in
/// `ClassLabel::ALL` order. Implementations are shared read-only across
/// requests, hence `Send + Sync`.
pub trait Classifier: Send + Sync {
    fn predict(&self, batch: &Array4<f32>) -> Result<Vec<f32>>;
}

impl<C: Classifier + ?Sized> Classifier for std::sync::Arc<C> {
    fn predict(&self, batch: &Array4<f32>) -> Result<Vec<f32>> {
        (**self).predict(batch)
    }
}
