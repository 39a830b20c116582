pub mod cache;
pub mod classifier;
pub mod onnx;

pub use cache::LazyModel;
pub use classifier::Classifier;
pub use onnx::OnnxClassifier;
