use std::time::Instant;

use image::DynamicImage;
use tracing::debug;

use crate::decision::{decide, Decision};
use crate::error::Result;
use crate::inference::Classifier;
use crate::preprocess::{decode_input, preprocess};

/// Where the image to classify came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Camera(Vec<u8>),
    Upload(Vec<u8>),
}

impl InputSource {
    pub fn bytes(&self) -> &[u8] {
        match self {
            InputSource::Camera(b) | InputSource::Upload(b) => b,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InputSource::Camera(_) => "camera",
            InputSource::Upload(_) => "upload",
        }
    }
}

/// Picks the image to analyse. A camera capture wins over an upload; empty
/// payloads count as not provided.
pub fn select_source(camera: Option<Vec<u8>>, upload: Option<Vec<u8>>) -> Option<InputSource> {
    match (camera, upload) {
        (Some(c), _) if !c.is_empty() => Some(InputSource::Camera(c)),
        (_, Some(u)) if !u.is_empty() => Some(InputSource::Upload(u)),
        _ => None,
    }
}

/// Preprocess, predict, decide.
pub fn classify_image(image: &DynamicImage, classifier: &dyn Classifier) -> Result<Decision> {
    let t0 = Instant::now();
    let batch = preprocess(image);
    let preprocess_ms = t0.elapsed().as_secs_f64() * 1000.0;

    let t1 = Instant::now();
    let probabilities = classifier.predict(&batch)?;
    let inference_ms = t1.elapsed().as_secs_f64() * 1000.0;

    let decision = decide(&probabilities)?;
    debug!(
        preprocess_ms,
        inference_ms,
        confidence = decision.outcome.confidence(),
        rejected = decision.outcome.is_rejected(),
        "classification finished"
    );
    Ok(decision)
}

/// Decodes raw JPEG/PNG bytes and classifies them. The decoded image is
/// returned too so callers can show what was analysed.
pub fn classify_bytes(bytes: &[u8], classifier: &dyn Classifier) -> Result<(DynamicImage, Decision)> {
    let image = decode_input(bytes)?;
    let decision = classify_image(&image, classifier)?;
    Ok((image, decision))
}
