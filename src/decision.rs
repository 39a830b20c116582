//! Turns a probability vector into what the user is told.
//!
//! The top class is accepted only when its probability reaches
//! `CONFIDENCE_THRESHOLD`; below that the image is rejected and the user is
//! asked for a clearer photo, whatever the arg-max label was.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::labels::{ClassLabel, NUM_CLASSES};

/// Minimum top-class probability for a prediction to be shown.
pub const CONFIDENCE_THRESHOLD: f32 = 0.70;

pub const SUCCESS_MESSAGE: &str = "Analysis complete!";
pub const HEALTHY_MESSAGE: &str = "The leaf looks healthy! Keep up the good care.";
pub const REJECTION_MESSAGE: &str =
    "The model could not recognise this image with enough confidence.";
pub const REJECTION_HINT: &str = "Please make sure the image is a clear, in-focus cucumber leaf.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: ClassLabel,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label")]
pub enum Guidance {
    Healthy,
    Disease(ClassLabel),
}

impl Guidance {
    pub fn for_label(label: ClassLabel) -> Guidance {
        if label.is_healthy() { Guidance::Healthy } else { Guidance::Disease(label) }
    }

    /// Guidance text. Disease names are wrapped in `**` for emphasis; the
    /// web front-end renders that as bold.
    pub fn message(&self) -> String {
        match self {
            Guidance::Healthy => HEALTHY_MESSAGE.to_owned(),
            Guidance::Disease(label) => format!(
                "Detected disease **{}**. See the About page for more information about this disease.",
                label
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Classified { prediction: PredictionResult, guidance: Guidance },
    Rejected { confidence: f32 },
}

impl Outcome {
    pub fn confidence(&self) -> f32 {
        match self {
            Outcome::Classified { prediction, .. } => prediction.confidence,
            Outcome::Rejected { confidence } => *confidence,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected { .. })
    }
}

/// The outcome plus the whole distribution, highest probability first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub outcome: Outcome,
    pub ranked: Vec<(ClassLabel, f32)>,
}

/// Index and value of the largest entry.
///
/// The first index wins ties and NaN never wins. Returns `None` for an empty
/// slice or one that is all NaN.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

pub fn decide(probabilities: &[f32]) -> Result<Decision> {
    if probabilities.len() != NUM_CLASSES {
        return Err(Error::OutputShape { expected: NUM_CLASSES, got: probabilities.len() });
    }

    let outcome = match argmax(probabilities) {
        Some((index, confidence)) if confidence >= CONFIDENCE_THRESHOLD => {
            // index < NUM_CLASSES because the length was checked above
            let label = ClassLabel::ALL[index];
            Outcome::Classified {
                prediction: PredictionResult { label, confidence },
                guidance: Guidance::for_label(label),
            }
        }
        Some((_, confidence)) => Outcome::Rejected { confidence },
        None => Outcome::Rejected { confidence: 0.0 },
    };

    Ok(Decision { outcome, ranked: rank(probabilities) })
}

fn rank(probabilities: &[f32]) -> Vec<(ClassLabel, f32)> {
    let mut ranked: Vec<(ClassLabel, f32)> = ClassLabel::ALL
        .iter()
        .copied()
        .zip(probabilities.iter().copied())
        .collect();
    // NaN sinks to the bottom; the stable sort keeps label order among
    // equal probabilities
    ranked.sort_by(|a, b| a.1.is_nan().cmp(&b.1.is_nan()).then_with(|| b.1.total_cmp(&a.1)));
    ranked
}

/// Formats a probability as a percentage with two decimals, e.g. `80.00%`.
pub fn format_confidence(confidence: f32) -> String {
    format!("{:.2}%", confidence * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_is_rejected() {
        let d = decide(&[0.1, 0.1, 0.1, 0.65, 0.05]).unwrap();
        assert_eq!(d.outcome, Outcome::Rejected { confidence: 0.65 });
    }

    #[test]
    fn confident_fresh_leaf_is_healthy() {
        let d = decide(&[0.05, 0.05, 0.05, 0.80, 0.05]).unwrap();
        match d.outcome {
            Outcome::Classified { prediction, guidance } => {
                assert_eq!(prediction.label, ClassLabel::FreshLeaf);
                assert!((prediction.confidence - 0.80).abs() < 1e-6);
                assert_eq!(guidance, Guidance::Healthy);
                assert_eq!(guidance.message(), HEALTHY_MESSAGE);
            }
            other => panic!("expected classification, got {:?}", other),
        }
    }

    #[test]
    fn confident_disease_gets_a_warning() {
        for label in ClassLabel::ALL.iter().filter(|l| !l.is_healthy()) {
            let mut probs = [0.0f32; NUM_CLASSES];
            probs[label.index()] = 0.9;
            let d = decide(&probs).unwrap();
            match d.outcome {
                Outcome::Classified { guidance, .. } => {
                    assert_eq!(guidance, Guidance::Disease(*label));
                    assert!(guidance.message().contains(&format!("**{}**", label.name())));
                }
                other => panic!("expected classification, got {:?}", other),
            }
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let d = decide(&[0.70, 0.10, 0.10, 0.05, 0.05]).unwrap();
        assert!(!d.outcome.is_rejected());
    }

    #[test]
    fn rejection_ignores_which_label_won() {
        for i in 0..NUM_CLASSES {
            let mut probs = [0.1f32; NUM_CLASSES];
            probs[i] = 0.6;
            assert!(decide(&probs).unwrap().outcome.is_rejected());
        }
    }

    #[test]
    fn argmax_takes_first_of_ties_and_skips_nan() {
        assert_eq!(argmax(&[0.3, 0.5, 0.5]), Some((1, 0.5)));
        assert_eq!(argmax(&[f32::NAN, 0.2, 0.1]), Some((1, 0.2)));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[f32::NAN]), None);
    }

    #[test]
    fn argmax_index_is_always_a_label() {
        let vectors: [[f32; NUM_CLASSES]; 4] = [
            [0.2; NUM_CLASSES],
            [0.0, 0.0, 0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0, 0.0, 0.0],
            [0.1, 0.3, 0.2, 0.3, 0.1],
        ];
        for v in vectors {
            let (i, _) = argmax(&v).unwrap();
            assert!(ClassLabel::from_index(i).is_some());
        }
    }

    #[test]
    fn wrong_length_is_an_error() {
        assert!(matches!(
            decide(&[0.5, 0.5]),
            Err(Error::OutputShape { expected: 5, got: 2 })
        ));
    }

    #[test]
    fn ranked_is_descending() {
        let d = decide(&[0.05, 0.6, 0.2, 0.1, 0.05]).unwrap();
        assert_eq!(d.ranked[0].0, ClassLabel::BacterialWilt);
        assert_eq!(d.ranked[1].0, ClassLabel::DownyMildew);
        assert!(d.ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(d.ranked.len(), NUM_CLASSES);
    }

    #[test]
    fn nan_is_ranked_last_and_never_accepted() {
        let d = decide(&[f32::NAN, 0.8, 0.1, f32::NAN, 0.1]).unwrap();
        assert_eq!(d.outcome.confidence(), 0.8);
        let order: Vec<ClassLabel> = d.ranked.iter().map(|(l, _)| *l).collect();
        assert_eq!(order, vec![
            ClassLabel::BacterialWilt,
            ClassLabel::DownyMildew,
            ClassLabel::GummyStemBlight,
            ClassLabel::Anthracnose,
            ClassLabel::FreshLeaf,
        ]);
        assert!(d.ranked[3].1.is_nan() && d.ranked[4].1.is_nan());
    }

    #[test]
    fn top_label_matches_argmax_for_every_index() {
        for i in 0..NUM_CLASSES {
            let mut probs = [0.05f32; NUM_CLASSES];
            probs[i] = 0.8;
            match decide(&probs).unwrap().outcome {
                Outcome::Classified { prediction, .. } => {
                    assert_eq!(prediction.label, ClassLabel::ALL[i]);
                }
                other => panic!("expected classification, got {:?}", other),
            }
        }
    }

    #[test]
    fn confidence_formats_as_percentage() {
        assert_eq!(format_confidence(0.8), "80.00%");
        assert_eq!(format_confidence(0.65432), "65.43%");
    }
}
