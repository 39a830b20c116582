use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of classes the model was trained on.
pub const NUM_CLASSES: usize = 5;

/// One of the five categories the leaf model distinguishes.
///
/// The variant order is the model's output order: index `i` of the
/// probability vector belongs to `ClassLabel::ALL[i]`. The training folders
/// were read alphabetically, so do not reorder these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassLabel {
    #[serde(rename = "Anthracnose")]
    Anthracnose,
    #[serde(rename = "Bacterial Wilt")]
    BacterialWilt,
    #[serde(rename = "Downy Mildew")]
    DownyMildew,
    #[serde(rename = "Fresh Leaf")]
    FreshLeaf,
    #[serde(rename = "Gummy Stem Blight")]
    GummyStemBlight,
}

impl ClassLabel {
    pub const ALL: [ClassLabel; NUM_CLASSES] = [
        ClassLabel::Anthracnose,
        ClassLabel::BacterialWilt,
        ClassLabel::DownyMildew,
        ClassLabel::FreshLeaf,
        ClassLabel::GummyStemBlight,
    ];

    pub fn from_index(index: usize) -> Option<ClassLabel> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The class name exactly as it was spelled in the training data.
    pub fn name(self) -> &'static str {
        match self {
            ClassLabel::Anthracnose     => "Anthracnose",
            ClassLabel::BacterialWilt   => "Bacterial Wilt",
            ClassLabel::DownyMildew     => "Downy Mildew",
            ClassLabel::FreshLeaf       => "Fresh Leaf",
            ClassLabel::GummyStemBlight => "Gummy Stem Blight",
        }
    }

    /// Indonesian common name, shown next to the class name in the gallery.
    pub fn local_name(self) -> &'static str {
        match self {
            ClassLabel::Anthracnose     => "Antraknosa",
            ClassLabel::BacterialWilt   => "Layu Bakteri",
            ClassLabel::DownyMildew     => "Embun Bulu",
            ClassLabel::FreshLeaf       => "Daun Sehat",
            ClassLabel::GummyStemBlight => "Busuk Batang Bergetah",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ClassLabel::Anthracnose     => "anthracnose",
            ClassLabel::BacterialWilt   => "bacterial-wilt",
            ClassLabel::DownyMildew     => "downy-mildew",
            ClassLabel::FreshLeaf       => "fresh-leaf",
            ClassLabel::GummyStemBlight => "gummy-stem-blight",
        }
    }

    pub fn from_slug(slug: &str) -> Option<ClassLabel> {
        Self::ALL.iter().copied().find(|l| l.slug() == slug)
    }

    pub fn is_healthy(self) -> bool {
        self == ClassLabel::FreshLeaf
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_training_folders() {
        let names: Vec<&str> = ClassLabel::ALL.iter().map(|l| l.name()).collect();
        assert_eq!(
            names,
            ["Anthracnose", "Bacterial Wilt", "Downy Mildew", "Fresh Leaf", "Gummy Stem Blight"]
        );
    }

    #[test]
    fn index_and_from_index_agree() {
        for (i, label) in ClassLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(ClassLabel::from_index(i), Some(*label));
        }
        assert_eq!(ClassLabel::from_index(NUM_CLASSES), None);
    }

    #[test]
    fn slugs_parse_back() {
        for label in ClassLabel::ALL {
            assert_eq!(ClassLabel::from_slug(label.slug()), Some(label));
        }
        assert_eq!(ClassLabel::from_slug("powdery-mildew"), None);
    }

    #[test]
    fn only_fresh_leaf_is_healthy() {
        let healthy: Vec<_> = ClassLabel::ALL.iter().filter(|l| l.is_healthy()).collect();
        assert_eq!(healthy, [&ClassLabel::FreshLeaf]);
    }

    #[test]
    fn serializes_as_training_name() {
        let json = serde_json::to_string(&ClassLabel::GummyStemBlight).unwrap();
        assert_eq!(json, "\"Gummy Stem Blight\"");
    }
}
