//! Static disease catalogue for the About page.
//!
//! Each class has a short description, a source citation, one example photo
//! kept on disk under the gallery directory, and a link to a larger archive
//! of sample images. Example photos are re-encoded to JPEG before they are
//! served so the download is always `image/jpeg`.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageOutputFormat;
use tracing::warn;

use crate::error::{Error, Result};
use crate::labels::ClassLabel;

const JPEG_QUALITY: u8 = 90;

#[derive(Debug)]
pub struct GalleryEntry {
    pub label: ClassLabel,
    pub icon: &'static str,
    pub heading: &'static str,
    pub caption: &'static str,
    pub bullets: &'static [(&'static str, &'static str)],
    pub citation: Option<&'static str>,
    /// File name of the example photo inside the gallery directory.
    pub image_file: &'static str,
    /// File name offered to the browser on download.
    pub download_name: &'static str,
    pub archive_url: &'static str,
}

impl GalleryEntry {
    pub fn title(&self) -> String {
        format!("{} {} ({})", self.icon, self.label.name(), self.label.local_name())
    }

    pub fn image_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.image_file)
    }
}

/// Display order on the About page.
pub static GALLERY: [GalleryEntry; 5] = [
    GalleryEntry {
        label: ClassLabel::FreshLeaf,
        icon: "✅",
        heading: "Characteristics of a healthy leaf",
        caption: "Example of a healthy leaf",
        bullets: &[
            ("Overview", "A healthy leaf is the main sign of a cucumber plant that is growing well."),
            ("Colour", "Bright, fresh green spread evenly over the whole leaf surface."),
            ("Surface", "Smooth, with no spots, holes or unusual discoloration."),
            ("Edges", "Normal leaf margins that are not curled, dried out or yellowing."),
        ],
        citation: None,
        image_file: "Contoh_Fresh_Leaf.jpg",
        download_name: "contoh_fresh_leaf.jpg",
        archive_url: "https://drive.google.com/drive/folders/1brpUGbBuF1bFKgvys1rtMlsy2qhL_Y2f?usp=drive_link",
    },
    GalleryEntry {
        label: ClassLabel::Anthracnose,
        icon: "⚫",
        heading: "Disease description",
        caption: "Example of Anthracnose",
        bullets: &[
            ("Cause", "The fungus Colletotrichum lagenarium."),
            ("Symptoms", "Small brown spots on the leaf that grow until the leaf dies. \
                Stems show long dark-brown lesions; fruit shows round, wet-looking spots."),
            ("Control", "Soak seeds in a Pseudomonas fluorescens solution before planting \
                and rotate crops."),
        ],
        citation: Some("Direktorat Budidaya Tanaman Sayuran and Biofarmaka, 2008."),
        image_file: "Contoh_Anthracnose.jpg",
        download_name: "contoh_anthracnose.jpg",
        archive_url: "https://drive.google.com/drive/folders/1pQZ1mmmu_nA1rc_LHvOcWpZOMoVq8jpo?usp=drive_link",
    },
    GalleryEntry {
        label: ClassLabel::BacterialWilt,
        icon: "🍂",
        heading: "Disease description",
        caption: "Example of Bacterial Wilt",
        bullets: &[
            ("Cause", "The bacterium Ralstonia solanacearum, spread through water."),
            ("Symptoms", "The plant wilts from the shoot tip downwards until every leaf is \
                limp and the plant dies. Spreads quickly in the rainy season."),
            ("Other hosts", "Chili, tomato and potato."),
        ],
        citation: Some("Tonny, K., et al., 2014."),
        image_file: "Contoh_Bacterial_Wilt.jpg",
        download_name: "contoh_bacterial_wilt.jpg",
        archive_url: "https://drive.google.com/drive/folders/1R-huLQ5_P91xiZyZb90RmF-vJqk_dUhm?usp=drive_link",
    },
    GalleryEntry {
        label: ClassLabel::DownyMildew,
        icon: "🟡",
        heading: "Disease description",
        caption: "Example of Downy Mildew",
        bullets: &[
            ("Cause", "The fungus Pseudoperonospora cubensis."),
            ("Symptoms", "Irregular, somewhat angular yellow spots on the leaf that turn \
                reddish brown as the disease develops."),
            ("Control", "Crop rotation, proper plant spacing, field sanitation and good drainage."),
        ],
        citation: Some("Direktorat Budidaya Tanaman Sayuran and Biofarmaka, 2008."),
        image_file: "Contoh_Downy_Mildew.jpg",
        download_name: "contoh_downy_mildew.jpg",
        archive_url: "https://drive.google.com/drive/folders/1F3k_SVNxEjDTmI0sGzoY8lNYIPNqJecI?usp=drive_link",
    },
    GalleryEntry {
        label: ClassLabel::GummyStemBlight,
        icon: "🕸️",
        heading: "Disease description",
        caption: "Example of Gummy Stem Blight",
        bullets: &[
            ("Cause", "Ascomycota fungi such as Didymella bryoniae."),
            ("Symptoms", "Cut-like lesions on fruit, tendrils or lateral roots that can extend \
                into the stem, making the plant wilt and die. Usually appears as fruit ripens."),
            ("Control", "Fungicide sprays such as azoxystrobin and kresoxim-methyl, and \
                breeding resistant varieties."),
        ],
        citation: Some("Aristya, G., Rahmawati, N. and Daryono, B.S., 2017."),
        image_file: "Contoh_Gummy_Stem_Blight.jpg",
        download_name: "contoh_gummy_stem_blight.jpg",
        archive_url: "https://drive.google.com/drive/folders/18qPDBP5vzXgwBIOcsWOmWlit0Tq2Xgxf?usp=drive_link",
    },
];

/// Button order for the bulk-download links.
pub const ARCHIVE_LINKS: [(&str, ClassLabel); 5] = [
    ("Anthracnose",    ClassLabel::Anthracnose),
    ("Bacterial Wilt", ClassLabel::BacterialWilt),
    ("Downy Mildew",   ClassLabel::DownyMildew),
    ("Gummy Stem",     ClassLabel::GummyStemBlight),
    ("Fresh Leaf",     ClassLabel::FreshLeaf),
];

pub struct TutorialStep {
    pub title: &'static str,
    pub points: &'static [&'static str],
}

pub static TUTORIAL_STEPS: [TutorialStep; 2] = [
    TutorialStep {
        title: "Step 1: Prepare an image",
        points: &[
            "Open the Home page from the navigation bar.",
            "Upload an image file (JPG, JPEG, PNG) from your device.",
            "Or use the camera to photograph a cucumber leaf directly.",
            "No image at hand? Download one of the examples below.",
        ],
    },
    TutorialStep {
        title: "Step 2: Classify",
        points: &[
            "Once your image is selected, press the Classify! button.",
            "Wait a moment while the model analyses the image.",
            "The predicted class and the model's confidence are shown.",
            "If the model is not confident enough, or the image is not relevant, a message explains why.",
        ],
    },
];

pub fn entry_for(label: ClassLabel) -> &'static GalleryEntry {
    GALLERY
        .iter()
        .find(|e| e.label == label)
        .unwrap_or(&GALLERY[0])
}

pub fn archive_url(label: ClassLabel) -> &'static str {
    entry_for(label).archive_url
}

/// An example photo ready to serve.
#[derive(Debug, Clone)]
pub struct ExampleImage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Reads an entry's example photo and re-encodes it as JPEG.
pub fn load_example(dir: &Path, entry: &GalleryEntry) -> Result<ExampleImage> {
    let path = entry.image_path(dir);
    if !path.is_file() {
        return Err(Error::ExampleNotFound(path));
    }
    // decoder follows the file content; some examples are PNGs named .jpg
    let img = image::io::Reader::open(&path)?.with_guessed_format()?.decode()?;
    let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());

    let mut jpeg = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut jpeg), ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(|e| Error::Encode(e.to_string()))?;

    Ok(ExampleImage { jpeg, width: rgb.width(), height: rgb.height() })
}

/// One rendered block of the About page. A failure here is local to the
/// section.
pub struct GallerySection {
    pub entry: &'static GalleryEntry,
    pub image: Result<ExampleImage>,
}

pub fn build_sections(dir: &Path) -> Vec<GallerySection> {
    GALLERY
        .iter()
        .map(|entry| {
            let image = load_example(dir, entry);
            if let Err(e) = &image {
                warn!(label = %entry.label, error = %e, "gallery example unavailable");
            }
            GallerySection { entry, image }
        })
        .collect()
}
