use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Runtime settings for the web front-end and the CLI.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Path to the ONNX export of the trained classifier.
    pub model_path: PathBuf,
    /// Directory holding the gallery example photos.
    pub gallery_dir: PathBuf,
    /// Largest request body accepted by `POST /classify`.
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "127.0.0.1:8501".into(),
            model_path: PathBuf::from("cucumber_leaf_disease_mobilenetv2_89.onnx"),
            gallery_dir: PathBuf::from("img"),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Deserializes a config from a JSON file.
    pub fn load_json(path: &Path) -> Result<AppConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: AppConfig = serde_json::from_reader(reader)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(Error::Config("bind_addr must not be empty".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "gallery_dir": "assets/examples" }}"#).unwrap();

        let config = AppConfig::load_json(file.path()).unwrap();
        assert_eq!(config.gallery_dir, PathBuf::from("assets/examples"));
        assert_eq!(config.bind_addr, AppConfig::default().bind_addr);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "model_path = 'x'").unwrap();
        assert!(matches!(AppConfig::load_json(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn zero_upload_limit_is_rejected() {
        let config = AppConfig { max_upload_bytes: 0, ..AppConfig::default() };
        assert!(config.validate().is_err());
    }
}
