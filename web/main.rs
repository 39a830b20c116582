/// leafscan web front-end
///
/// A small browser UI for the cucumber leaf classifier, served by a
/// synchronous tiny_http server with no JavaScript framework.
///
/// Run with:
///   cargo run --bin leafscan-web --release -- --model cucumber_leaf_disease_mobilenetv2_89.onnx
/// Then open http://127.0.0.1:8501
///
/// Pages:
///   1. Home  — take or upload a leaf photo and classify it
///   2. About — disease gallery, example downloads and usage tutorial

mod handlers;
mod render;
mod routes;
mod state;
mod util;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tiny_http::Server;
use tracing::{info, warn};

use leafscan::AppConfig;
use state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long, env = "LEAFSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "LEAFSCAN_BIND")]
    bind: Option<String>,

    /// Path to the ONNX classifier
    #[arg(long, env = "LEAFSCAN_MODEL")]
    model: Option<PathBuf>,

    /// Directory containing the gallery example photos
    #[arg(long, env = "LEAFSCAN_GALLERY_DIR")]
    gallery_dir: Option<PathBuf>,

    /// Load the model on the first classify request instead of at start-up
    #[arg(long, default_value_t = false)]
    lazy_model: bool,
}

impl Args {
    fn into_config(self) -> Result<(AppConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_json(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => AppConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(model) = self.model {
            config.model_path = model;
        }
        if let Some(dir) = self.gallery_dir {
            config.gallery_dir = dir;
        }
        config.validate()?;
        Ok((config, self.lazy_model))
    }
}

fn main() -> Result<()> {
    leafscan::logging::init();

    let (config, lazy_model) = Args::parse().into_config()?;
    let state = Arc::new(AppState::new(config));

    if !lazy_model {
        state.model.preload()
            .with_context(|| format!("loading model {}", state.config.model_path.display()))?;
    }
    if !state.config.gallery_dir.is_dir() {
        warn!(dir = %state.config.gallery_dir.display(), "gallery directory missing; example images will show as not found");
    }

    let server = Server::http(&state.config.bind_addr)
        .map_err(|e| anyhow!("failed to bind {}: {}", state.config.bind_addr, e))?;

    info!("leafscan listening on http://{}", state.config.bind_addr);

    // One request at a time: classification blocks until the model returns.
    for request in server.incoming_requests() {
        routes::dispatch(request, state.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "leafscan-web", "--bind", "0.0.0.0:9000", "--model", "m.onnx", "--lazy-model",
        ]);
        let (config, lazy) = args.into_config().unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.model_path, PathBuf::from("m.onnx"));
        assert_eq!(config.gallery_dir, AppConfig::default().gallery_dir);
        assert!(lazy);
    }
}
