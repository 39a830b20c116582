// Command-line entry point: classifies a single leaf photo with the same
// pipeline the web front-end uses.
//
//   cargo run --bin leafscan -- classify leaf.jpg --model model.onnx
//   cargo run --bin leafscan -- labels

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use leafscan::decision::{format_confidence, REJECTION_HINT, REJECTION_MESSAGE, SUCCESS_MESSAGE};
use leafscan::{classify_bytes, AppConfig, ClassLabel, OnnxClassifier, Outcome};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one JPG/JPEG/PNG image
    Classify {
        image: PathBuf,

        /// Path to the ONNX model
        #[arg(long, env = "LEAFSCAN_MODEL")]
        model: Option<PathBuf>,

        /// Print the decision as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the label order the model output is mapped onto
    Labels,
}

fn main() -> Result<()> {
    leafscan::logging::init();

    match Args::parse().command {
        Command::Labels => {
            for label in ClassLabel::ALL {
                println!("{}\t{}", label.index(), label);
            }
        }
        Command::Classify { image, model, json } => {
            let model_path = model.unwrap_or_else(|| AppConfig::default().model_path);
            let classifier = OnnxClassifier::load(&model_path)
                .with_context(|| format!("loading model {}", model_path.display()))?;
            let bytes = std::fs::read(&image)
                .with_context(|| format!("reading {}", image.display()))?;
            let (_, decision) = classify_bytes(&bytes, &classifier)
                .with_context(|| format!("classifying {}", image.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&decision)?);
                return Ok(());
            }

            match &decision.outcome {
                Outcome::Classified { prediction, guidance } => {
                    println!("{}", SUCCESS_MESSAGE);
                    println!("Result:     {}", prediction.label);
                    println!("Confidence: {}", format_confidence(prediction.confidence));
                    println!("{}", guidance.message().replace("**", ""));
                }
                Outcome::Rejected { confidence } => {
                    println!("{}", REJECTION_MESSAGE);
                    println!("{}", REJECTION_HINT);
                    println!("(top confidence {})", format_confidence(*confidence));
                }
            }
        }
    }
    Ok(())
}
