//! Converts a checkpoint file to the other format and prints a summary.
//!
//! ```text
//! cargo run --example convert_file -- checkpoint.json [out.json]
//! ```

use std::fs;

use checkpoint_ld::{
    CheckpointFormat, ConversionOptions, detect_format, from_document, parse_document,
    to_document, validate,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "checkpoint.json".to_string());
    let out_path = args.next();

    println!("Reading: {}", path);
    let text = fs::read_to_string(&path).expect("Failed to read file");
    println!("File size: {} bytes", text.len());

    let value: serde_json::Value = serde_json::from_str(&text).expect("Failed to parse JSON");

    let output = match detect_format(&value) {
        Some(CheckpointFormat::Internal) => {
            println!("Format: internal v2.0 checkpoint");
            let checkpoint = checkpoint_ld::parse_checkpoint(&text).expect("Failed to decode checkpoint");
            let global = checkpoint.global_rubric.as_ref().map_or(0, |r| r.len());
            println!("Questions: {}", checkpoint.len());
            println!("Global rubric traits: {}", global);

            let doc = to_document(&checkpoint, &ConversionOptions::format_conversion())
                .expect("Failed to export");
            println!("\n=== Exported JSON-LD ===");
            println!("Feed items: {}", doc.data_feed_element.len());
            println!("Ratings: {}", doc.rating_count());
            serde_json::to_string_pretty(&doc).expect("Failed to serialize document")
        }
        Some(CheckpointFormat::External) => {
            println!("Format: JSON-LD DataFeed");
            if let Err(e) = validate(&value) {
                println!("\n=== Validation failed ===\n{}", e);
                std::process::exit(1);
            }
            let doc = parse_document(&text).expect("Failed to decode document");
            let checkpoint = from_document(&doc).expect("Failed to import");
            println!("\n=== Imported checkpoint ===");
            println!("Questions: {}", checkpoint.len());
            for (id, item) in checkpoint.checkpoint.iter().take(10) {
                let preview: String = item.question.chars().take(60).collect();
                println!("  [{}] {} (finished: {})", id, preview, item.finished);
            }
            if checkpoint.len() > 10 {
                println!("  ... and {} more", checkpoint.len() - 10);
            }
            serde_json::to_string_pretty(&checkpoint).expect("Failed to serialize checkpoint")
        }
        None => {
            println!("Unrecognized checkpoint format");
            std::process::exit(2);
        }
    };

    if let Some(out_path) = out_path {
        fs::write(&out_path, output).expect("Failed to write output");
        println!("\nWrote: {}", out_path);
    }
}
