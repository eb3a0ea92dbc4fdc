//! Round-trip benchmark for checkpoint conversion.
//!
//! Synthesizes a checkpoint with N questions (default 1000), exports it to
//! JSON-LD, serializes, validates, parses and imports it back, timing each
//! stage.

use std::time::{Duration, Instant};

use checkpoint_ld::{
    Agent, CheckpointBuilder, ConversionOptions, LlmRubricTrait, RegexTrait, UnifiedCheckpoint,
    from_document, parse_document, to_document, validate,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const TEMPLATE: &str = "class Answer(BaseAnswer):\n    value: str\n\n    def verify(self) -> bool:\n        return self.value == self.correct\n";

fn synthesize(count: usize) -> UnifiedCheckpoint {
    let mut builder = CheckpointBuilder::new()
        .name("Synthetic benchmark")
        .description("Generated questions for conversion timing")
        .global_trait(LlmRubricTrait::boolean("concise"))
        .global_trait(RegexTrait::new("no apology", "(?i)sorry|apolog"));

    for i in 0..count {
        builder = builder.item(format!("q{i:06}"), |q| {
            let mut q = q
                .question(format!("Synthetic question number {i}: what is {i} squared?"))
                .raw_answer((i * i).to_string())
                .template(TEMPLATE)
                .finished(i % 3 == 0)
                .last_modified("2024-06-01T12:00:00.000Z")
                .rubric_trait(LlmRubricTrait::score("accuracy", 1.0, 5.0))
                .custom("batch", format!("{}", i / 100));
            if i % 10 == 0 {
                q = q
                    .author(Agent::person(format!("Curator {}", i % 7)))
                    .keyword("arithmetic");
            }
            q
        });
    }
    builder.build()
}

fn throughput(bytes: usize, elapsed: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let count: usize = std::env::args()
        .nth(1)
        .map(|s| s.parse().expect("item count must be a number"))
        .unwrap_or(1000);

    let build_start = Instant::now();
    let checkpoint = synthesize(count);
    println!("Synthesized {} questions in {:?}", checkpoint.len(), build_start.elapsed());

    let options = ConversionOptions {
        validate_output: false,
        ..ConversionOptions::default()
    };

    let export_start = Instant::now();
    let doc = to_document(&checkpoint, &options).expect("Failed to export");
    let export_time = export_start.elapsed();
    println!(
        "\nExport: {} items, {} ratings in {:?}",
        doc.data_feed_element.len(),
        doc.rating_count(),
        export_time
    );

    let serialize_start = Instant::now();
    let json = serde_json::to_string(&doc).expect("Failed to serialize");
    let serialize_time = serialize_start.elapsed();
    println!("Serialize: {} bytes in {:?}", json.len(), serialize_time);
    println!("  Throughput: {:.2} MB/s", throughput(json.len(), serialize_time));

    let value: serde_json::Value = serde_json::from_str(&json).expect("Failed to reparse");
    let validate_start = Instant::now();
    validate(&value).expect("Exported document failed validation");
    let validate_time = validate_start.elapsed();
    println!("Validate: {:?}", validate_time);

    let parse_start = Instant::now();
    let parsed = parse_document(&json).expect("Failed to parse document");
    let parse_time = parse_start.elapsed();
    println!("Parse: {:?}", parse_time);
    println!("  Throughput: {:.2} MB/s", throughput(json.len(), parse_time));

    let import_start = Instant::now();
    let restored = from_document(&parsed).expect("Failed to import");
    let import_time = import_start.elapsed();
    println!("Import: {} questions in {:?}", restored.len(), import_time);

    assert_eq!(restored.len(), checkpoint.len(), "question count changed");
    assert_eq!(restored.checkpoint, checkpoint.checkpoint, "items changed");

    let total = export_time + serialize_time + validate_time + parse_time + import_time;
    println!("\nTotal round trip: {:?}", total);
    info!(questions = count, bytes = json.len(), ?total, "round trip verified");
}
