//! Example: Estimate the key of a single audio file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--json] [--average] <file>
//!
//! Prints the three most likely keys and the pitch-class profile.

use pcp_key::features::chroma::PITCH_CLASS_NAMES;
use pcp_key::{analyze_file, AnalysisConfig, ChannelMixMode, TemplateClassifier};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut json = false;
    let mut config = AnalysisConfig::default();
    let mut path: Option<String> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--average" => config.channel_mix = ChannelMixMode::Average,
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_file [--json] [--average] <file>\n\
                     \n\
                     --json      Emit the full analysis as one JSON object\n\
                     --average   Average all channels instead of using the first\n"
                );
                return Ok(());
            }
            _ => path = Some(arg),
        }
    }

    let Some(path) = path else {
        eprintln!("ERROR: Provide an audio file path. Use --help for usage.");
        std::process::exit(2);
    };

    let classifier = TemplateClassifier::new();
    let result = analyze_file(&path, &classifier, &config)?;

    if json {
        println!("{}", serde_json::to_string(&result)?);
        return Ok(());
    }

    println!("{}", path);
    println!("Key estimates:");
    for (rank, p) in result.ranked.predictions().iter().enumerate() {
        println!(
            "  {}. {:<4} {:>6.2}%  ({})",
            rank + 1,
            p.label(),
            p.probability * 100.0,
            p.key.numerical()
        );
    }

    println!("Pitch-class profile:");
    for (name, &value) in PITCH_CLASS_NAMES.iter().zip(result.profile.values()) {
        let bar = "#".repeat((value * 50.0).round() as usize);
        println!("  {:<2} {:>5.3} {}", name, value, bar);
    }

    let frames = &result.metadata.frames;
    println!(
        "Frames: {} analyzed, {} voiced, {} counted; {:.1}s audio in {:.2} ms",
        frames.analyzed,
        frames.voiced,
        frames.counted,
        result.metadata.duration_seconds,
        result.metadata.processing_time_ms
    );

    Ok(())
}
