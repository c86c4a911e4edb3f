use std::env;
use std::fs;
use std::process;

use notechart::{default_difficulty, load_chart, scan_difficulties, DifficultyDescriptor};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: notechart <chart.txt> [difficulty-id]");
        process::exit(1);
    }

    let input_path = &args[1];

    // Read input file
    let text = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    let found = scan_difficulties(&text);
    if found.is_empty() {
        eprintln!("No difficulty sections found in '{}'", input_path);
        process::exit(1);
    }

    // Requested difficulty, falling back to the highest one present when
    // the argument is missing or not a known id.
    let requested: Option<u8> = args.get(2).and_then(|s| s.parse().ok());
    let difficulty: &DifficultyDescriptor = match requested.and_then(|id| found.get(&id)) {
        Some(d) => d,
        None => {
            if let Some(id) = requested {
                eprintln!("Difficulty {} not present; falling back to highest", id);
            }
            default_difficulty(&found).unwrap()
        }
    };

    let (chart, warnings) = match load_chart(&text, difficulty) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Cannot load chart: {}", e);
            process::exit(1);
        }
    };

    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }

    match serde_json::to_string_pretty(&chart) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing chart: {}", e);
            process::exit(1);
        }
    }
}
