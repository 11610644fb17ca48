use super::{read_products, Settings};
use crate::output;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use tracing::info;
use vigie_core::error::VigieError;
use vigie_core::model::AnalysisResult;

/// One entry of a batch: the result, or the error with its hint.
#[derive(Serialize)]
#[serde(untagged)]
enum BatchEntry {
    Ok(Box<AnalysisResult>),
    Err {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
}

pub fn run(settings: &Settings, input_file: &Path, format: &str) -> Result<(), VigieError> {
    let analyzer = settings.analyzer()?;
    let products = read_products(input_file)?;
    info!(products = products.len(), file = %input_file.display(), "analyzing");

    let mut results = analyzer.analyze_many(&products, Utc::now());

    // A single product reports its error directly.
    if results.len() == 1 {
        let result = results.remove(0)?;
        return match format {
            "json" => output::json::print(&result),
            _ => {
                output::table::print_result(&result, settings.verbose);
                Ok(())
            }
        };
    }

    let mut failed = 0;
    let entries: Vec<BatchEntry> = results
        .into_iter()
        .map(|result| match result {
            Ok(result) => BatchEntry::Ok(Box::new(result)),
            Err(e) => {
                failed += 1;
                BatchEntry::Err {
                    error: e.to_string(),
                    hint: e.hint(),
                }
            }
        })
        .collect();

    match format {
        "json" => output::json::print(&entries)?,
        _ => {
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                match entry {
                    BatchEntry::Ok(result) => {
                        output::table::print_result(result, settings.verbose)
                    }
                    BatchEntry::Err { error, hint } => {
                        println!("=== Product #{} ===\n", i + 1);
                        println!("  Error: {error}");
                        if let Some(hint) = hint {
                            println!("  Hint: {hint}");
                        }
                    }
                }
            }
        }
    }

    if failed > 0 {
        let total = entries.len();
        eprintln!("{failed} of {total} products could not be analyzed");
    }
    Ok(())
}
