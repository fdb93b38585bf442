//! Run summary rendering.
//!
//! Supports `human` (default) and `json` outputs. The JSON form nests the
//! counts under `summary` next to the analyzer exit code and binary.

use crate::config::OutputMode;
use crate::models::Summary;
use crate::runner::AnalyzerRun;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

fn use_colors(output: OutputMode) -> bool {
    output != OutputMode::Json && std::env::var_os("NO_COLOR").is_none()
}

/// Print the end-of-run summary in the requested format.
pub fn print_summary(run: &AnalyzerRun, binary: &Path, output: OutputMode) {
    match output {
        OutputMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(&compose_summary_json(run, binary))
                .unwrap_or_else(|_| "{}".to_string())
        ),
        OutputMode::Human => {
            let line = compose_summary_line(&run.summary);
            if use_colors(output) {
                let s = &run.summary;
                if s.errors > 0 {
                    println!("{}", line.red().bold());
                } else if s.warnings > 0 {
                    println!("{}", line.yellow().bold());
                } else {
                    println!("{}", line.green().bold());
                }
            } else {
                println!("{line}");
            }
        }
    }
}

/// Human summary line (pure) for testing.
pub fn compose_summary_line(s: &Summary) -> String {
    format!(
        "— Summary — errors={} warnings={} others={} passthrough={}",
        s.errors, s.warnings, s.others, s.passthrough
    )
}

/// Compose summary JSON object (pure) for testing/snapshot purposes.
pub fn compose_summary_json(run: &AnalyzerRun, binary: &Path) -> JsonVal {
    json!({
        "binary": binary.to_string_lossy(),
        "exit_code": run.status.code(),
        "success": run.status.success(),
        "summary": serde_json::to_value(&run.summary).unwrap_or(JsonVal::Null),
    })
}
