//! Parser for SwiftLint's `path:line:col: severity: message` lines.

use crate::error::ParseError;
use log::Level;
use std::num::NonZeroU64;

/// Severity reported by the analyzer. Unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Other(String),
}

impl Severity {
    /// Log level a finding of this severity is emitted at.
    pub fn level(&self) -> Level {
        match self {
            Severity::Error => Level::Error,
            Severity::Warning => Level::Warn,
            Severity::Other(_) => Level::Info,
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s {
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            other => Severity::Other(other.to_string()),
        }
    }
}

/// One analyzer finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLine {
    /// Path with the repository root prefix removed; keeps its leading `/`.
    pub relative_path: String,
    pub line: u64,
    pub column: u64,
    pub severity: Severity,
    /// Everything after the severity field, colons included.
    pub message: String,
}

/// Parse one raw output line.
///
/// The root prefix strip is literal: a path outside `root_path` comes back
/// unchanged.
///
/// ```
/// use swiftlint_step::diagnostic::{parse_line, Severity};
///
/// let d = parse_line("/repo/A.swift:3:1: error: Force Cast Violation: avoid", "/repo").unwrap();
/// assert_eq!(d.relative_path, "/A.swift");
/// assert_eq!(d.severity, Severity::Error);
/// assert_eq!(d.message, " Force Cast Violation: avoid");
/// ```
pub fn parse_line(raw: &str, root_path: &str) -> Result<DiagnosticLine, ParseError> {
    let raw = raw.strip_suffix('\r').unwrap_or(raw);
    let fields: Vec<&str> = raw.split(':').collect();
    if fields.len() < 5 {
        return Err(ParseError::UnexpectedFormat);
    }

    let relative_path = fields[0]
        .strip_prefix(root_path)
        .unwrap_or(fields[0])
        .to_string();
    // Positions are 1-based; `0` is rejected like any other bad number.
    let line = fields[1]
        .parse::<NonZeroU64>()
        .map_err(|_| ParseError::LineNumber(fields[1].to_string()))?
        .get();
    let column = fields[2]
        .parse::<NonZeroU64>()
        .map_err(|_| ParseError::ColumnNumber(fields[2].to_string()))?
        .get();
    let severity = Severity::from(fields[3].trim());
    let message = fields[4..].join(":");

    Ok(DiagnosticLine {
        relative_path,
        line,
        column,
        severity,
        message,
    })
}
