//! swiftlint-step core library.
//!
//! A CI step that runs SwiftLint over a project, rewrites each finding into
//! a blob link on the repository's hosting provider, and exports the raw
//! output as a log artifact.
//!
//! High-level modules:
//! - `cli`: CLI/env argument parsing (binary uses this).
//! - `config`: Config file loading, precedence and the staged config records.
//! - `git`: Repository snapshot (root, remote, branch hash).
//! - `diagnostic`: Parser for `path:line:col: severity: message` lines.
//! - `provider`: Hosting-provider detection and link formatting.
//! - `sink`: Annotating write sink and the raw-capture fan-out writer.
//! - `resolver`: Tiered search for the SwiftLint executable.
//! - `runner`: Spawns the analyzer and streams its output.
//! - `export`: Raw log artifact.
//! - `step`: Phase orchestration.
//! - `output`: Human/JSON run summary.
//! - `logging`: Console logger setup.
//! - `models`: Shared data models.
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod export;
pub mod git;
pub mod logging;
pub mod models;
pub mod output;
pub mod provider;
pub mod resolver;
pub mod runner;
pub mod sink;
pub mod step;
