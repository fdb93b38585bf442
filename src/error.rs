//! Error types for each failure class of the step.
//!
//! Every phase has its own enum so the orchestrator can tell which phase
//! failed. `ParseError` is the only non-fatal one: the annotation sink
//! downgrades it to a verbatim pass-through of the offending line.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed or missing step inputs. Raised before any process runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("project path ({0}) does not exist or is not a directory")]
    ProjectPathMissing(PathBuf),

    #[error("generate_log is enabled but no deploy directory is configured")]
    DeployDirMissing,

    #[error("unsupported output mode `{0}` (expected human or json)")]
    InvalidOutput(String),

    #[error("failed to read config file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} is not valid: {message}")]
    ParseFile { path: PathBuf, message: String },
}

/// The git metadata query that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitQuery {
    RootPath,
    RemoteUrl,
    CurrentBranch,
    BranchHash,
}

impl std::fmt::Display for GitQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GitQuery::RootPath => "repository root path",
            GitQuery::RemoteUrl => "origin remote url",
            GitQuery::CurrentBranch => "current branch",
            GitQuery::BranchHash => "branch commit hash",
        };
        f.write_str(name)
    }
}

/// A repository metadata query failed. Fatal before dependency resolution.
#[derive(Debug, Error)]
#[error("failed to get {query}: {reason}")]
pub struct GitError {
    pub query: GitQuery,
    pub reason: String,
}

impl GitError {
    pub fn new(query: GitQuery, reason: impl Into<String>) -> Self {
        Self {
            query,
            reason: reason.into(),
        }
    }
}

/// The analyzer binary could not be located or installed.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("binary at specified path ({configured}) does not exist")]
    ExplicitPathMissing { configured: String },

    #[error("failed to expand path ({configured})")]
    ExpandPath {
        configured: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install {tool}: {output}")]
    InstallFailed { tool: String, output: String },

    #[error("{tool} is still not resolvable from PATH after installation")]
    NotFoundAfterInstall { tool: String },

    #[error("failed to get {tool} version: {reason}")]
    Version { tool: String, reason: String },
}

/// One analyzer output line did not match `path:line:col: severity: message`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected format")]
    UnexpectedFormat,

    #[error("failed to parse line number `{0}`")]
    LineNumber(String),

    #[error("failed to parse column number `{0}`")]
    ColumnNumber(String),
}

/// Running the analyzer failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start {binary}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read analyzer output")]
    Stream(#[source] std::io::Error),

    #[error("analyzer exited with {0}")]
    ExitStatus(std::process::ExitStatus),
}

/// Writing the raw log artifact failed.
#[derive(Debug, Error)]
#[error("failed to write {path}")]
pub struct ExportError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
