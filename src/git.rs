//! Repository metadata used to turn findings into hosting-provider links.
//!
//! `RepositoryContext::resolve` issues the four git queries in order and
//! stops at the first failure. The `GitQueries` trait keeps the shell out
//! of tests.

use crate::error::{GitError, GitQuery};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Synchronous git metadata queries rooted at a project directory.
pub trait GitQueries {
    fn root_path(&self) -> Result<String, GitError>;
    fn remote_url(&self) -> Result<String, GitError>;
    fn current_branch(&self) -> Result<String, GitError>;
    fn branch_hash(&self, branch: &str) -> Result<String, GitError>;
}

/// Immutable snapshot of the repository taken once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    /// Absolute path of the working tree, without a trailing slash.
    pub root_path: String,
    /// Origin remote with any `.git` suffix removed.
    pub remote_url: String,
    /// Commit hash of the checked-out branch.
    pub branch_hash: String,
}

impl RepositoryContext {
    /// Query root, remote, branch and branch hash, in that order.
    pub fn resolve<G: GitQueries + ?Sized>(git: &G) -> Result<Self, GitError> {
        let root_path = trim_trailing_slash(&git.root_path()?);
        let remote_url = normalize_remote_url(&git.remote_url()?);
        let branch = git.current_branch()?;
        let branch_hash = git.branch_hash(&branch)?;
        log::debug!("Repository root: {root_path}");
        log::debug!("Remote url: {remote_url}");
        log::debug!("Branch {branch} at {branch_hash}");
        Ok(Self {
            root_path,
            remote_url,
            branch_hash,
        })
    }
}

/// Strip the `.git` suffix (case-sensitive) from a remote url.
///
/// Repeated suffixes are all removed so that normalizing twice is the same
/// as normalizing once.
pub fn normalize_remote_url(url: &str) -> String {
    let mut out = url.trim();
    while let Some(stripped) = out.strip_suffix(".git") {
        out = stripped;
    }
    out.to_string()
}

fn trim_trailing_slash(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Opens `GitQueries` for a project directory.
pub trait GitProvider {
    fn open(&self, project_path: &Path) -> Box<dyn GitQueries>;
}

/// Provides `GitShell` helpers.
#[derive(Debug, Default)]
pub struct GitShellProvider;

impl GitProvider for GitShellProvider {
    fn open(&self, project_path: &Path) -> Box<dyn GitQueries> {
        Box::new(GitShell::new(project_path))
    }
}

/// `GitQueries` backed by the `git` executable.
pub struct GitShell {
    dir: PathBuf,
}

impl GitShell {
    pub fn new(project_path: &Path) -> Self {
        Self {
            dir: project_path.to_path_buf(),
        }
    }

    fn run(&self, query: GitQuery, args: &[&str]) -> Result<String, GitError> {
        log::debug!("$ git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| GitError::new(query, format!("failed to run git: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GitError::new(
                query,
                format!("git {} exited with {}: {}", args.join(" "), output.status, stderr),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitQueries for GitShell {
    fn root_path(&self) -> Result<String, GitError> {
        self.run(GitQuery::RootPath, &["rev-parse", "--show-toplevel"])
    }

    fn remote_url(&self) -> Result<String, GitError> {
        self.run(GitQuery::RemoteUrl, &["config", "--get", "remote.origin.url"])
    }

    fn current_branch(&self) -> Result<String, GitError> {
        self.run(GitQuery::CurrentBranch, &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn branch_hash(&self, branch: &str) -> Result<String, GitError> {
        self.run(GitQuery::BranchHash, &["rev-parse", branch])
    }
}
