//! `GitShell` against a real repository. Skipped when git is unavailable.

use std::path::Path;
use std::process::Command;
use swiftlint_step::error::GitQuery;
use swiftlint_step::git::{GitQueries, GitShell, RepositoryContext};
use tempfile::tempdir;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git exec")
        .status;
    assert!(status.success(), "git {args:?} failed");
}

#[test]
fn test_resolve_from_real_repository() {
    if which::which("git").is_err() {
        return;
    }
    let dir = tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["config", "user.email", "ci@example.com"]);
    git(dir.path(), &["config", "user.name", "CI"]);
    git(dir.path(), &["commit", "-q", "--allow-empty", "-m", "init"]);
    git(
        dir.path(),
        &["remote", "add", "origin", "https://github.com/org/repo.git"],
    );

    let ctx = RepositoryContext::resolve(&GitShell::new(dir.path())).unwrap();
    let root = dir.path().canonicalize().unwrap();
    assert_eq!(Path::new(&ctx.root_path).canonicalize().unwrap(), root);
    assert_eq!(ctx.remote_url, "https://github.com/org/repo");
    assert_eq!(ctx.branch_hash.len(), 40);
    assert!(ctx.branch_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_missing_remote_names_the_query() {
    if which::which("git").is_err() {
        return;
    }
    let dir = tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    let err = RepositoryContext::resolve(&GitShell::new(dir.path())).unwrap_err();
    assert_eq!(err.query, GitQuery::RemoteUrl);
}
