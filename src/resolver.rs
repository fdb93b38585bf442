//! Locates the SwiftLint executable before the lint run.
//!
//! Explicit paths are only checked for existence. With `auto`, the tiers
//! run in order and the first hit wins:
//! 1. common package-manager locations under the project,
//! 2. a recursive project search that never enters skipped directories,
//! 3. the executable search path,
//! 4. `brew install`, followed by another search-path lookup.
//!
//! Only the last tier can fail the resolution.

use crate::error::ResolveError;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

pub const BINARY_NAME: &str = "swiftlint";
pub const AUTO_SENTINEL: &str = "auto";

/// Project-relative directories checked before any search.
pub const DEFAULT_COMMON_LOCATIONS: [&str; 2] = ["Pods/Swiftlint", "Pods/SwiftLint"];
/// Directory names the recursive search never descends into.
pub const DEFAULT_SKIP_DIRS: [&str; 1] = [".git"];

/// How the binary path input should be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinarySpec {
    Auto,
    Explicit(String),
}

impl BinarySpec {
    pub fn parse(input: &str) -> BinarySpec {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == AUTO_SENTINEL {
            BinarySpec::Auto
        } else {
            BinarySpec::Explicit(trimmed.to_string())
        }
    }
}

/// Which tier produced the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Explicit,
    CommonLocation,
    ProjectSearch,
    SearchPath,
    Installed,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tier::Explicit => "specified path",
            Tier::CommonLocation => "common location",
            Tier::ProjectSearch => "project search",
            Tier::SearchPath => "PATH",
            Tier::Installed => "installation",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryLocation {
    pub path: PathBuf,
    pub tier: Tier,
}

/// Resolution result. `warning` carries a non-fatal version lookup failure.
#[derive(Debug)]
pub struct ResolvedBinary {
    pub location: BinaryLocation,
    pub warning: Option<ResolveError>,
}

/// System access needed by the later tiers.
pub trait Toolchain {
    /// Look `name` up on the executable search path.
    fn lookup(&self, name: &str) -> Option<PathBuf>;
    /// Version string reported by the binary.
    fn version(&self, binary: &Path) -> Result<String, ResolveError>;
    /// Install `name` with the system package manager.
    fn install(&self, name: &str) -> Result<(), ResolveError>;
}

/// `Toolchain` backed by `which`, the binary itself and Homebrew.
#[derive(Debug, Default)]
pub struct SystemToolchain;

impl Toolchain for SystemToolchain {
    fn lookup(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn version(&self, binary: &Path) -> Result<String, ResolveError> {
        let tool = binary.to_string_lossy().to_string();
        let output = Command::new(binary)
            .arg("--version")
            .output()
            .map_err(|e| ResolveError::Version {
                tool: tool.clone(),
                reason: e.to_string(),
            })?;
        let combined = combined_output(&output);
        if !output.status.success() {
            return Err(ResolveError::Version {
                tool,
                reason: format!("exited with {}: {}", output.status, combined),
            });
        }
        Ok(combined)
    }

    fn install(&self, name: &str) -> Result<(), ResolveError> {
        log::debug!("$ brew install {name}");
        let output = Command::new("brew")
            .args(["install", name])
            .output()
            .map_err(|e| ResolveError::InstallFailed {
                tool: name.to_string(),
                output: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(ResolveError::InstallFailed {
                tool: name.to_string(),
                output: combined_output(&output),
            });
        }
        Ok(())
    }
}

fn combined_output(output: &std::process::Output) -> String {
    let mut s = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let err = String::from_utf8_lossy(&output.stderr);
    let err = err.trim();
    if !err.is_empty() {
        if !s.is_empty() {
            s.push('\n');
        }
        s.push_str(err);
    }
    s
}

/// Runs the resolution tiers against one project directory.
pub struct Resolver<'a, T: Toolchain + ?Sized> {
    project: &'a Path,
    toolchain: &'a T,
    common_locations: Vec<String>,
    skip_dirs: Vec<String>,
}

impl<'a, T: Toolchain + ?Sized> Resolver<'a, T> {
    pub fn new(project: &'a Path, toolchain: &'a T) -> Self {
        Self {
            project,
            toolchain,
            common_locations: DEFAULT_COMMON_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Append extra common locations (project-relative directories).
    pub fn with_common_locations(mut self, extra: &[String]) -> Self {
        self.common_locations.extend(extra.iter().cloned());
        self
    }

    /// Append extra directory names to prune from the recursive search.
    pub fn with_skip_dirs(mut self, extra: &[String]) -> Self {
        self.skip_dirs.extend(extra.iter().cloned());
        self
    }

    pub fn resolve(&self, spec: &BinarySpec) -> Result<ResolvedBinary, ResolveError> {
        match spec {
            BinarySpec::Explicit(configured) => self.resolve_explicit(configured),
            BinarySpec::Auto => self.resolve_auto(),
        }
    }

    fn resolve_explicit(&self, configured: &str) -> Result<ResolvedBinary, ResolveError> {
        log::info!("SwiftLint binary path specified");
        let path = expand_path(configured).map_err(|source| ResolveError::ExpandPath {
            configured: configured.to_string(),
            source,
        })?;
        log::debug!("Expanded {configured} to {}", path.display());
        if !path.is_file() {
            return Err(ResolveError::ExplicitPathMissing {
                configured: configured.to_string(),
            });
        }
        Ok(ResolvedBinary {
            location: BinaryLocation {
                path,
                tier: Tier::Explicit,
            },
            warning: None,
        })
    }

    fn resolve_auto(&self) -> Result<ResolvedBinary, ResolveError> {
        log::info!("Automatic binary search specified");

        if let Some(path) = self.check_common_locations() {
            return Ok(self.found(path, Tier::CommonLocation));
        }
        if let Some(path) = self.search_project() {
            return Ok(self.found(path, Tier::ProjectSearch));
        }
        log::warn!(
            "Failed to locate SwiftLint binary in project directory ({})",
            self.project.display()
        );

        log::info!("Checking if SwiftLint is installed");
        let (path, tier) = match self.toolchain.lookup(BINARY_NAME) {
            Some(path) => (path, Tier::SearchPath),
            None => {
                log::info!("SwiftLint is not installed");
                log::info!("Installing SwiftLint");
                self.toolchain.install(BINARY_NAME)?;
                let path = self.toolchain.lookup(BINARY_NAME).ok_or_else(|| {
                    ResolveError::NotFoundAfterInstall {
                        tool: BINARY_NAME.to_string(),
                    }
                })?;
                (path, Tier::Installed)
            }
        };

        let warning = match self.toolchain.version(&path) {
            Ok(version) => {
                log::info!("SwiftLint version {version} found at: {}", path.display());
                None
            }
            Err(err) => Some(err),
        };
        Ok(ResolvedBinary {
            location: BinaryLocation { path, tier },
            warning,
        })
    }

    fn found(&self, path: PathBuf, tier: Tier) -> ResolvedBinary {
        log::info!("SwiftLint binary found ({tier}): {}", path.display());
        ResolvedBinary {
            location: BinaryLocation { path, tier },
            warning: None,
        }
    }

    fn check_common_locations(&self) -> Option<PathBuf> {
        self.common_locations
            .iter()
            .map(|dir| self.project.join(dir).join(BINARY_NAME))
            .inspect(|candidate| log::debug!("Checking {}", candidate.display()))
            .find(|candidate| candidate.is_file())
            .and_then(|candidate| std::path::absolute(candidate).ok())
    }

    /// First regular file named like the binary; skipped directories are
    /// pruned and the walk stops at the first match.
    fn search_project(&self) -> Option<PathBuf> {
        log::debug!("Searching {} for {BINARY_NAME}", self.project.display());
        let found = WalkDir::new(self.project)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.depth() > 0
                    && entry.file_type().is_dir()
                    && self
                        .skip_dirs
                        .iter()
                        .any(|skip| entry.file_name() == skip.as_str()))
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::debug!("Skipping directory entry: {err}");
                    None
                }
            })
            .find(|entry| entry.file_type().is_file() && entry.file_name() == BINARY_NAME)?;
        std::path::absolute(found.path()).ok()
    }
}

/// Expand a leading `~` and make the path absolute.
pub fn expand_path(input: &str) -> std::io::Result<PathBuf> {
    let expanded = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            let home = dirs::home_dir().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "home directory is unknown")
            })?;
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(input),
    };
    std::path::absolute(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Default)]
    struct FakeToolchain {
        on_path: RefCell<Option<PathBuf>>,
        installs_to: Option<PathBuf>,
        install_fails: bool,
        version_fails: bool,
        calls: RefCell<Vec<&'static str>>,
    }

    impl Toolchain for FakeToolchain {
        fn lookup(&self, _name: &str) -> Option<PathBuf> {
            self.calls.borrow_mut().push("lookup");
            self.on_path.borrow().clone()
        }

        fn version(&self, _binary: &Path) -> Result<String, ResolveError> {
            self.calls.borrow_mut().push("version");
            if self.version_fails {
                Err(ResolveError::Version {
                    tool: BINARY_NAME.into(),
                    reason: "no output".into(),
                })
            } else {
                Ok("0.57.0".into())
            }
        }

        fn install(&self, name: &str) -> Result<(), ResolveError> {
            self.calls.borrow_mut().push("install");
            if self.install_fails {
                return Err(ResolveError::InstallFailed {
                    tool: name.into(),
                    output: "brew: command not found".into(),
                });
            }
            *self.on_path.borrow_mut() = self.installs_to.clone();
            Ok(())
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"#!/bin/sh\n").unwrap();
    }

    #[test]
    fn test_binary_spec_sentinel() {
        assert_eq!(BinarySpec::parse("auto"), BinarySpec::Auto);
        assert_eq!(BinarySpec::parse(""), BinarySpec::Auto);
        assert_eq!(
            BinarySpec::parse("./bin/swiftlint"),
            BinarySpec::Explicit("./bin/swiftlint".into())
        );
    }

    #[test]
    fn test_common_location_short_circuits() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("Pods/Swiftlint/swiftlint"));
        // A second copy deeper in the tree must not win
        touch(&dir.path().join("Tools/bin/swiftlint"));
        let tc = FakeToolchain::default();
        let res = Resolver::new(dir.path(), &tc).resolve(&BinarySpec::Auto).unwrap();
        assert_eq!(res.location.tier, Tier::CommonLocation);
        assert!(res.location.path.ends_with("Pods/Swiftlint/swiftlint"));
        assert!(tc.calls.borrow().is_empty());
        assert!(res.warning.is_none());
    }

    #[test]
    fn test_project_search_finds_nested_binary() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("Tools/bin/swiftlint"));
        let tc = FakeToolchain::default();
        let res = Resolver::new(dir.path(), &tc).resolve(&BinarySpec::Auto).unwrap();
        assert_eq!(res.location.tier, Tier::ProjectSearch);
        assert!(res.location.path.ends_with("Tools/bin/swiftlint"));
        assert!(res.location.path.is_absolute());
        assert!(tc.calls.borrow().is_empty());
    }

    #[test]
    fn test_search_prunes_git_directory() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join(".git/hooks/swiftlint"));
        // A directory with the binary's name is not a match either
        fs::create_dir_all(dir.path().join("swiftlint")).unwrap();
        let tc = FakeToolchain {
            on_path: RefCell::new(Some(PathBuf::from("/usr/local/bin/swiftlint"))),
            ..Default::default()
        };
        let res = Resolver::new(dir.path(), &tc).resolve(&BinarySpec::Auto).unwrap();
        assert_eq!(res.location.tier, Tier::SearchPath);
        assert_eq!(res.location.path, PathBuf::from("/usr/local/bin/swiftlint"));
        assert_eq!(*tc.calls.borrow(), vec!["lookup", "version"]);
    }

    #[test]
    fn test_extra_skip_dirs_are_pruned() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("DerivedData/swiftlint"));
        let tc = FakeToolchain {
            on_path: RefCell::new(Some(PathBuf::from("/opt/bin/swiftlint"))),
            ..Default::default()
        };
        let res = Resolver::new(dir.path(), &tc)
            .with_skip_dirs(&["DerivedData".to_string()])
            .resolve(&BinarySpec::Auto)
            .unwrap();
        assert_eq!(res.location.tier, Tier::SearchPath);
    }

    #[test]
    fn test_extra_common_location() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("vendor/lint/swiftlint"));
        let tc = FakeToolchain::default();
        let res = Resolver::new(dir.path(), &tc)
            .with_common_locations(&["vendor/lint".to_string()])
            .resolve(&BinarySpec::Auto)
            .unwrap();
        assert_eq!(res.location.tier, Tier::CommonLocation);
    }

    #[test]
    fn test_install_then_lookup() {
        let dir = tempdir().unwrap();
        let tc = FakeToolchain {
            installs_to: Some(PathBuf::from("/opt/homebrew/bin/swiftlint")),
            ..Default::default()
        };
        let res = Resolver::new(dir.path(), &tc).resolve(&BinarySpec::Auto).unwrap();
        assert_eq!(res.location.tier, Tier::Installed);
        assert_eq!(
            *tc.calls.borrow(),
            vec!["lookup", "install", "lookup", "version"]
        );
    }

    #[test]
    fn test_install_failure_is_fatal() {
        let dir = tempdir().unwrap();
        let tc = FakeToolchain {
            install_fails: true,
            ..Default::default()
        };
        let err = Resolver::new(dir.path(), &tc)
            .resolve(&BinarySpec::Auto)
            .unwrap_err();
        assert!(matches!(err, ResolveError::InstallFailed { .. }));
    }

    #[test]
    fn test_missing_after_install_is_fatal() {
        let dir = tempdir().unwrap();
        let tc = FakeToolchain::default();
        let err = Resolver::new(dir.path(), &tc)
            .resolve(&BinarySpec::Auto)
            .unwrap_err();
        assert!(matches!(err, ResolveError::NotFoundAfterInstall { .. }));
    }

    #[test]
    fn test_version_failure_is_a_warning() {
        let dir = tempdir().unwrap();
        let tc = FakeToolchain {
            on_path: RefCell::new(Some(PathBuf::from("/usr/bin/swiftlint"))),
            version_fails: true,
            ..Default::default()
        };
        let res = Resolver::new(dir.path(), &tc).resolve(&BinarySpec::Auto).unwrap();
        assert_eq!(res.location.tier, Tier::SearchPath);
        assert!(matches!(res.warning, Some(ResolveError::Version { .. })));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope/swiftlint");
        let configured = missing.to_string_lossy().to_string();
        let tc = FakeToolchain::default();
        let err = Resolver::new(dir.path(), &tc)
            .resolve(&BinarySpec::Explicit(configured.clone()))
            .unwrap_err();
        assert!(err.to_string().contains(&configured));
        assert!(tc.calls.borrow().is_empty());

        let present = dir.path().join("bin/swiftlint");
        touch(&present);
        let res = Resolver::new(dir.path(), &tc)
            .resolve(&BinarySpec::Explicit(present.to_string_lossy().to_string()))
            .unwrap();
        assert_eq!(res.location.tier, Tier::Explicit);
        assert_eq!(res.location.path, present);
    }

    #[test]
    fn test_expand_path_home_and_relative() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/bin/x").unwrap(), home.join("bin/x"));
        }
        assert!(expand_path("rel/x").unwrap().is_absolute());
        assert_eq!(expand_path("~user/x").unwrap().file_name().unwrap(), "x");
    }
}
