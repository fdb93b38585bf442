//! Step inputs and the staged configuration records.
//!
//! Inputs come from CLI flags or CI environment variables (see `cli`), then
//! from an optional `swiftlint-step.toml|yaml|yml` in the project directory,
//! then from defaults:
//! - `project_path`: `.`
//! - `generate_log`, `verbose_log`, `strict_mode`: false
//! - `binary_path`: `auto`
//! - `output`: `human`
//!
//! Overrides precedence: CLI/env > config file > defaults.
//!
//! The configuration is assembled in three stages, each consuming the
//! previous one: `StepInputs` -> `RepoConfig` (repository attached) ->
//! `LintConfig` (binary attached).

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::git::RepositoryContext;
use crate::resolver::{BinaryLocation, BinarySpec};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_STEM: &str = "swiftlint-step";

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `swiftlint-step.toml|yaml`.
pub struct StepFileConfig {
    pub generate_log: Option<bool>,
    pub verbose_log: Option<bool>,
    pub strict_mode: Option<bool>,
    pub binary_path: Option<String>,
    pub lint_config_path: Option<String>,
    pub deploy_dir: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub search: Option<SearchCfg>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
/// Extra binary search settings under `[search]`, appended to the built-ins.
pub struct SearchCfg {
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub skip_dirs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "human" => Ok(OutputMode::Human),
            "json" => Ok(OutputMode::Json),
            other => Err(ConfigError::InvalidOutput(other.to_string())),
        }
    }
}

/// Load the config file from `dir` if present.
///
/// A file that exists but does not parse is an error, not a silent default.
pub fn load_config(dir: &Path) -> Result<Option<StepFileConfig>, ConfigError> {
    let toml_path = dir.join(format!("{CONFIG_FILE_STEM}.toml"));
    if toml_path.is_file() {
        let s = read(&toml_path)?;
        let cfg = toml::from_str(&s).map_err(|e| ConfigError::ParseFile {
            path: toml_path.clone(),
            message: e.to_string(),
        })?;
        return Ok(Some(cfg));
    }
    for ext in ["yaml", "yml"] {
        let p = dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
        if p.is_file() {
            let s = read(&p)?;
            let cfg = serde_yaml::from_str(&s).map_err(|e| ConfigError::ParseFile {
                path: p.clone(),
                message: e.to_string(),
            })?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Parsed and validated step inputs.
#[derive(Debug, Clone)]
pub struct StepInputs {
    project_path: PathBuf,
    generate_log: bool,
    verbose: bool,
    strict: bool,
    binary: BinarySpec,
    lint_config_path: Option<String>,
    deploy_dir: Option<PathBuf>,
    output: OutputMode,
    search: SearchCfg,
}

impl StepInputs {
    /// Merge CLI/env values, the project's config file and defaults.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let project_path = PathBuf::from(
            cli.project_path
                .as_deref()
                .filter(|p| !p.is_empty())
                .unwrap_or("."),
        );
        if !project_path.is_dir() {
            return Err(ConfigError::ProjectPathMissing(project_path));
        }
        let cfg = load_config(&project_path)?.unwrap_or_default();

        let generate_log = cli.generate_log.or(cfg.generate_log).unwrap_or(false);
        let verbose = cli.verbose_log.or(cfg.verbose_log).unwrap_or(false);
        let strict = cli.strict_mode.or(cfg.strict_mode).unwrap_or(false);
        let binary = BinarySpec::parse(
            cli.binary_path
                .as_deref()
                .or(cfg.binary_path.as_deref())
                .unwrap_or(crate::resolver::AUTO_SENTINEL),
        );
        let lint_config_path = non_empty(cli.lint_config_path.clone().or(cfg.lint_config_path));
        let deploy_dir = non_empty(cli.deploy_dir.clone().or(cfg.deploy_dir)).map(PathBuf::from);
        let output = OutputMode::parse(
            cli.output
                .as_deref()
                .or(cfg.output.as_deref())
                .unwrap_or("human"),
        )?;

        if generate_log && deploy_dir.is_none() {
            return Err(ConfigError::DeployDirMissing);
        }

        Ok(Self {
            project_path,
            generate_log,
            verbose,
            strict,
            binary,
            lint_config_path,
            deploy_dir,
            output,
            search: cfg.search.unwrap_or_default(),
        })
    }

    /// Log the effective inputs.
    pub fn print(&self) {
        log::info!("Config:");
        log::info!("- project_path: {}", self.project_path.display());
        log::info!("- generate_log: {}", self.generate_log);
        log::info!("- verbose_log: {}", self.verbose);
        log::info!("- strict_mode: {}", self.strict);
        let binary = match &self.binary {
            BinarySpec::Auto => crate::resolver::AUTO_SENTINEL,
            BinarySpec::Explicit(p) => p.as_str(),
        };
        log::info!("- binary_path: {binary}");
        log::info!(
            "- lint_config_path: {}",
            self.lint_config_path.as_deref().unwrap_or("")
        );
        if let Some(dir) = &self.deploy_dir {
            log::info!("- deploy_dir: {}", dir.display());
        }
    }

    /// Second stage: attach the repository snapshot.
    pub fn with_repository(self, repo: RepositoryContext) -> RepoConfig {
        RepoConfig { inputs: self, repo }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
    pub fn generate_log(&self) -> bool {
        self.generate_log
    }
    pub fn verbose(&self) -> bool {
        self.verbose
    }
    pub fn strict(&self) -> bool {
        self.strict
    }
    pub fn binary(&self) -> &BinarySpec {
        &self.binary
    }
    pub fn lint_config_path(&self) -> Option<&str> {
        self.lint_config_path.as_deref()
    }
    pub fn deploy_dir(&self) -> Option<&Path> {
        self.deploy_dir.as_deref()
    }
    pub fn output(&self) -> OutputMode {
        self.output
    }
    pub fn search(&self) -> &SearchCfg {
        &self.search
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Inputs plus repository snapshot; the binary is not resolved yet.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    inputs: StepInputs,
    repo: RepositoryContext,
}

impl RepoConfig {
    /// Final stage: attach the resolved binary.
    pub fn with_binary(self, binary: BinaryLocation) -> LintConfig {
        LintConfig {
            inputs: self.inputs,
            repo: self.repo,
            binary,
        }
    }

    pub fn inputs(&self) -> &StepInputs {
        &self.inputs
    }
    pub fn repo(&self) -> &RepositoryContext {
        &self.repo
    }
}

/// Fully assembled configuration consumed by the run and export phases.
#[derive(Debug, Clone)]
pub struct LintConfig {
    inputs: StepInputs,
    repo: RepositoryContext,
    binary: BinaryLocation,
}

impl LintConfig {
    pub fn inputs(&self) -> &StepInputs {
        &self.inputs
    }
    pub fn repo(&self) -> &RepositoryContext {
        &self.repo
    }
    pub fn binary(&self) -> &BinaryLocation {
        &self.binary
    }
}
