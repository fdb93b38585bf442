//! Step orchestration: inputs, dependencies, run, export.
//!
//! Each phase consumes the configuration stage produced by the previous
//! one. Any phase error is wrapped with the phase name and surfaced once by
//! `execute`.

use crate::cli::Cli;
use crate::config::{LintConfig, OutputMode, RepoConfig, StepInputs};
use crate::error::RunError;
use crate::export::export_raw_log;
use crate::git::{GitProvider, RepositoryContext};
use crate::logging;
use crate::output;
use crate::provider::LinkFormatter;
use crate::resolver::{Resolver, Toolchain};
use crate::runner::{analyzer_args, run_analyzer, AnalyzerRun};
use crate::sink::{AnnotationSink, LogEmitter};
use anyhow::{Context, Result};

pub struct SwiftLintStep<T: Toolchain, G: GitProvider> {
    toolchain: T,
    git: G,
}

impl<T: Toolchain, G: GitProvider> SwiftLintStep<T, G> {
    pub fn new(toolchain: T, git: G) -> Self {
        Self { toolchain, git }
    }

    /// Run every phase in order.
    ///
    /// A failing analyzer still gets its raw log exported before the step
    /// reports the failure.
    pub fn execute(&self, cli: &Cli) -> Result<AnalyzerRun> {
        let config = self
            .process_inputs(cli)
            .context("Failed to process Step inputs")?;
        let config = self
            .ensure_dependencies(config)
            .context("Failed to install Step dependencies")?;
        let run = self.run(&config).context("Failed to execute Step")?;
        let exported = self
            .export_outputs(&config, &run)
            .context("Failed to export Step outputs");

        if !run.status.success() {
            if let Err(err) = &exported {
                log::error!("{err:#}");
            }
            return Err(anyhow::Error::new(RunError::ExitStatus(run.status))
                .context("Failed to execute Step"));
        }
        exported?;
        Ok(run)
    }

    /// Parse inputs and take the repository snapshot.
    pub fn process_inputs(&self, cli: &Cli) -> Result<RepoConfig> {
        let inputs = StepInputs::resolve(cli)?;
        logging::set_verbose(inputs.verbose());
        logging::use_stderr(inputs.output() == OutputMode::Json);
        inputs.print();

        let git = self.git.open(inputs.project_path());
        let repo = RepositoryContext::resolve(&*git)?;
        Ok(inputs.with_repository(repo))
    }

    /// Locate (or install) the analyzer.
    pub fn ensure_dependencies(&self, config: RepoConfig) -> Result<LintConfig> {
        log::info!("");
        let inputs = config.inputs();
        let resolved = Resolver::new(inputs.project_path(), &self.toolchain)
            .with_common_locations(&inputs.search().locations)
            .with_skip_dirs(&inputs.search().skip_dirs)
            .resolve(inputs.binary())?;
        if let Some(warning) = &resolved.warning {
            log::warn!("{warning}");
        }
        Ok(config.with_binary(resolved.location))
    }

    /// Run the analyzer with annotated live output and a raw capture.
    ///
    /// A non-zero analyzer exit is returned in `AnalyzerRun::status`, not as
    /// an error, so the raw log can still be exported.
    pub fn run(&self, config: &LintConfig) -> Result<AnalyzerRun> {
        log::info!("");
        log::info!("Running SwiftLint");
        let repo = config.repo();
        let inputs = config.inputs();
        let formatter = LinkFormatter::select(repo);
        if formatter.is_none() {
            log::warn!(
                "Unsupported hosting provider for {}; SwiftLint output is printed unmodified",
                repo.remote_url
            );
        }

        let args = analyzer_args(inputs.strict(), inputs.lint_config_path());
        let mut emitter = LogEmitter;
        let sink = AnnotationSink::new(&repo.root_path, formatter.as_ref(), &mut emitter);
        let run = run_analyzer(&config.binary().path, &args, inputs.project_path(), sink)?;
        output::print_summary(&run, &config.binary().path, inputs.output());
        Ok(run)
    }

    /// Persist the raw capture when `generate_log` is set.
    pub fn export_outputs(&self, config: &LintConfig, run: &AnalyzerRun) -> Result<()> {
        let inputs = config.inputs();
        if !inputs.generate_log() {
            return Ok(());
        }
        let Some(deploy_dir) = inputs.deploy_dir() else {
            return Ok(());
        };
        let path = export_raw_log(deploy_dir, &run.raw_output)?;
        log::info!("Raw SwiftLint output exported to {}", path.display());
        Ok(())
    }
}
