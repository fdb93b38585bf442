//! CLI argument parsing via `clap`.
//!
//! Every input can also come from the CI environment variable named in its
//! `env` attribute, so the binary runs unchanged as a pipeline step.

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "swiftlint-step",
    version,
    about = "Run SwiftLint and link its findings to the hosting provider",
    long_about = "Run SwiftLint over a project, rewrite every finding into a blob link on GitHub, GitLab or Bitbucket, and optionally export the raw output as a log artifact.\n\nConfiguration precedence: CLI/env > swiftlint-step.toml > defaults.",
    after_help = "Examples:\n  swiftlint-step --project-path . --strict-mode true\n  swiftlint-step --binary-path Pods/SwiftLint/swiftlint --generate-log true --deploy-dir out\n  project_path=App verbose_log=true swiftlint-step"
)]
/// Step inputs. `None` means "not given"; defaults are applied in `config`.
pub struct Cli {
    #[arg(long, env = "project_path", help = "Project directory to lint (default: .)")]
    pub project_path: Option<String>,

    #[arg(
        long,
        env = "generate_log",
        value_parser = parse_flag,
        help = "Export raw SwiftLint output to the deploy dir: true|false (default: false)"
    )]
    pub generate_log: Option<bool>,

    #[arg(
        long,
        env = "verbose_log",
        value_parser = parse_flag,
        help = "Enable debug logging: true|false (default: false)"
    )]
    pub verbose_log: Option<bool>,

    #[arg(
        long,
        env = "strict_mode",
        value_parser = parse_flag,
        help = "Pass --strict to SwiftLint: true|false (default: false)"
    )]
    pub strict_mode: Option<bool>,

    #[arg(long, env = "binary_path", help = "Path to the swiftlint binary, or `auto` (default: auto)")]
    pub binary_path: Option<String>,

    #[arg(long, env = "lint_config_path", help = "SwiftLint configuration file passed via --config")]
    pub lint_config_path: Option<String>,

    #[arg(long, env = "BITRISE_DEPLOY_DIR", help = "Directory receiving exported artifacts")]
    pub deploy_dir: Option<String>,

    #[arg(long, help = "Summary output mode: human|json (default: human)")]
    pub output: Option<String>,
}

/// Boolean inputs accept exactly `true` or `false`.
fn parse_flag(value: &str) -> Result<bool, String> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("expected true or false, got `{other}`")),
    }
}
