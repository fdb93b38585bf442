//! Runs the analyzer and streams its output through the annotation sink.

use crate::error::RunError;
use crate::models::Summary;
use crate::sink::{AnnotationSink, Emit, Tee};
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Outcome of one analyzer run.
#[derive(Debug)]
pub struct AnalyzerRun {
    /// Unmodified stdout and stderr bytes in arrival order.
    pub raw_output: Vec<u8>,
    pub status: ExitStatus,
    pub summary: Summary,
}

/// Analyzer arguments derived from the step inputs.
pub fn analyzer_args(strict: bool, lint_config_path: Option<&str>) -> Vec<String> {
    let mut args = Vec::new();
    if strict {
        args.push("--strict".to_string());
    }
    if let Some(cfg) = lint_config_path.filter(|p| !p.is_empty()) {
        args.push("--config".to_string());
        args.push(cfg.to_string());
    }
    args
}

/// Spawn `binary` in `dir` and block until it exits.
///
/// Stdout and stderr share one pipe, so a single reader sees both streams
/// in the order the child wrote them. Each chunk is written to the sink and
/// to the raw buffer within the same call.
pub fn run_analyzer<E: Emit + ?Sized>(
    binary: &Path,
    args: &[String],
    dir: &Path,
    mut sink: AnnotationSink<'_, E>,
) -> Result<AnalyzerRun, RunError> {
    let spawn_err = |source: io::Error| RunError::Spawn {
        binary: binary.to_path_buf(),
        source,
    };
    let (mut reader, writer) = io::pipe().map_err(spawn_err)?;
    let child = {
        let mut cmd = Command::new(binary);
        cmd.args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(writer.try_clone().map_err(spawn_err)?)
            .stderr(writer);
        log::debug!("$ {} {}", binary.display(), args.join(" "));
        cmd.spawn()
    };
    // `cmd` is gone, so EOF arrives once the child exits.
    let mut child = child.map_err(spawn_err)?;

    let mut raw_output = Vec::new();
    let copied = {
        let mut tee = Tee::new(&mut sink, &mut raw_output);
        io::copy(&mut reader, &mut tee).and_then(|_| tee.flush())
    };
    let status = child.wait().map_err(RunError::Stream)?;
    copied.map_err(RunError::Stream)?;

    Ok(AnalyzerRun {
        raw_output,
        status,
        summary: sink.finish(),
    })
}
