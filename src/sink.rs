//! Write sinks for analyzer output.
//!
//! `AnnotationSink` turns the byte stream into annotated log lines;
//! `Tee` fans each chunk out to the sink and to the raw capture buffer.

use crate::diagnostic::parse_line;
use crate::models::Summary;
use crate::provider::LinkFormatter;
use log::Level;
use std::io::{self, Write};

/// Destination for emitted lines, keyed by log level.
pub trait Emit {
    fn emit(&mut self, level: Level, line: &str);
}

/// Forwards lines to the `log` facade.
#[derive(Debug, Default)]
pub struct LogEmitter;

impl Emit for LogEmitter {
    fn emit(&mut self, level: Level, line: &str) {
        log::log!(level, "{line}");
    }
}

/// Annotates analyzer output line by line.
///
/// Lines are assembled across `write` calls; a line without its newline
/// stays pending until more bytes arrive or `finish` is called.
pub struct AnnotationSink<'a, E: Emit + ?Sized> {
    root_path: &'a str,
    formatter: Option<&'a LinkFormatter>,
    emitter: &'a mut E,
    pending: Vec<u8>,
    summary: Summary,
}

impl<'a, E: Emit + ?Sized> AnnotationSink<'a, E> {
    /// Without a formatter every line passes through verbatim.
    pub fn new(
        root_path: &'a str,
        formatter: Option<&'a LinkFormatter>,
        emitter: &'a mut E,
    ) -> Self {
        Self {
            root_path,
            formatter,
            emitter,
            pending: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Emit any trailing partial line and return the run summary.
    pub fn finish(mut self) -> Summary {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.handle_line(&rest);
        }
        self.summary
    }

    fn handle_line(&mut self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        let raw: &str = text.strip_suffix('\r').unwrap_or(&text);
        let Some(formatter) = self.formatter else {
            self.passthrough(raw);
            return;
        };
        match parse_line(raw, self.root_path) {
            Ok(line) => {
                self.summary.record(&line.severity);
                self.emitter
                    .emit(line.severity.level(), &formatter.format(&line));
            }
            Err(err) => {
                log::trace!("passing through unparsed line ({err})");
                self.passthrough(raw);
            }
        }
    }

    fn passthrough(&mut self, raw: &str) {
        self.summary.passthrough += 1;
        self.emitter.emit(Level::Info, raw);
    }
}

impl<E: Emit + ?Sized> Write for AnnotationSink<'_, E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            let (head, tail) = rest.split_at(pos);
            if self.pending.is_empty() {
                self.handle_line(head);
            } else {
                self.pending.extend_from_slice(head);
                let line = std::mem::take(&mut self.pending);
                self.handle_line(&line);
            }
            rest = &tail[1..];
        }
        self.pending.extend_from_slice(rest);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Fan-out writer: every chunk goes fully to both destinations.
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::RepositoryContext;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(Level, String)>,
    }

    impl Emit for Recorder {
        fn emit(&mut self, level: Level, line: &str) {
            self.lines.push((level, line.to_string()));
        }
    }

    fn github() -> LinkFormatter {
        LinkFormatter::select(&RepositoryContext {
            root_path: "/repo".into(),
            remote_url: "https://github.com/org/repo".into(),
            branch_hash: "abc123".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_routes_by_severity_and_passes_through_noise() {
        let formatter = github();
        let mut rec = Recorder::default();
        let mut sink = AnnotationSink::new("/repo", Some(&formatter), &mut rec);
        sink.write_all(
            b"Linting 'A.swift' (1/2)\n\
              /repo/src/A.swift:18:1: warning: Line too long (line_length)\n\
              /repo/src/B.swift:2:5: error: Force Cast: avoid (force_cast)\n\
              /repo/src/C.swift:3:1: hint: something\n\
              Done linting! Found 3 violations\n",
        )
        .unwrap();
        let summary = sink.finish();

        assert_eq!(
            rec.lines,
            vec![
                (Level::Info, "Linting 'A.swift' (1/2)".to_string()),
                (
                    Level::Warn,
                    "https://github.com/org/repo/blob/abc123/src/A.swift#L18: Line too long (line_length)"
                        .to_string()
                ),
                (
                    Level::Error,
                    "https://github.com/org/repo/blob/abc123/src/B.swift#L2: Force Cast: avoid (force_cast)"
                        .to_string()
                ),
                (
                    Level::Info,
                    "https://github.com/org/repo/blob/abc123/src/C.swift#L3: something".to_string()
                ),
                (Level::Info, "Done linting! Found 3 violations".to_string()),
            ]
        );
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.others, 1);
        assert_eq!(summary.passthrough, 2);
    }

    #[test]
    fn test_reassembles_lines_split_across_writes() {
        let formatter = github();
        let mut rec = Recorder::default();
        let mut sink = AnnotationSink::new("/repo", Some(&formatter), &mut rec);
        assert_eq!(sink.write(b"/repo/A.swift:1").unwrap(), 15);
        sink.write_all(b":1: warning: split\r\n/repo/B").unwrap();
        sink.write_all(b".swift:2:2: error: tail").unwrap();
        let summary = sink.finish();
        assert_eq!(rec.lines.len(), 2);
        assert_eq!(
            rec.lines[0].1,
            "https://github.com/org/repo/blob/abc123/A.swift#L1: split"
        );
        assert_eq!(rec.lines[1].0, Level::Error);
        assert_eq!(summary.findings(), 2);
    }

    #[test]
    fn test_without_formatter_everything_is_verbatim() {
        let mut rec = Recorder::default();
        let mut sink = AnnotationSink::new("/repo", None, &mut rec);
        sink.write_all(b"/repo/A.swift:1:1: warning: x\n\n").unwrap();
        let summary = sink.finish();
        assert_eq!(
            rec.lines,
            vec![
                (Level::Info, "/repo/A.swift:1:1: warning: x".to_string()),
                (Level::Info, String::new()),
            ]
        );
        assert_eq!(summary.passthrough, 2);
        assert_eq!(summary.findings(), 0);
    }

    #[test]
    fn test_tee_keeps_raw_bytes_intact() {
        let formatter = github();
        let mut rec = Recorder::default();
        let mut raw = Vec::new();
        let input: &[u8] = b"banner\n/repo/A.swift:9:9: warning: w\npartial";
        {
            let mut sink = AnnotationSink::new("/repo", Some(&formatter), &mut rec);
            let mut tee = Tee::new(&mut sink, &mut raw);
            tee.write_all(input).unwrap();
            tee.flush().unwrap();
            drop(tee);
            sink.finish();
        }
        assert_eq!(raw, input);
        assert_eq!(rec.lines.last().unwrap(), &(Level::Info, "partial".to_string()));
    }
}
