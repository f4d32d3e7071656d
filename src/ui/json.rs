//! Machine-readable progress output.

use std::io::{self, Write};

use crate::progress::{EventRecord, ProgressEvent, ProgressSink};

/// Writes each progress event as one JSON object per line.
///
/// Sinks cannot fail, so the first write error is kept and reported by
/// [`JsonLinesRenderer::finish`]; later events are dropped.
#[derive(Debug)]
pub struct JsonLinesRenderer<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesRenderer<W> {
    /// Create a renderer writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flush and return the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_record(&mut self, record: &EventRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> ProgressSink for JsonLinesRenderer<W> {
    fn emit(&mut self, event: ProgressEvent<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_record(&event.to_record()) {
            tracing::warn!(error = %err, "Failed to write progress event");
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_object_per_line() {
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        renderer.emit(ProgressEvent::Begin { total_work: 1 });
        renderer.emit(ProgressEvent::StepBegin { name: "a" });
        let out = String::from_utf8(renderer.finish().unwrap()).unwrap();

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"event":"begin","total_work":1}"#);

        let record: EventRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(
            record,
            EventRecord::StepBegin {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn failure_cause_includes_context() {
        let cause = anyhow::anyhow!("exit 1").context("apply failed");
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        renderer.emit(ProgressEvent::StepFailed {
            requirement: "a",
            completed_count: 0,
            cause: &cause,
        });
        let out = String::from_utf8(renderer.finish().unwrap()).unwrap();
        assert!(out.contains(r#""cause":"apply failed: exit 1""#));
    }

    #[derive(Debug)]
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_surface_on_finish() {
        let mut renderer = JsonLinesRenderer::new(BrokenPipe);
        renderer.emit(ProgressEvent::Begin { total_work: 1 });
        renderer.emit(ProgressEvent::StepBegin { name: "a" });
        let err = renderer.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
