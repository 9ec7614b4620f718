use crate::capture::StackTrace;
use crate::config::config;
use crate::render::{Rendered, Renderer, SymbolizationOutcome};
use crate::utils::Address;
use std::io::{self, Write};

impl StackTrace {
    /// Writes the trace to stderr, one tab-indented line per frame, using the
    /// process-wide renderer.
    ///
    /// This is best effort: write errors are ignored.
    pub fn print_backtrace(&self) {
        self.print_backtrace_with(config().renderer().as_ref())
    }

    /// Same as [print_backtrace](Self::print_backtrace) with an explicit renderer.
    pub fn print_backtrace_with(&self, renderer: &dyn Renderer) {
        let rendered = renderer.render(self);
        if !rendered.outcome().attempted() {
            return;
        }
        let stderr = io::stderr();
        let mut stderr = stderr.lock();
        let _ = stderr.flush();
        let _ = write_frames(&mut stderr, self, &rendered);
    }

    /// Writes the trace to `os` using the process-wide renderer.
    ///
    /// The frames are preceded by a header telling whether symbols could be
    /// resolved:
    /// ```text
    /// Backtrace:
    ///     app(StackTrace::StackTrace()+0x20) [0x817778c]
    /// ```
    /// or, when they could not:
    /// ```text
    /// Unable to get symbols for backtrace (Cannot allocate memory). Dumping raw addresses in trace:
    ///     0x817778c
    /// ```
    /// Nothing is written when rendering is disabled.
    pub fn output_to_stream<W: Write + ?Sized>(&self, os: &mut W) -> crate::Result<()> {
        self.output_to_stream_with(config().renderer().as_ref(), os)
    }

    /// Same as [output_to_stream](Self::output_to_stream) with an explicit renderer.
    pub fn output_to_stream_with<W: Write + ?Sized>(&self, renderer: &dyn Renderer, os: &mut W) -> crate::Result<()> {
        let rendered = renderer.render(self);
        if !rendered.outcome().attempted() {
            return Ok(());
        }
        write_header(os, rendered.outcome())?;
        write_frames(os, self, &rendered)?;
        Ok(())
    }
}

fn write_header<W: Write + ?Sized>(os: &mut W, outcome: &SymbolizationOutcome) -> io::Result<()> {
    if outcome.symbolized() {
        return writeln!(os, "Backtrace:");
    }
    write!(os, "Unable to get symbols for backtrace")?;
    if let Some(message) = outcome.message().filter(|m| !m.is_empty()) {
        write!(os, " ({})", message)?;
    }
    writeln!(os, ". Dumping raw addresses in trace:")
}

/// Writes the rendered lines, then raw addresses for the frames the renderer
/// had no memory left to cover.
fn write_frames<W: Write + ?Sized>(os: &mut W, trace: &StackTrace, rendered: &Rendered) -> io::Result<()> {
    for line in rendered.lines() {
        writeln!(os, "\t{}", line)?;
    }
    let covered = rendered.lines().len().min(trace.len());
    for &address in &trace.addresses()[covered..] {
        writeln!(os, "\t{}", Address(address))?;
    }
    Ok(())
}
