use crate::capture::StackTrace;
use crate::demangle::{demangle_symbols, Demangle};
use crate::platform::{Resolve, ResolveAll};
use crate::utils::{c_str, Address};
use std::fmt;

/// Size of the buffer handed to a [Resolve] implementation.
const SYMBOL_BUFFER_SIZE: usize = 1024;

/// One rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine(String);

impl TraceLine {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn raw(address: usize) -> Self {
        Self(Address(address).to_string())
    }
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a render pass managed to attach symbol names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolizationOutcome {
    attempted: bool,
    symbolized: bool,
    message: Option<String>,
}

impl SymbolizationOutcome {
    /// Nothing was attempted, the renderer is disabled for this build.
    pub fn skipped() -> Self {
        Self {
            attempted: false,
            symbolized: false,
            message: None,
        }
    }

    pub(crate) fn new(symbolized: bool, message: Option<String>) -> Self {
        Self {
            attempted: true,
            symbolized,
            message,
        }
    }

    #[inline]
    pub fn attempted(&self) -> bool {
        self.attempted
    }

    /// `true` if at least one line carries a real symbol name.
    #[inline]
    pub fn symbolized(&self) -> bool {
        self.symbolized
    }

    /// Why symbolization failed, when the platform said so.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// The result of rendering a [StackTrace].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    lines: Vec<TraceLine>,
    outcome: SymbolizationOutcome,
}

impl Rendered {
    pub(crate) fn new(lines: Vec<TraceLine>, outcome: SymbolizationOutcome) -> Self {
        Self { lines, outcome }
    }

    /// One line per frame, in capture order.
    ///
    /// This may hold fewer lines than the trace has frames if memory ran out
    /// while rendering.
    #[inline]
    pub fn lines(&self) -> &[TraceLine] {
        &self.lines
    }

    #[inline]
    pub fn outcome(&self) -> &SymbolizationOutcome {
        &self.outcome
    }

    #[inline]
    pub fn into_parts(self) -> (Vec<TraceLine>, SymbolizationOutcome) {
        (self.lines, self.outcome)
    }
}

/// Turns captured addresses into text.
///
/// Rendering never fails and never mutates the trace: anything that cannot be
/// resolved is printed as a raw address.
pub trait Renderer {
    fn render(&self, trace: &StackTrace) -> Rendered;
}

/// Reserves one line per frame, or reports why it could not.
fn reserve_lines(trace: &StackTrace) -> Result<Vec<TraceLine>, Rendered> {
    let mut lines = Vec::new();
    match lines.try_reserve_exact(trace.len()) {
        Ok(()) => Ok(lines),
        Err(err) => Err(Rendered::new(
            Vec::new(),
            SymbolizationOutcome::new(false, Some(crate::Error::from(err).to_string())),
        )),
    }
}

/// The renderer for builds without any backtrace facility.
#[derive(Debug, Default, Copy, Clone)]
pub struct Disabled;

impl Renderer for Disabled {
    #[inline]
    fn render(&self, _trace: &StackTrace) -> Rendered {
        Rendered::new(Vec::new(), SymbolizationOutcome::skipped())
    }
}

/// Resolves every address on its own through a platform symbolizer.
///
/// The symbolizer already demangles, so lines are used as they come.
#[derive(Debug, Default, Copy, Clone)]
pub struct Symbolizer<R> {
    resolver: R,
}

impl<R: Resolve> Symbolizer<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: Resolve> Renderer for Symbolizer<R> {
    fn render(&self, trace: &StackTrace) -> Rendered {
        if trace.is_empty() {
            return Rendered::new(Vec::new(), SymbolizationOutcome::new(false, None));
        }
        let mut lines = match reserve_lines(trace) {
            Ok(lines) => lines,
            Err(rendered) => return rendered,
        };
        let mut symbolized = false;
        for &address in trace.addresses() {
            let mut buffer = [0u8; SYMBOL_BUFFER_SIZE];
            // The return address of a call into a noreturn function may already
            // belong to the next function, step back into the call instruction.
            let found = self.resolver.resolve(address.wrapping_sub(1), &mut buffer);
            match c_str(&buffer).filter(|symbol| found && !symbol.is_empty()) {
                Some(symbol) => {
                    lines.push(TraceLine(format!("{} [{}]", symbol, Address(address))));
                    symbolized = true;
                }
                None => lines.push(TraceLine::raw(address)),
            }
        }
        Rendered::new(lines, SymbolizationOutcome::new(symbolized, None))
    }
}

/// Resolves the whole trace in one batch and demangles what comes back.
#[derive(Debug, Default, Copy, Clone)]
pub struct Fallback<B, D> {
    resolver: B,
    demangler: D,
}

impl<B: ResolveAll, D: Demangle> Fallback<B, D> {
    pub fn new(resolver: B, demangler: D) -> Self {
        Self { resolver, demangler }
    }
}

impl<B: ResolveAll, D: Demangle> Renderer for Fallback<B, D> {
    fn render(&self, trace: &StackTrace) -> Rendered {
        if trace.is_empty() {
            return Rendered::new(Vec::new(), SymbolizationOutcome::new(false, None));
        }
        let mut lines = match reserve_lines(trace) {
            Ok(lines) => lines,
            Err(rendered) => return rendered,
        };
        match self.resolver.resolve_all(trace.addresses()) {
            Ok(symbols) if symbols.len() == trace.len() => {
                lines.extend(
                    symbols
                        .iter()
                        .map(|symbol| TraceLine(demangle_symbols(symbol, &self.demangler))),
                );
                Rendered::new(lines, SymbolizationOutcome::new(true, None))
            }
            Ok(symbols) => {
                debug!(expected = trace.len(), got = symbols.len(), "symbol batch size mismatch");
                lines.extend(trace.addresses().iter().map(|&a| TraceLine::raw(a)));
                Rendered::new(lines, SymbolizationOutcome::new(false, None))
            }
            Err(err) => {
                debug!(%err, frames = trace.len(), "unable to symbolize backtrace");
                lines.extend(trace.addresses().iter().map(|&a| TraceLine::raw(a)));
                Rendered::new(lines, SymbolizationOutcome::new(false, Some(err.to_string())))
            }
        }
    }
}
