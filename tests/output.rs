use stacktrace::{Demangle, Fallback, Renderer, ResolveAll, StackTrace, Strategy, Symbolizer};
use stacktrace::{Error, Resolve};

struct Broken;

impl ResolveAll for Broken {
    fn resolve_all(&self, _addresses: &[usize]) -> stacktrace::Result<Vec<String>> {
        Err(Error::Resolution("Cannot allocate memory".to_owned()))
    }
}

struct Lines(&'static [&'static str]);

impl ResolveAll for Lines {
    fn resolve_all(&self, addresses: &[usize]) -> stacktrace::Result<Vec<String>> {
        assert_eq!(addresses.len(), self.0.len());
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

struct StackTraceCtor;

impl Demangle for StackTraceCtor {
    fn demangle(&self, mangled: &str) -> Option<String> {
        (mangled == "_ZN10StackTraceC1Ev").then(|| "StackTrace::StackTrace()".to_owned())
    }
}

struct Nothing;

impl Resolve for Nothing {
    fn resolve(&self, _address: usize, _buffer: &mut [u8]) -> bool {
        false
    }
}

fn output(trace: &StackTrace, renderer: &dyn Renderer) -> String {
    let mut out = Vec::new();
    trace.output_to_stream_with(renderer, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_output_unable_to_symbolize() {
    let trace = StackTrace::from_addresses(&[0x817778c, 0x8177790]);
    assert_eq!(
        output(&trace, &Fallback::new(Broken, StackTraceCtor)),
        "Unable to get symbols for backtrace (Cannot allocate memory). Dumping raw addresses in trace:\n\
         \t0x817778c\n\
         \t0x8177790\n"
    );
}

#[test]
fn test_output_symbolized() {
    let trace = StackTrace::from_addresses(&[0x817778c]);
    let renderer = Fallback::new(Lines(&["app(_ZN10StackTraceC1Ev+0x20) [0x817778c]"]), StackTraceCtor);
    assert_eq!(
        output(&trace, &renderer),
        "Backtrace:\n\tapp(StackTrace::StackTrace()+0x20) [0x817778c]\n"
    );
}

#[test]
fn test_output_without_message() {
    let trace = StackTrace::from_addresses(&[0x10]);
    assert_eq!(
        output(&trace, &Symbolizer::new(Nothing)),
        "Unable to get symbols for backtrace. Dumping raw addresses in trace:\n\t0x10\n"
    );
}

#[test]
fn test_output_empty_trace() {
    let trace = StackTrace::from_addresses(&[]);
    assert_eq!(
        output(&trace, &Fallback::new(Broken, StackTraceCtor)),
        "Unable to get symbols for backtrace. Dumping raw addresses in trace:\n"
    );
}

#[test]
fn test_output_disabled() {
    let trace = StackTrace::new();
    assert_eq!(output(&trace, Strategy::Disabled.renderer().as_ref()), "");
}

#[test]
fn test_output_is_repeatable() {
    let trace = StackTrace::new();
    let renderer = Strategy::Symbolize.renderer();
    assert_eq!(output(&trace, renderer.as_ref()), output(&trace, renderer.as_ref()));
}
