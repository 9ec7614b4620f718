//! Demangling of Itanium C++ ABI symbols embedded in free text.
//!
//! ```text
//! "out/Debug/app(_ZN10StackTraceC1Ev+0x20) [0x817778c]"
//! =>
//! "out/Debug/app(StackTrace::StackTrace()+0x20) [0x817778c]"
//! ```

use cpp_demangle::{DemangleOptions, Symbol};

/// The prefix of every mangled name, per the Itanium C++ ABI.
pub const MANGLED_SYMBOL_PREFIX: &str = "_Z";

/// A C++ ABI demangler. Returns `None` when `mangled` is not a valid name.
pub trait Demangle {
    fn demangle(&self, mangled: &str) -> Option<String>;
}

/// The Itanium C++ ABI demangler, as implemented by `cpp_demangle`.
#[derive(Debug, Default, Copy, Clone)]
pub struct Itanium;

impl Demangle for Itanium {
    fn demangle(&self, mangled: &str) -> Option<String> {
        let symbol = Symbol::new(mangled).ok()?;
        symbol.demangle(&DemangleOptions::default()).ok()
    }
}

/// Characters a mangled name can be made of.
#[inline]
fn is_symbol_character(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Replaces every mangled symbol found in `text` by its demangled form.
///
/// A candidate starts at [MANGLED_SYMBOL_PREFIX] and runs until the first byte
/// that is not a symbol character. When the candidate demangles, scanning goes
/// on after it, so the inserted text is never looked at again. When it does
/// not, the candidate is kept as is and scanning goes on right after the
/// prefix, in case the real name starts further in.
pub fn demangle_symbols<D: Demangle + ?Sized>(text: &str, demangler: &D) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    // Everything before `copied` is already in `out`.
    let mut copied = 0;
    let mut search_from = 0;
    while search_from < text.len() {
        let start = match text[search_from..].find(MANGLED_SYMBOL_PREFIX) {
            Some(n) => search_from + n,
            None => break,
        };
        let end = bytes[start..]
            .iter()
            .position(|&b| !is_symbol_character(b))
            .map_or(text.len(), |n| start + n);
        match demangler.demangle(&text[start..end]) {
            Some(demangled) => {
                out.push_str(&text[copied..start]);
                out.push_str(&demangled);
                copied = end;
                search_from = end;
            }
            None => search_from = start + MANGLED_SYMBOL_PREFIX.len(),
        }
    }
    out.push_str(&text[copied..]);
    out
}
