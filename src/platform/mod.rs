//! Platform collaborators: stack walking and symbol resolution.
//!
//! Everything platform-dependent sits behind the [Capture](crate::Capture),
//! [Resolve] and [ResolveAll] traits, so the renderers never look at `cfg`s.

#[cfg(has_execinfo)]
mod execinfo;
mod unwinder;

#[cfg(has_execinfo)]
pub use execinfo::Execinfo;
pub use unwinder::Unwinder;

use crate::capture::Capture;

/// The default capture primitive for the current target.
#[cfg(has_execinfo)]
pub type Platform = Execinfo;

/// The default capture primitive for the current target.
#[cfg(all(not(has_execinfo), target_os = "android"))]
pub type Platform = Unsupported;

/// The default capture primitive for the current target.
#[cfg(all(not(has_execinfo), not(target_os = "android")))]
pub type Platform = Unwinder;

/// Resolves a single address into a demangled symbol name.
///
/// On success the name is written NUL-terminated into `buffer`, truncated by
/// the resolver if it does not fit, and `true` is returned.
pub trait Resolve {
    fn resolve(&self, address: usize, buffer: &mut [u8]) -> bool;
}

/// Resolves a whole batch of addresses into one platform-formatted string per
/// address, typically `binary(mangled_symbol+offset) [address]`.
///
/// On failure the error carries the OS message explaining why.
pub trait ResolveAll {
    fn resolve_all(&self, addresses: &[usize]) -> crate::Result<Vec<String>>;
}

/// A capture primitive for targets without any backtrace facility.
#[derive(Debug, Default, Copy, Clone)]
pub struct Unsupported;

impl Capture for Unsupported {
    #[inline]
    fn capture(&self, _buffer: &mut [usize]) -> isize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StackTrace;

    #[test]
    fn test_unsupported() {
        let trace = StackTrace::capture_with(&Unsupported);
        assert!(trace.is_empty());
    }
}
