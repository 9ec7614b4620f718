use crate::platform::Platform;
use crate::utils::Address;
use std::fmt;

/// The number of return addresses a [StackTrace] can hold.
pub const MAX_FRAMES: usize = 62;

/// A primitive that walks the current call stack and collects return addresses.
///
/// `capture` fills `buffer` starting from the most recent call and returns the
/// number of addresses written. Implementations may return 0 when no facility
/// is available. The return value is not trusted: [StackTrace] clamps it into
/// `[0, buffer.len()]`.
///
/// Implementations must not allocate, since they may be called while the heap
/// is in an unknown state.
pub trait Capture {
    fn capture(&self, buffer: &mut [usize]) -> isize;
}

/// A captured call stack.
///
/// `StackTrace` only stores raw return addresses. Symbolization is deferred to
/// the [Renderer](crate::Renderer), which never mutates the trace, so the same
/// trace can be rendered any number of times.
pub struct StackTrace {
    trace: [usize; MAX_FRAMES],
    count: usize,
}

impl StackTrace {
    /// Captures the current call stack with the platform primitive.
    #[inline(never)]
    pub fn new() -> Self {
        Self::capture_with(&Platform::default())
    }

    /// Captures the current call stack with `primitive`, which is invoked
    /// exactly once.
    #[inline(never)]
    pub fn capture_with<C: Capture + ?Sized>(primitive: &C) -> Self {
        let mut trace = [0; MAX_FRAMES];
        let count = primitive.capture(&mut trace).clamp(0, MAX_FRAMES as isize) as usize;
        Self { trace, count }
    }

    /// Builds a trace from already collected addresses. Anything past
    /// [MAX_FRAMES] is dropped.
    pub fn from_addresses(addresses: &[usize]) -> Self {
        let count = addresses.len().min(MAX_FRAMES);
        let mut trace = [0; MAX_FRAMES];
        trace[..count].copy_from_slice(&addresses[..count]);
        Self { trace, count }
    }

    /// The captured addresses, most recent call first.
    #[inline]
    pub fn addresses(&self) -> &[usize] {
        &self.trace[..self.count]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for StackTrace {
    #[inline(never)]
    fn default() -> Self {
        Self::capture_with(&Platform::default())
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.addresses().iter().map(|&a| Address(a)))
            .finish()
    }
}
