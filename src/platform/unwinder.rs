use super::Resolve;
use crate::capture::Capture;
use crate::utils::BoundedWriter;
use libc::c_void;
use std::fmt::Write;

/// Stack walking and symbolization through the `backtrace` crate.
///
/// Capturing uses the unsynchronized walker, which takes no lock and does not
/// allocate, so it is usable inside a signal handler. Resolving reads the
/// debug info of the loaded objects and yields names already demangled.
#[derive(Debug, Default, Copy, Clone)]
pub struct Unwinder;

impl Capture for Unwinder {
    #[inline(never)]
    fn capture(&self, buffer: &mut [usize]) -> isize {
        let mut count = 0;
        // SAFETY: the walk is not synchronized with other `backtrace` calls.
        // Callers must not run it concurrently with another user of the
        // unwinder on platforms where the unwinder is not reentrant.
        unsafe {
            backtrace::trace_unsynchronized(|frame| {
                if count >= buffer.len() {
                    return false;
                }
                buffer[count] = frame.ip() as usize;
                count += 1;
                true
            });
        }
        count as isize
    }
}

impl Resolve for Unwinder {
    fn resolve(&self, address: usize, buffer: &mut [u8]) -> bool {
        let mut writer = BoundedWriter::new(buffer);
        let mut found = false;
        // `backtrace::resolve` treats its argument as a return address and
        // looks up one byte before it, so step forward to look up `address`.
        backtrace::resolve(address.wrapping_add(1) as *mut c_void, |symbol| {
            // Inlined frames resolve to several symbols, the first one wins.
            if found {
                return;
            }
            if let Some(name) = symbol.name() {
                found = write!(writer, "{:#}", name).is_ok() && writer.len() > 0;
            }
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::c_str;
    use crate::StackTrace;

    #[test]
    fn test_unwinder_capture() {
        let trace = StackTrace::capture_with(&Unwinder);
        assert!(trace.len() > 1);
    }

    #[test]
    fn test_unwinder_resolve() {
        let address = test_unwinder_resolve as usize;
        let mut buffer = [0u8; 1024];
        assert!(Unwinder.resolve(address, &mut buffer));
        let name = c_str(&buffer).unwrap();
        assert!(name.contains("test_unwinder_resolve"), "{}", name);
    }

    #[test]
    fn test_unwinder_resolve_truncates() {
        let address = test_unwinder_resolve_truncates as usize;
        let mut buffer = [0u8; 8];
        assert!(Unwinder.resolve(address, &mut buffer));
        assert_eq!(c_str(&buffer).unwrap().len(), 7);
    }

    #[inline(never)]
    fn resolve_target() -> usize {
        std::hint::black_box(0x5a)
    }

    #[test]
    fn test_unwinder_resolve_function_start() {
        let start = resolve_target as usize;
        assert_eq!(resolve_target(), 0x5a);
        let mut buffer = [0u8; 1024];
        assert!(Unwinder.resolve(start, &mut buffer));
        assert!(c_str(&buffer).unwrap().ends_with("resolve_target"));
    }

    #[test]
    fn test_unwinder_resolve_unknown() {
        let mut buffer = [0u8; 1024];
        assert!(!Unwinder.resolve(0, &mut buffer));
        assert_eq!(c_str(&buffer), Some(""));
    }
}
