use super::ResolveAll;
use crate::capture::Capture;
use crate::utils::c_str;
use crate::Error;
use libc::{c_char, c_int, c_void};
use std::ffi::CStr;

const STRERROR_BUFFER_SIZE: usize = 256;

extern "C" {
    fn backtrace(buffer: *mut *mut c_void, size: c_int) -> c_int;
    fn backtrace_symbols(buffer: *const *mut c_void, size: c_int) -> *mut *mut c_char;
}

/// The `<execinfo.h>` facility of the C library.
///
/// Capturing goes through `backtrace(3)`, batch symbolization through
/// `backtrace_symbols(3)`.
#[derive(Debug, Default, Copy, Clone)]
pub struct Execinfo;

impl Capture for Execinfo {
    #[inline]
    fn capture(&self, buffer: &mut [usize]) -> isize {
        let size = buffer.len().min(c_int::MAX as usize) as c_int;
        // `usize` and `*mut c_void` share size and alignment.
        unsafe { backtrace(buffer.as_mut_ptr() as *mut *mut c_void, size) as isize }
    }
}

impl ResolveAll for Execinfo {
    fn resolve_all(&self, addresses: &[usize]) -> crate::Result<Vec<String>> {
        let size = addresses.len().min(c_int::MAX as usize);
        let symbols = SymbolBuffer::new(addresses.as_ptr() as *const *mut c_void, size)
            .ok_or_else(|| Error::Resolution(strerror(errno())))?;
        let mut strings = Vec::new();
        strings.try_reserve_exact(size)?;
        for n in 0..size {
            strings.push(symbols.get(n).unwrap_or_default());
        }
        Ok(strings)
    }
}

/// Owns the array returned by `backtrace_symbols(3)`.
///
/// The array and its strings are a single `malloc` block, released on drop.
struct SymbolBuffer {
    symbols: *mut *mut c_char,
    len: usize,
}

impl SymbolBuffer {
    fn new(addresses: *const *mut c_void, len: usize) -> Option<Self> {
        let symbols = unsafe { backtrace_symbols(addresses, len as c_int) };
        if symbols.is_null() {
            None
        } else {
            Some(Self { symbols, len })
        }
    }

    fn get(&self, n: usize) -> Option<String> {
        if n >= self.len {
            return None;
        }
        unsafe {
            let symbol = *self.symbols.add(n);
            if symbol.is_null() {
                return None;
            }
            Some(CStr::from_ptr(symbol).to_string_lossy().into_owned())
        }
    }
}

impl Drop for SymbolBuffer {
    fn drop(&mut self) {
        unsafe { libc::free(self.symbols as *mut c_void) }
    }
}

#[inline]
#[cfg(target_os = "linux")]
fn errno() -> c_int {
    unsafe { *libc::__errno_location() }
}

#[inline]
#[cfg(target_os = "macos")]
fn errno() -> c_int {
    unsafe { *libc::__error() }
}

/// Describes `errnum` like `strerror(3)` does, without touching the shared
/// static buffer `strerror` uses.
fn strerror(errnum: c_int) -> String {
    let mut buffer = [0u8; STRERROR_BUFFER_SIZE];
    let res = unsafe { libc::strerror_r(errnum, buffer.as_mut_ptr() as *mut c_char, buffer.len()) };
    if res == 0 {
        if let Some(message) = c_str(&buffer).filter(|m| !m.is_empty()) {
            return message.to_owned();
        }
    }
    format!("Error {}", errnum)
}
