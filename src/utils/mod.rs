use std::ffi::CStr;
use std::fmt;

/// A raw return address, printed the way `%p` prints it.
///
/// The address is never dereferenced.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Address(pub usize);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A [fmt::Write] sink over a fixed byte buffer.
///
/// The content is always NUL-terminated. Anything that does not fit is
/// silently dropped, and truncation only ever happens on a char boundary so
/// the buffer stays valid UTF-8.
pub struct BoundedWriter<'a> {
    buffer: &'a mut [u8],
    len: usize,
}

impl<'a> BoundedWriter<'a> {
    #[inline]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        if let Some(first) = buffer.first_mut() {
            *first = 0;
        }
        Self { buffer, len: 0 }
    }

    /// Number of bytes written, excluding the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn capacity(&self) -> usize {
        // One byte is reserved for the terminator.
        self.buffer.len().saturating_sub(1)
    }
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.capacity() - self.len;
        let mut n = s.len().min(room);
        while !s.is_char_boundary(n) {
            n -= 1;
        }
        self.buffer[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        if self.len < self.buffer.len() {
            self.buffer[self.len] = 0;
        }
        Ok(())
    }
}

/// Reads the NUL-terminated string at the start of `buffer`.
///
/// Returns `None` when there is no terminator or the content is not UTF-8.
pub fn c_str(buffer: &[u8]) -> Option<&str> {
    CStr::from_bytes_until_nul(buffer).ok()?.to_str().ok()
}
