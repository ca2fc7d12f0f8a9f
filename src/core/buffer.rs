//! Reusable byte buffer that log records are formatted into
//!
//! The buffer is reset, never reallocated, between records, so once it has
//! grown to the size of the longest record no further allocation happens.

/// ANSI sequence that turns every attribute off
pub const COLOR_RESET: &[u8] = b"\x1b[0m";

/// Number of decimal digits needed for any `u32`
const INT_SCRATCH: usize = 10;

#[derive(Debug, Default, Clone)]
pub struct RecordBuffer {
    bytes: Vec<u8>,
}

impl RecordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Drop the logical content while keeping the allocated capacity
    #[inline]
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    #[inline]
    pub fn append_bytes(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    #[inline]
    pub fn append_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Append `value` in decimal, left-padded with `'0'` to at least `min_width` digits
    ///
    /// Digits are rendered least-significant-first into a stack scratch array,
    /// so clock components and line numbers never touch the heap.
    ///
    /// ```
    /// use color_logger::core::RecordBuffer;
    ///
    /// let mut buf = RecordBuffer::new();
    /// buf.append_int(7, 2);
    /// buf.append_byte(b'/');
    /// buf.append_int(2024, 4);
    /// assert_eq!(buf.bytes(), b"07/2024");
    /// ```
    pub fn append_int(&mut self, value: u32, min_width: usize) {
        let mut scratch = [b'0'; INT_SCRATCH];
        let mut pos = INT_SCRATCH;
        let mut remaining = value;
        loop {
            pos -= 1;
            scratch[pos] = b'0' + (remaining % 10) as u8;
            remaining /= 10;
            if remaining == 0 {
                break;
            }
        }

        let digits = INT_SCRATCH - pos;
        for _ in digits..min_width {
            self.bytes.push(b'0');
        }
        self.bytes.extend_from_slice(&scratch[pos..]);
    }

    /// Append a precomputed ANSI escape sequence
    #[inline]
    pub fn append_color(&mut self, escape: &[u8]) {
        self.bytes.extend_from_slice(escape);
    }

    #[inline]
    pub fn append_color_reset(&mut self) {
        self.bytes.extend_from_slice(COLOR_RESET);
    }

    /// Current logical content, exactly what was appended since the last reset
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }
}
