//! Receive buffer with a bounded prompt search window.
//!
//! Prompts sit at the very end of a reply, so only the last `search_depth`
//! bytes are handed to the prompt patterns. Long show-command output does
//! not make each match attempt slower.

use bytes::BytesMut;

/// Console output received since the last prompt.
#[derive(Debug)]
pub struct PatternBuffer {
    data: BytesMut,
    search_depth: usize,
}

impl PatternBuffer {
    pub fn new(search_depth: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(4096),
            search_depth,
        }
    }

    /// Append received console data.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Search window: the last `search_depth` bytes.
    pub fn tail(&self) -> &[u8] {
        let start = self.data.len().saturating_sub(self.search_depth);
        &self.data[start..]
    }

    /// Hand over everything received so far, leaving the buffer empty.
    pub fn take(&mut self) -> BytesMut {
        self.data.split()
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_is_bounded() {
        let mut buffer = PatternBuffer::new(20);
        buffer.extend(&[b'x'; 100]);
        buffer.extend(b"\r\nSwitch1#");

        assert_eq!(buffer.tail().len(), 20);
        assert!(buffer.tail().ends_with(b"Switch1#"));
    }

    #[test]
    fn test_short_buffer_tail_is_everything() {
        let mut buffer = PatternBuffer::default();
        buffer.extend(b"Switch1>");
        assert_eq!(buffer.tail(), b"Switch1>");
    }

    #[test]
    fn test_prompt_outside_window() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"Switch1#");
        buffer.extend(&[b'x'; 100]);
        assert!(!buffer.tail().windows(8).any(|w| w == b"Switch1#"));
    }

    #[test]
    fn test_take_clears_buffer() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"show clock");
        assert_eq!(&buffer.take()[..], b"show clock");
        assert!(buffer.tail().is_empty());
    }
}
