//! Length-prefixed frame codec.
//!
//! Every packet on the debugger socket is `<length>:<payload>` where
//! `<length>` is the decimal UTF-8 byte length of the JSON payload.
//!
//! A single socket read can carry zero, one or many frames and one frame can
//! span many reads, so [`FrameBuffer`] accumulates bytes and hands out every
//! complete frame it holds.

// ============================================================================
// Imports
// ============================================================================

use tracing::warn;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Initial buffer capacity, sized to one socket read.
pub const INITIAL_CAPACITY: usize = 131_070;

/// Frame length delimiter.
const DELIMITER: u8 = b':';

/// Longest length prefix accepted (digits of `u64::MAX`).
const MAX_PREFIX_LEN: usize = 20;

// ============================================================================
// Encoding
// ============================================================================

/// Encodes a payload as a `<length>:<payload>` frame.
#[must_use]
pub fn encode_frame(payload: &str) -> Vec<u8> {
    let prefix = payload.len().to_string();
    let mut frame = Vec::with_capacity(prefix.len() + 1 + payload.len());
    frame.extend_from_slice(prefix.as_bytes());
    frame.push(DELIMITER);
    frame.extend_from_slice(payload.as_bytes());
    frame
}

// ============================================================================
// FrameBuffer
// ============================================================================

/// Accumulates raw socket bytes and extracts complete frames.
///
/// Owned by the reader loop; needs no lock.
#[derive(Debug)]
pub struct FrameBuffer {
    buffer: Vec<u8>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Appends received bytes to the tail.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Returns the number of buffered bytes not yet consumed.
    #[inline]
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Removes and returns every complete frame currently available.
    ///
    /// A partial trailing frame stays buffered. Frames that fail to decode
    /// are logged and skipped.
    pub fn extract_messages(&mut self) -> Vec<String> {
        let mut messages = Vec::new();

        while let Some(frame) = self.next_frame() {
            match frame {
                Ok(text) => messages.push(text),
                Err(e) => warn!(error = %e, "Dropping undecodable frame"),
            }
        }

        messages
    }

    /// Removes and returns the next complete frame.
    ///
    /// Returns `None` when no complete frame is buffered.
    ///
    /// # Errors
    ///
    /// [`Error::Framing`] when the length prefix is malformed (the pending
    /// bytes cannot be resynchronised and are discarded) or the payload is
    /// not valid UTF-8 (only that frame is discarded).
    pub fn next_frame(&mut self) -> Option<Result<String>> {
        let Some(index) = self.buffer.iter().position(|&b| b == DELIMITER) else {
            if self.buffer.len() > MAX_PREFIX_LEN {
                return Some(Err(self.discard_all("length prefix has no delimiter")));
            }
            return None;
        };

        let length = match parse_length(&self.buffer[..index]) {
            Ok(length) => length,
            Err(e) => {
                self.buffer.clear();
                return Some(Err(e));
            }
        };

        let start = index + 1;
        let Some(end) = start.checked_add(length) else {
            return Some(Err(self.discard_all("length prefix overflows")));
        };

        if self.buffer.len() < end {
            return None;
        }

        let payload: Vec<u8> = self.buffer.drain(..end).skip(start).collect();

        Some(String::from_utf8(payload).map_err(|e| Error::framing(format!("payload is not UTF-8: {e}"))))
    }

    /// Clears the buffer and returns a framing error.
    fn discard_all(&mut self, reason: &str) -> Error {
        let dropped = self.buffer.len();
        self.buffer.clear();
        Error::framing(format!("{reason} ({dropped} bytes dropped)"))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parses a decimal length prefix.
fn parse_length(prefix: &[u8]) -> Result<usize> {
    if prefix.is_empty() || prefix.len() > MAX_PREFIX_LEN || !prefix.iter().all(u8::is_ascii_digit)
    {
        return Err(Error::framing(format!(
            "malformed length prefix: {:?}",
            String::from_utf8_lossy(prefix)
        )));
    }

    // Digits only, so the str conversion cannot fail.
    std::str::from_utf8(prefix)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| Error::framing("length prefix out of range"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_extracts_consecutive_frames() {
        let mut buffer = FrameBuffer::new();
        buffer.append(b"5:hello6:world!");

        assert_eq!(buffer.extract_messages(), vec!["hello", "world!"]);
        assert_eq!(buffer.pending_len(), 0);
    }

    #[test]
    fn test_partial_frame_stays_buffered() {
        let mut buffer = FrameBuffer::new();
        buffer.append(b"5:hel");

        assert!(buffer.extract_messages().is_empty());
        assert_eq!(buffer.pending_len(), 5);

        buffer.append(b"lo");
        assert_eq!(buffer.extract_messages(), vec!["hello"]);
    }

    #[test]
    fn test_prefix_split_across_reads() {
        let mut buffer = FrameBuffer::new();
        buffer.append(b"1");
        assert!(buffer.extract_messages().is_empty());

        buffer.append(b"1:{\"a\":\"bcd\"}");
        assert_eq!(buffer.extract_messages(), vec!["{\"a\":\"bcd\"}"]);
    }

    #[test]
    fn test_length_counts_utf8_bytes() {
        let frame = encode_frame("héllo");
        assert_eq!(&frame[..2], b"6:");

        let mut buffer = FrameBuffer::new();
        buffer.append(&frame);
        assert_eq!(buffer.extract_messages(), vec!["héllo"]);
    }

    #[test]
    fn test_empty_payload() {
        let mut buffer = FrameBuffer::new();
        buffer.append(b"0:2:{}");
        assert_eq!(buffer.extract_messages(), vec!["", "{}"]);
    }

    #[test]
    fn test_malformed_prefix_is_framing_error() {
        let mut buffer = FrameBuffer::new();
        buffer.append(b"x5:hello");

        let result = buffer.next_frame();
        assert!(matches!(result, Some(Err(Error::Framing { .. }))));
        assert_eq!(buffer.pending_len(), 0);
    }

    #[test]
    fn test_signed_prefix_rejected() {
        let mut buffer = FrameBuffer::new();
        buffer.append(b"+5:hello");
        assert!(matches!(buffer.next_frame(), Some(Err(Error::Framing { .. }))));
    }

    #[test]
    fn test_runaway_prefix_discarded() {
        let mut buffer = FrameBuffer::new();
        buffer.append(&[b'9'; 32]);
        assert!(matches!(buffer.next_frame(), Some(Err(Error::Framing { .. }))));
        assert_eq!(buffer.pending_len(), 0);
    }

    #[test]
    fn test_invalid_utf8_skips_only_that_frame() {
        let mut buffer = FrameBuffer::new();
        buffer.append(b"2:\xff\xfe5:hello");

        assert_eq!(buffer.extract_messages(), vec!["hello"]);
        assert_eq!(buffer.pending_len(), 0);
    }

    proptest! {
        #[test]
        fn prop_chunk_boundaries_do_not_matter(
            payloads in proptest::collection::vec("\\PC{0,40}", 0..8),
            cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..10),
        ) {
            let stream: Vec<u8> = payloads.iter().flat_map(|p| encode_frame(p)).collect();

            let mut whole = FrameBuffer::new();
            whole.append(&stream);
            let expected = whole.extract_messages();
            prop_assert_eq!(&expected, &payloads);

            let mut positions: Vec<usize> = cuts.iter().map(|i| i.index(stream.len() + 1)).collect();
            positions.push(0);
            positions.push(stream.len());
            positions.sort_unstable();
            positions.dedup();

            let mut chunked = FrameBuffer::new();
            let mut actual = Vec::new();
            for window in positions.windows(2) {
                chunked.append(&stream[window[0]..window[1]]);
                actual.extend(chunked.extract_messages());
            }

            prop_assert_eq!(actual, expected);
            prop_assert_eq!(chunked.pending_len(), 0);
        }
    }
}
