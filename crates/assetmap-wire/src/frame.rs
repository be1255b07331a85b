//! Length-prefixed framing for event logs.
//!
//! A log is a sequence of frames, each a 4-byte big-endian length followed
//! by one encoded record. A clean end of input between frames ends the log;
//! an end of input inside a frame is [`WireError::Truncated`].

use bytes::{Buf, BufMut, BytesMut};

use crate::error::WireError;
use crate::limits::WireLimits;

/// Size of the length prefix in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Append one framed record to `buf`.
pub fn write_frame(buf: &mut BytesMut, record: &[u8]) -> Result<(), WireError> {
    let len = u32::try_from(record.len()).map_err(|e| WireError::Encode(e.to_string()))?;
    buf.reserve(FRAME_HEADER_LEN.saturating_add(record.len()));
    buf.put_u32(len);
    buf.put_slice(record);
    Ok(())
}

/// Iterates over the records of a framed log.
///
/// Stops after the first error.
#[derive(Debug)]
pub struct FrameReader<'a> {
    remaining: &'a [u8],
    max_frame_bytes: usize,
    failed: bool,
}

impl<'a> FrameReader<'a> {
    /// Read frames from `input`, rejecting any larger than
    /// `limits.max_frame_bytes`.
    pub const fn new(input: &'a [u8], limits: &WireLimits) -> Self {
        Self {
            remaining: input,
            max_frame_bytes: limits.max_frame_bytes,
            failed: false,
        }
    }

    fn next_frame(&mut self) -> Result<&'a [u8], WireError> {
        if self.remaining.remaining() < FRAME_HEADER_LEN {
            return Err(WireError::Truncated);
        }
        let len = usize::try_from(self.remaining.get_u32())
            .map_err(|e| WireError::Malformed(e.to_string()))?;
        if len > self.max_frame_bytes {
            tracing::warn!(len, max = self.max_frame_bytes, "frame rejected: too large");
            return Err(WireError::LimitExceeded("max_frame_bytes"));
        }
        let (record, rest) = self
            .remaining
            .split_at_checked(len)
            .ok_or(WireError::Truncated)?;
        self.remaining = rest;
        Ok(record)
    }
}

impl<'a> Iterator for FrameReader<'a> {
    type Item = Result<&'a [u8], WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining.is_empty() {
            return None;
        }
        let frame = self.next_frame();
        self.failed = frame.is_err();
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::indexing_slicing,
        clippy::arithmetic_side_effects
    )]

    use super::*;

    #[test]
    fn frames_come_back_in_order() {
        let mut buf = BytesMut::new();
        write_frame(&mut buf, b"first").unwrap();
        write_frame(&mut buf, b"").unwrap();
        write_frame(&mut buf, b"third").unwrap();

        let frames: Result<Vec<_>, _> =
            FrameReader::new(&buf, &WireLimits::default()).collect();
        assert_eq!(
            frames.unwrap(),
            vec![&b"first"[..], &b""[..], &b"third"[..]]
        );
    }

    #[test]
    fn truncated_tail_is_an_error() {
        let mut buf = BytesMut::new();
        write_frame(&mut buf, b"complete").unwrap();
        write_frame(&mut buf, b"cut short").unwrap();
        let cut = buf.len() - 3;

        let mut reader = FrameReader::new(&buf[..cut], &WireLimits::default());
        assert_eq!(reader.next(), Some(Ok(&b"complete"[..])));
        assert_eq!(reader.next(), Some(Err(WireError::Truncated)));
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn partial_header_is_an_error() {
        let mut reader = FrameReader::new(&[0, 0], &WireLimits::default());
        assert_eq!(reader.next(), Some(Err(WireError::Truncated)));
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let mut buf = BytesMut::new();
        write_frame(&mut buf, &[0_u8; 32]).unwrap();
        let limits = WireLimits {
            max_frame_bytes: 16,
            ..WireLimits::default()
        };
        let mut reader = FrameReader::new(&buf, &limits);
        assert_eq!(
            reader.next(),
            Some(Err(WireError::LimitExceeded("max_frame_bytes")))
        );
    }
}
