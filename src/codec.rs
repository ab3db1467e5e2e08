//! Frame encoding for the train's command characteristic.
//!
//! Every command travels as
//!
//! ```text
//! ┌──────────┬──────────────────────┬──────────┐
//! │ Reserved │ Payload              │ Checksum │
//! │ 0x00     │ (1..=16 bytes)       │ (1 byte) │
//! └──────────┴──────────────────────┴──────────┘
//! ```
//!
//! The checksum is the sum of the payload bytes truncated to a byte. The
//! reserved byte is not part of the sum. There is no read path: the train
//! never answers, so only encoding is modelled.
//!
//! # Example
//!
//! ```rust
//! use rs_lionchief::codec::{checksum, encode_frame};
//!
//! let frame = encode_frame(&[69, 3]).unwrap();
//! assert_eq!(frame.as_slice(), &[0x00, 69, 3, 72]);
//! assert_eq!(checksum(&[68, 4, 14, 254]), 84);
//! ```

use heapless::Vec;

use crate::commands::Command;
use crate::error::ValidationError;

/// Constant first byte of every frame.
pub const FRAME_HEADER: u8 = 0x00;

/// Longest payload accepted by [`encode_frame`].
pub const MAX_PAYLOAD_LEN: usize = 16;

/// Longest frame: header + payload + checksum.
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD_LEN + 2;

/// An encoded, checksummed frame ready for [`TrainLink::write`].
///
/// [`TrainLink::write`]: crate::traits::TrainLink::write
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

/// Additive checksum of the payload, modulo 256.
#[inline]
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// Frame an arbitrary payload.
///
/// Performs no semantic validation; only the length is checked.
pub fn encode_frame(payload: &[u8]) -> Result<Frame, ValidationError> {
    if payload.is_empty() || payload.len() > MAX_PAYLOAD_LEN {
        return Err(ValidationError::PayloadLength {
            len: payload.len(),
            max: MAX_PAYLOAD_LEN,
        });
    }

    let mut frame = Frame::new();
    // Capacity is MAX_PAYLOAD_LEN + 2 and the payload length was checked above.
    let _ = frame.push(FRAME_HEADER);
    let _ = frame.extend_from_slice(payload);
    let _ = frame.push(checksum(payload));
    Ok(frame)
}

impl Command {
    /// Encode this command as a complete frame.
    pub fn to_frame(&self) -> Frame {
        // Typed payloads are 2..=4 bytes, always within MAX_PAYLOAD_LEN.
        encode_frame(&self.payload()).unwrap_or_default()
    }
}
