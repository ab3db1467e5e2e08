//! Error types for the command and sequencing layers.
//!
//! Two levels:
//!
//! - [`ValidationError`]: a parameter was rejected before any I/O happened
//! - [`TrainError`]: everything a train operation can fail with, generic over
//!   the transport's error type
//!
//! Soft write timeouts are not errors and never appear here.

use thiserror::Error;

/// A parameter was out of range or outside a fixed whitelist.
///
/// Raised before anything is written; no state changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Volume outside the inclusive range for its control.
    #[error("invalid volume {volume}, must be between '{min}' and '{max}' (inclusive)")]
    VolumeOutOfRange {
        /// Requested volume.
        volume: u8,
        /// Lowest accepted value.
        min: u8,
        /// Highest accepted value.
        max: u8,
    },

    /// Ramp target outside `0..=max`.
    #[error("speed {speed} out of range, must be between 0 and {max}")]
    SpeedOutOfRange {
        /// Requested speed.
        speed: u8,
        /// Highest accepted speed.
        max: u8,
    },

    /// Ramp target equals the current speed.
    #[error("train is already at speed {0}")]
    AlreadyAtSpeed(u8),

    /// Integer is not one of the defined pitch codes.
    #[error("invalid pitch {0}, must be one of 254 (lowest), 255 (low), 0 (normal), 1 (high), 2 (highest)")]
    InvalidPitch(i32),

    /// Integer is not one of the defined speech phrases.
    #[error("invalid speech phrase {0}")]
    InvalidPhrase(i32),

    /// Byte is not a known command identifier.
    #[error("unknown command type {0}")]
    InvalidCommandType(u8),

    /// Byte is not a known sound channel.
    #[error("unknown sound channel {0}")]
    InvalidChannel(u8),

    /// Custom payload is empty or does not fit in a frame.
    #[error("command payload of {len} bytes, must be between 1 and {max}")]
    PayloadLength {
        /// Payload length supplied.
        len: usize,
        /// Longest accepted payload.
        max: usize,
    },
}

/// Error returned by train operations.
///
/// `E` is the [`TrainLink`](crate::traits::TrainLink) error type.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum TrainError<E> {
    /// Rejected before any I/O.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The link accepted fewer bytes than the frame holds.
    #[error("writing command only wrote '{written}' bytes of '{expected}'")]
    ShortWrite {
        /// Bytes the link reported as written.
        written: usize,
        /// Frame length.
        expected: usize,
    },

    /// Hard transport failure during a write or disconnect.
    #[error("link error: {0:?}")]
    Link(E),

    /// The connector could not produce a link.
    #[error("connect failed: {0:?}")]
    Connect(E),
}

impl<E> TrainError<E> {
    /// Returns true if the error was raised before any write was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(self, TrainError::Invalid(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn volume_message_names_bounds() {
        let err = ValidationError::VolumeOutOfRange {
            volume: 8,
            min: 0,
            max: 7,
        };
        assert_eq!(
            err.to_string(),
            "invalid volume 8, must be between '0' and '7' (inclusive)"
        );
    }

    #[test]
    fn already_at_speed_message() {
        let err: TrainError<()> = ValidationError::AlreadyAtSpeed(3).into();
        assert_eq!(err.to_string(), "train is already at speed 3");
        assert!(err.is_validation());
    }

    #[test]
    fn short_write_message() {
        let err: TrainError<()> = TrainError::ShortWrite {
            written: 2,
            expected: 4,
        };
        assert_eq!(
            err.to_string(),
            "writing command only wrote '2' bytes of '4'"
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn link_error_uses_debug_of_inner() {
        #[derive(Debug)]
        struct Gone;
        let err = TrainError::Link(Gone);
        assert_eq!(err.to_string(), "link error: Gone");
    }
}
