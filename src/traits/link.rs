//! Transport abstraction for the train's write characteristic.
//!
//! The core never talks to a Bluetooth stack directly. It needs exactly two
//! capabilities from the outside world:
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`TrainLink`] | Write one frame to the connected write characteristic |
//! | [`TrainConnector`] | Produce a connected [`TrainLink`] from a [`Config`] |
//!
//! Discovery, pairing, enabling the radio and reconnect policy all live in
//! the implementation of these traits.
//!
//! # Soft Timeouts
//!
//! Acknowledged writes can report that the device answered too slowly even
//! though the radio link is fine. Implementations report that case as
//! [`WriteError::TimedOut`] rather than [`WriteError::Link`]; the command
//! layer treats it as a best-effort success and never retries it.
//!
//! # Example
//!
//! ```rust
//! use rs_lionchief::traits::{TrainLink, WriteError};
//! use rs_lionchief::hal::MockLink;
//!
//! let mut link = MockLink::new();
//! assert_eq!(link.write(&[0x00, 0x45, 0x03, 0x48]), Ok(4));
//!
//! link.time_out_write(1);
//! assert_eq!(link.write(&[0x00, 0x47, 0x01, 0x48]), Err(WriteError::TimedOut));
//! ```
//!
//! [`Config`]: crate::config::Config

use crate::config::Config;

/// Failure reported by [`TrainLink::write`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteError<E> {
    /// The write was probably sent but not acknowledged in time.
    ///
    /// Not a failure from the command layer's point of view.
    TimedOut,
    /// Any other transport failure (connection lost, stack error).
    Link(E),
}

/// A connected, write-capable handle to the train's command characteristic.
///
/// # Implementation Notes
///
/// - `write` must return the number of bytes actually handed to the radio
/// - A soft timeout must be reported as [`WriteError::TimedOut`]
/// - `disconnect` closes the underlying connection; further writes may fail
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_lionchief::traits::{TrainLink, WriteError};
///
/// struct GattLink { /* characteristic handle */ }
///
/// impl TrainLink for GattLink {
///     type Error = GattError;
///
///     fn write(&mut self, frame: &[u8]) -> Result<usize, WriteError<GattError>> {
///         match self.characteristic.write(frame) {
///             Ok(n) => Ok(n),
///             Err(GattError::WriteTimeout) => Err(WriteError::TimedOut),
///             Err(e) => Err(WriteError::Link(e)),
///         }
///     }
///
///     fn disconnect(&mut self) -> Result<(), GattError> {
///         self.device.disconnect()
///     }
/// }
/// ```
pub trait TrainLink {
    /// Transport error type.
    type Error: core::fmt::Debug;

    /// Write one complete frame, returning the number of bytes written.
    fn write(&mut self, frame: &[u8]) -> Result<usize, WriteError<Self::Error>>;

    /// Close the connection to the train.
    fn disconnect(&mut self) -> Result<(), Self::Error>;
}

/// Connection manager that turns configuration into a connected link.
///
/// Implementations are responsible for enabling the adapter, locating the
/// device named in [`Config::device`] and resolving the service and write
/// characteristic named in [`Config::link`].
pub trait TrainConnector {
    /// The link type produced on success.
    type Link: TrainLink;

    /// Connect to the configured train.
    fn connect(
        &mut self,
        config: &Config,
    ) -> Result<Self::Link, <Self::Link as TrainLink>::Error>;
}

impl<T: TrainLink + ?Sized> TrainLink for &mut T {
    type Error = T::Error;

    fn write(&mut self, frame: &[u8]) -> Result<usize, WriteError<Self::Error>> {
        (**self).write(frame)
    }

    fn disconnect(&mut self) -> Result<(), Self::Error> {
        (**self).disconnect()
    }
}
