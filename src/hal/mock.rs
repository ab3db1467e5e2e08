//! Mock implementations for testing without a train.
//!
//! This module provides test doubles for the transport and timing traits,
//! enabling development and testing on desktop without Bluetooth hardware.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockLink`] | [`TrainLink`] | Records frames, scripted timeouts and failures |
//! | [`MockConnector`] | [`TrainConnector`] | Hands out queued links, counts connects |
//! | [`MockDelay`] | [`Delay`] | Records sleeps without waiting |
//!
//! # Example
//!
//! ```rust
//! use rs_lionchief::{Conductor, TrainEngine, TrainError};
//! use rs_lionchief::hal::{MockDelay, MockLink, MockLinkError};
//!
//! let engine = TrainEngine::connect(MockLink::new()).unwrap();
//! let mut conductor = Conductor::new(engine, MockDelay::new());
//!
//! // Fail the third write from now
//! let next = conductor.engine().link().frames.len();
//! conductor.engine_mut().link_mut().fail_write(next + 2);
//!
//! let err = conductor.adjust_speed_to(5).unwrap_err();
//! assert_eq!(err, TrainError::Link(MockLinkError::WriteFailed));
//! assert_eq!(conductor.state().speed, 1);
//! ```
//!
//! [`TrainLink`]: crate::traits::TrainLink
//! [`TrainConnector`]: crate::traits::TrainConnector
//! [`Delay`]: crate::traits::Delay

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::Config;
use crate::traits::{Delay, TrainConnector, TrainLink, WriteError};

// ============================================================================
// Link Mocks
// ============================================================================

/// Error produced by [`MockLink`] and [`MockConnector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockLinkError {
    /// Write attempted after `disconnect`.
    NotConnected,
    /// Scripted write failure.
    WriteFailed,
    /// Scripted connect failure.
    ConnectFailed,
}

/// Scripted outcome for one write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scripted {
    TimedOut,
    Fail,
    Short(usize),
}

/// Mock link for testing.
///
/// Records every frame passed to `write`, including ones whose outcome was
/// scripted to fail. Outcomes are scripted per write index, counted from
/// zero over the lifetime of the link.
///
/// # Example
///
/// ```rust
/// use rs_lionchief::hal::{MockLink, MockLinkError};
/// use rs_lionchief::traits::{TrainLink, WriteError};
///
/// let mut link = MockLink::new();
/// link.fail_write(1);
///
/// assert_eq!(link.write(&[0, 72, 1, 73]), Ok(4));
/// assert_eq!(link.write(&[0, 72, 0, 72]), Err(WriteError::Link(MockLinkError::WriteFailed)));
/// assert_eq!(link.payloads(), vec![vec![72, 1], vec![72, 0]]);
/// ```
#[derive(Debug)]
pub struct MockLink {
    /// Every frame written, in order.
    pub frames: Vec<Vec<u8>>,
    /// Whether the link is open.
    pub connected: bool,
    script: Vec<(usize, Scripted)>,
}

impl Default for MockLink {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLink {
    /// Creates a new mock link in connected state.
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            connected: true,
            script: Vec::new(),
        }
    }

    /// Report a soft timeout for write number `index`.
    pub fn time_out_write(&mut self, index: usize) {
        self.script.push((index, Scripted::TimedOut));
    }

    /// Report a hard failure for write number `index`.
    pub fn fail_write(&mut self, index: usize) {
        self.script.push((index, Scripted::Fail));
    }

    /// Report only `written` bytes for write number `index`.
    pub fn short_write(&mut self, index: usize, written: usize) {
        self.script.push((index, Scripted::Short(written)));
    }

    /// Frames with the reserved header and checksum stripped.
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.frames
            .iter()
            .map(|f| f.get(1..f.len().saturating_sub(1)).unwrap_or_default().to_vec())
            .collect()
    }

    /// Payloads whose first byte is `command`.
    pub fn payloads_for(&self, command: u8) -> Vec<Vec<u8>> {
        self.payloads()
            .into_iter()
            .filter(|p| p.first() == Some(&command))
            .collect()
    }

    fn scripted(&self, index: usize) -> Option<Scripted> {
        self.script
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, outcome)| *outcome)
    }
}

impl TrainLink for MockLink {
    type Error = MockLinkError;

    fn write(&mut self, frame: &[u8]) -> Result<usize, WriteError<MockLinkError>> {
        let index = self.frames.len();
        self.frames.push(frame.to_vec());
        if !self.connected {
            return Err(WriteError::Link(MockLinkError::NotConnected));
        }
        match self.scripted(index) {
            None => Ok(frame.len()),
            Some(Scripted::TimedOut) => Err(WriteError::TimedOut),
            Some(Scripted::Fail) => Err(WriteError::Link(MockLinkError::WriteFailed)),
            Some(Scripted::Short(written)) => Ok(written),
        }
    }

    fn disconnect(&mut self) -> Result<(), MockLinkError> {
        self.connected = false;
        Ok(())
    }
}

/// Mock connection manager for testing.
///
/// Hands out queued links in order, or fresh [`MockLink`]s when the queue
/// is empty.
///
/// # Example
///
/// ```rust
/// use rs_lionchief::config::Config;
/// use rs_lionchief::hal::MockConnector;
/// use rs_lionchief::traits::TrainConnector;
///
/// let mut connector = MockConnector::new();
/// connector.fail_next = true;
///
/// assert!(connector.connect(&Config::default()).is_err());
/// assert!(connector.connect(&Config::default()).is_ok());
/// assert_eq!(connector.connects, 2);
/// assert_eq!(connector.last_device.as_deref(), Some("LC-0-1-0429-754D"));
/// ```
#[derive(Debug, Default)]
pub struct MockConnector {
    /// Links to hand out before falling back to fresh ones.
    pub queued: Vec<MockLink>,
    /// Fail the next connect attempt.
    pub fail_next: bool,
    /// Number of connect attempts.
    pub connects: usize,
    /// Device name from the last connect attempt.
    pub last_device: Option<String>,
}

impl MockConnector {
    /// Creates a connector that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a pre-scripted link for the next connect.
    pub fn queue_link(&mut self, link: MockLink) {
        self.queued.push(link);
    }
}

impl TrainConnector for MockConnector {
    type Link = MockLink;

    fn connect(&mut self, config: &Config) -> Result<MockLink, MockLinkError> {
        self.connects += 1;
        self.last_device = Some(String::from(config.device.name.as_str()));
        if self.fail_next {
            self.fail_next = false;
            return Err(MockLinkError::ConnectFailed);
        }
        if self.queued.is_empty() {
            Ok(MockLink::new())
        } else {
            Ok(self.queued.remove(0))
        }
    }
}

// ============================================================================
// Timing Mocks
// ============================================================================

/// Mock delay for testing.
///
/// Records each requested delay in milliseconds and returns immediately.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Every delay requested, in milliseconds.
    pub delays: Vec<u32>,
}

impl MockDelay {
    /// Creates a new mock delay with no recorded sleeps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time slept.
    pub fn elapsed_ms(&self) -> u64 {
        self.delays.iter().map(|ms| u64::from(*ms)).sum()
    }
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
    }
}
