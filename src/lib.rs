//! # rs-lionchief
//!
//! Control for Bluetooth LionChief model trains: command framing, an
//! optimistic mirror of the train's state, and timed choreographies.
//!
//! ## Features
//!
//! - **Transport abstraction**: Traits for the write characteristic and connection manager
//! - **Validated commands**: Out-of-range volumes and speeds never reach the wire
//! - **State mirror**: The last commanded speed, direction, headlight and volumes
//! - **Speed ramps**: Unit steps with engine sound rising and falling with speed
//! - **Choreographies**: Departure, arrival and reversal scripts with injectable delays
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without a train:
//!
//! - `traits` - Transport and delay abstractions
//! - `commands` - Command types and their payloads
//! - `codec` - Frame encoding with checksum
//! - `engine` - One validated operation per command, owns the state mirror
//! - `conductor` - Speed ramps and choreographies
//! - `hal` - Concrete implementations (mock for testing, wall-clock delay)
//!
//! ## Example
//!
//! ```rust
//! use rs_lionchief::{Conductor, TrainEngine, SoundPitch, hal::{MockDelay, MockLink}};
//!
//! // Connect resets the train to a known baseline
//! let engine = TrainEngine::connect(MockLink::new()).unwrap();
//! let mut conductor = Conductor::new(engine, MockDelay::new());
//!
//! conductor.set_horn_pitch(SoundPitch::Low).unwrap();
//! conductor.begin_train_service().unwrap();
//! assert_eq!(conductor.state().speed, 3);
//!
//! conductor.end_train_service().unwrap();
//! assert_eq!(conductor.state().speed, 0);
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Frame encoding: reserved header, payload, checksum.
pub mod codec;
/// Command identifiers, sound channels, pitches and phrases.
pub mod commands;
/// Speed ramps and timed choreographies over a [`TrainEngine`].
pub mod conductor;
/// Connection configuration for the transport.
pub mod config;
/// Command layer and state mirror for one connected train.
pub mod engine;
/// Validation and transport errors.
pub mod error;
/// Transport and delay implementations (mock for testing, desktop delay).
pub mod hal;
/// Unit-step speed ramps.
pub mod ramp;
/// Mirrored train state.
pub mod state;
/// Core traits for transport and timing abstraction.
pub mod traits;

/// Mutex-serialized access to one conductor (requires `std`).
#[cfg(feature = "std")]
pub mod shared;

// Re-exports for convenience
pub use codec::{checksum, encode_frame, Frame};
pub use commands::{Command, CommandType, SoundChannel, SoundPitch, SpeechPhrase};
pub use conductor::Conductor;
pub use engine::TrainEngine;
pub use error::{TrainError, ValidationError};
pub use ramp::{RampStep, SpeedRamp};
pub use state::TrainState;
pub use traits::{Delay, TrainConnector, TrainLink, WriteError};

// Config re-exports
pub use config::{Config, DeviceConfig, LinkConfig};

#[cfg(feature = "std")]
pub use shared::SharedConductor;
