//! Trait definitions for the transport and timing seams.
//!
//! This module defines the abstractions that keep the command and sequencing
//! layers independent of any particular Bluetooth stack or clock:
//!
//! - `link`: [`TrainLink`] frame writer and [`TrainConnector`] connection manager
//! - `delay`: [`Delay`] for the sleeps inside choreographies
//!
//! Mock implementations for desktop testing live in [`crate::hal::mock`].

pub mod delay;
pub mod link;

pub use delay::*;
pub use link::*;
