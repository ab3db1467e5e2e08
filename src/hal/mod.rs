//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `desktop`: Wall-clock delay (requires `std` feature)
//!
//! Bluetooth links are supplied by the embedding application through
//! [`TrainLink`](crate::traits::TrainLink) and
//! [`TrainConnector`](crate::traits::TrainConnector).

pub mod mock;

#[cfg(feature = "std")]
pub mod desktop;

pub use mock::*;

#[cfg(feature = "std")]
pub use desktop::*;
