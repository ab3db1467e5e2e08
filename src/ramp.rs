//! Unit-step speed ramps that co-vary engine volume with speed.
//!
//! A ramp moves the speed one step at a time toward the target. Each step
//! carries the engine volume to send *before* the speed, so the engine sound
//! rises and falls with the commanded speed:
//!
//! ```text
//! engine_volume = ceil(speed / 3)
//! ```
//!
//! The starting speed is never revisited; the target is always the last step.
//!
//! # Example
//!
//! ```rust
//! use rs_lionchief::ramp::{RampStep, SpeedRamp};
//!
//! let steps: Vec<RampStep> = SpeedRamp::plan(0, 4).unwrap().collect();
//! assert_eq!(
//!     steps,
//!     vec![
//!         RampStep { engine_volume: 1, speed: 1 },
//!         RampStep { engine_volume: 1, speed: 2 },
//!         RampStep { engine_volume: 1, speed: 3 },
//!         RampStep { engine_volume: 2, speed: 4 },
//!     ]
//! );
//!
//! // A ramp to the current speed is rejected
//! assert!(SpeedRamp::plan(5, 5).is_err());
//! ```

use core::cmp::Ordering;

use crate::commands::MAX_SPEED;
use crate::error::ValidationError;

/// Engine volume paired with a speed step.
#[inline]
pub const fn engine_volume_for(speed: u8) -> u8 {
    speed.div_ceil(3)
}

/// One step of a ramp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RampStep {
    /// Engine volume to send first.
    pub engine_volume: u8,
    /// Speed to send second.
    pub speed: u8,
}

/// Iterator over the steps from one speed to another.
#[derive(Clone, Debug)]
pub struct SpeedRamp {
    current: u8,
    target: u8,
}

impl SpeedRamp {
    /// Plan a ramp from `from` to `target`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::SpeedOutOfRange`] if `target` exceeds 31
    /// - [`ValidationError::AlreadyAtSpeed`] if `target == from`
    pub fn plan(from: u8, target: u8) -> Result<Self, ValidationError> {
        if target > MAX_SPEED {
            return Err(ValidationError::SpeedOutOfRange {
                speed: target,
                max: MAX_SPEED,
            });
        }
        if from == target {
            return Err(ValidationError::AlreadyAtSpeed(target));
        }
        Ok(Self {
            current: from,
            target,
        })
    }

    /// Speed the ramp ends at.
    pub fn target(&self) -> u8 {
        self.target
    }

    /// Steps still to be taken.
    pub fn remaining(&self) -> usize {
        usize::from(self.current.abs_diff(self.target))
    }
}

impl Iterator for SpeedRamp {
    type Item = RampStep;

    fn next(&mut self) -> Option<RampStep> {
        let next = match self.current.cmp(&self.target) {
            Ordering::Less => self.current + 1,
            Ordering::Greater => self.current - 1,
            Ordering::Equal => return None,
        };
        self.current = next;
        Some(RampStep {
            engine_volume: engine_volume_for(next),
            speed: next,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for SpeedRamp {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_volume_is_ceiling_of_third() {
        assert_eq!(engine_volume_for(0), 0);
        assert_eq!(engine_volume_for(1), 1);
        assert_eq!(engine_volume_for(3), 1);
        assert_eq!(engine_volume_for(4), 2);
        assert_eq!(engine_volume_for(9), 3);
        assert_eq!(engine_volume_for(31), 11);
    }

    #[test]
    fn ramp_up_zero_to_nine() {
        let ramp = SpeedRamp::plan(0, 9).unwrap();
        assert_eq!(ramp.len(), 9);
        let (volumes, speeds): (Vec<u8>, Vec<u8>) =
            ramp.map(|s| (s.engine_volume, s.speed)).unzip();
        assert_eq!(volumes, [1, 1, 1, 2, 2, 2, 3, 3, 3]);
        assert_eq!(speeds, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn ramp_down_ten_to_four() {
        let (volumes, speeds): (Vec<u8>, Vec<u8>) = SpeedRamp::plan(10, 4)
            .unwrap()
            .map(|s| (s.engine_volume, s.speed))
            .unzip();
        assert_eq!(volumes, [3, 3, 3, 2, 2, 2]);
        assert_eq!(speeds, [9, 8, 7, 6, 5, 4]);
    }

    #[test]
    fn ramp_to_zero_silences_engine() {
        let last = SpeedRamp::plan(2, 0).unwrap().last().unwrap();
        assert_eq!(last, RampStep { engine_volume: 0, speed: 0 });
    }

    #[test]
    fn same_speed_rejected_for_every_valid_speed() {
        for speed in 0..=MAX_SPEED {
            assert_eq!(
                SpeedRamp::plan(speed, speed).unwrap_err(),
                ValidationError::AlreadyAtSpeed(speed)
            );
        }
    }

    #[test]
    fn target_above_31_rejected() {
        assert_eq!(
            SpeedRamp::plan(0, 32).unwrap_err(),
            ValidationError::SpeedOutOfRange { speed: 32, max: 31 }
        );
    }

    #[test]
    fn full_range_ramp() {
        let ramp = SpeedRamp::plan(31, 0).unwrap();
        assert_eq!(ramp.target(), 0);
        assert_eq!(ramp.count(), 31);
    }
}
