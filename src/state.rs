//! Optimistic local mirror of the train's configuration.
//!
//! The train never reports its state, so [`TrainState`] records what the
//! command layer *believes* it has set. Fields are only written by
//! [`TrainEngine`](crate::TrainEngine) setters after a send is believed to
//! have succeeded, with one exception: speed is recorded even when the speed
//! write fails.

use crate::commands::SoundChannel;

/// Level every volume is driven to by a reset.
pub const BASELINE_VOLUME: u8 = 7;

/// Snapshot of the assumed on-device state.
///
/// # Example
///
/// ```rust
/// use rs_lionchief::{TrainState, SoundChannel};
///
/// let state = TrainState::baseline();
/// assert_eq!(state.speed, 0);
/// assert!(state.light);
/// assert_eq!(state.channel_volume(SoundChannel::Engine), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainState {
    /// Speed step (0 to 31).
    pub speed: u8,
    /// True when running in reverse.
    pub reverse: bool,
    /// Headlight on.
    pub light: bool,
    /// Overall volume (0 to 7).
    pub volume: u8,
    /// Horn channel volume (0 to 13).
    pub volume_horn: u8,
    /// Engine channel volume (0 to 13).
    pub volume_engine: u8,
    /// Bell channel volume (0 to 13).
    pub volume_bell: u8,
    /// Speech channel volume (0 to 13).
    pub volume_speech: u8,
}

impl Default for TrainState {
    /// Values assumed at connection time, before the first reset.
    fn default() -> Self {
        Self {
            speed: 0,
            reverse: false,
            light: true,
            volume: 1,
            volume_horn: 1,
            volume_engine: 0,
            volume_bell: 1,
            volume_speech: 1,
        }
    }
}

impl TrainState {
    /// The canonical state a successful reset leaves behind.
    pub const fn baseline() -> Self {
        Self {
            speed: 0,
            reverse: false,
            light: true,
            volume: BASELINE_VOLUME,
            volume_horn: BASELINE_VOLUME,
            volume_engine: BASELINE_VOLUME,
            volume_bell: BASELINE_VOLUME,
            volume_speech: BASELINE_VOLUME,
        }
    }

    /// Recorded volume for one channel.
    pub const fn channel_volume(&self, channel: SoundChannel) -> u8 {
        match channel {
            SoundChannel::Horn => self.volume_horn,
            SoundChannel::Bell => self.volume_bell,
            SoundChannel::Speech => self.volume_speech,
            SoundChannel::Engine => self.volume_engine,
        }
    }

    pub(crate) fn set_channel_volume(&mut self, channel: SoundChannel, volume: u8) {
        match channel {
            SoundChannel::Horn => self.volume_horn = volume,
            SoundChannel::Bell => self.volume_bell = volume,
            SoundChannel::Speech => self.volume_speech = volume,
            SoundChannel::Engine => self.volume_engine = volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_connection_time_state() {
        let state = TrainState::default();
        assert_eq!(state.speed, 0);
        assert!(!state.reverse);
        assert!(state.light);
        assert_eq!(state.volume, 1);
        assert_eq!(state.volume_engine, 0);
        assert_eq!(state.volume_horn, 1);
    }

    #[test]
    fn baseline_differs_from_default() {
        assert_ne!(TrainState::baseline(), TrainState::default());
        let baseline = TrainState::baseline();
        for channel in SoundChannel::ALL {
            assert_eq!(baseline.channel_volume(channel), BASELINE_VOLUME);
        }
    }

    #[test]
    fn set_channel_volume_touches_one_field() {
        let mut state = TrainState::baseline();
        state.set_channel_volume(SoundChannel::Bell, 12);
        assert_eq!(state.volume_bell, 12);
        assert_eq!(state.volume_horn, 7);
        assert_eq!(state.volume_engine, 7);
        assert_eq!(state.volume_speech, 7);
    }
}
