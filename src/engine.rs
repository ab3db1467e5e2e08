//! The command layer: one validated operation per physical command.
//!
//! [`TrainEngine`] owns the [`TrainLink`] and the [`TrainState`] mirror.
//! Every setter follows the same shape:
//!
//! 1. Validate parameters (a failure performs no write)
//! 2. Build the [`Command`] and encode it as a frame
//! 3. Write the frame to the link
//! 4. On success, record the new value in [`TrainState`]
//!
//! # Write Outcomes
//!
//! | Link result | Outcome |
//! |-------------|---------|
//! | all bytes written | success |
//! | [`WriteError::TimedOut`] | success, logged, not retried |
//! | fewer bytes written | [`TrainError::ShortWrite`] |
//! | [`WriteError::Link`] | [`TrainError::Link`] |
//!
//! A soft timeout is not retried: a duplicated horn or bell toggle is worse
//! than a dropped one.
//!
//! # Speed Is Recorded Unconditionally
//!
//! [`TrainEngine::set_speed`] records the requested speed in the mirror even
//! when the write fails. After a failed speed write the mirror may disagree
//! with the train. Every other field is only updated on success.
//!
//! # Example
//!
//! ```rust
//! use rs_lionchief::{TrainEngine, TrainState, SoundChannel};
//! use rs_lionchief::hal::MockLink;
//!
//! let mut engine = TrainEngine::connect(MockLink::new()).unwrap();
//! assert_eq!(engine.state(), TrainState::baseline());
//!
//! engine.set_channel_volume(SoundChannel::Horn, 10).unwrap();
//! engine.set_horn(true).unwrap();
//!
//! assert_eq!(engine.state().volume_horn, 10);
//! assert_eq!(engine.link().payloads().last().unwrap(), &[72, 1]);
//!
//! // Out of range: rejected before any write
//! assert!(engine.set_main_volume(8).is_err());
//! ```

use tracing::{debug, info, warn};

use crate::codec::{encode_frame, Frame};
use crate::commands::{
    Command, SoundChannel, SoundPitch, SpeechPhrase, MAX_CHANNEL_VOLUME, MAX_MAIN_VOLUME,
};
use crate::error::{TrainError, ValidationError};
use crate::state::{TrainState, BASELINE_VOLUME};
use crate::traits::{TrainLink, WriteError};

/// Command layer for one connected train.
///
/// # Type Parameter
///
/// - `L`: The transport ([`TrainLink`] trait)
///
/// # Thread Safety
///
/// The engine is a single-owner object with no internal locking. Overlapping
/// writes to the same characteristic have undefined physical ordering, so
/// embedders with several callers should serialize access, for example with
/// `SharedConductor` (requires `std`).
pub struct TrainEngine<L: TrainLink> {
    link: L,
    state: TrainState,
}

impl<L: TrainLink> TrainEngine<L> {
    /// Wrap a connected link without touching the train.
    ///
    /// The mirror starts at [`TrainState::default`], which does not
    /// necessarily match the device. Prefer [`connect`](Self::connect).
    pub fn new(link: L) -> Self {
        Self {
            link,
            state: TrainState::default(),
        }
    }

    /// Wrap a connected link and drive the train to the baseline state.
    ///
    /// Fails if any step of [`reset_state`](Self::reset_state) fails.
    pub fn connect(link: L) -> Result<Self, TrainError<L::Error>> {
        let mut engine = Self::new(link);
        engine.reset_state()?;
        info!("train connected and reset");
        Ok(engine)
    }

    // ------------------------------------------------------------------------
    // Frame dispatch
    // ------------------------------------------------------------------------

    fn send(&mut self, cmd: Command) -> Result<(), TrainError<L::Error>> {
        debug!(command = ?cmd, "send command");
        let frame = cmd.to_frame();
        self.write_frame(&frame)
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), TrainError<L::Error>> {
        debug!(frame = ?frame.as_slice(), "write frame");
        match self.link.write(frame) {
            Ok(written) if written == frame.len() => Ok(()),
            Ok(written) => Err(TrainError::ShortWrite {
                written,
                expected: frame.len(),
            }),
            Err(WriteError::TimedOut) => {
                warn!(frame = ?frame.as_slice(), "command timed out on write, continuing on");
                Ok(())
            }
            Err(WriteError::Link(e)) => Err(TrainError::Link(e)),
        }
    }

    /// Frame and send an arbitrary payload.
    ///
    /// Only the payload length is checked (1 to 16 bytes). The mirror is
    /// not updated.
    pub fn send_custom_command(&mut self, payload: &[u8]) -> Result<(), TrainError<L::Error>> {
        let frame = encode_frame(payload)?;
        self.write_frame(&frame)
    }

    // ------------------------------------------------------------------------
    // Volume and pitch
    // ------------------------------------------------------------------------

    /// Set the overall volume (0 to 7).
    pub fn set_main_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        if volume > MAX_MAIN_VOLUME {
            return Err(ValidationError::VolumeOutOfRange {
                volume,
                min: 0,
                max: MAX_MAIN_VOLUME,
            }
            .into());
        }
        self.send(Command::MainVolume(volume))?;
        self.state.volume = volume;
        Ok(())
    }

    /// Set the running volume of one channel (0 to 13).
    pub fn set_channel_volume(
        &mut self,
        channel: SoundChannel,
        volume: u8,
    ) -> Result<(), TrainError<L::Error>> {
        if volume > MAX_CHANNEL_VOLUME {
            return Err(ValidationError::VolumeOutOfRange {
                volume,
                min: 0,
                max: MAX_CHANNEL_VOLUME,
            }
            .into());
        }
        self.send(Command::ChannelVolume { channel, volume })?;
        self.state.set_channel_volume(channel, volume);
        Ok(())
    }

    /// Set the horn volume (0 to 13).
    pub fn set_horn_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        self.set_channel_volume(SoundChannel::Horn, volume)
    }

    /// Set the engine volume (0 to 13).
    pub fn set_engine_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        self.set_channel_volume(SoundChannel::Engine, volume)
    }

    /// Set the bell volume (0 to 13).
    pub fn set_bell_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        self.set_channel_volume(SoundChannel::Bell, volume)
    }

    /// Set the speech volume (0 to 13).
    pub fn set_speech_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        self.set_channel_volume(SoundChannel::Speech, volume)
    }

    /// Set the pitch of one channel. Pitch is not mirrored.
    ///
    /// On the speech channel this shares its wire form with phrase selection.
    pub fn set_channel_pitch(
        &mut self,
        channel: SoundChannel,
        pitch: SoundPitch,
    ) -> Result<(), TrainError<L::Error>> {
        self.send(Command::ChannelPitch { channel, pitch })
    }

    /// Set the horn pitch.
    pub fn set_horn_pitch(&mut self, pitch: SoundPitch) -> Result<(), TrainError<L::Error>> {
        self.set_channel_pitch(SoundChannel::Horn, pitch)
    }

    /// Set the engine pitch.
    pub fn set_engine_pitch(&mut self, pitch: SoundPitch) -> Result<(), TrainError<L::Error>> {
        self.set_channel_pitch(SoundChannel::Engine, pitch)
    }

    /// Set the bell pitch.
    pub fn set_bell_pitch(&mut self, pitch: SoundPitch) -> Result<(), TrainError<L::Error>> {
        self.set_channel_pitch(SoundChannel::Bell, pitch)
    }

    /// Set the speech pitch.
    pub fn set_speech_pitch(&mut self, pitch: SoundPitch) -> Result<(), TrainError<L::Error>> {
        self.set_channel_pitch(SoundChannel::Speech, pitch)
    }

    // ------------------------------------------------------------------------
    // Speech
    // ------------------------------------------------------------------------

    /// Select the phrase the next [`speak`](Self::speak) will announce.
    pub fn set_speech_phrase(&mut self, phrase: SpeechPhrase) -> Result<(), TrainError<L::Error>> {
        self.send(Command::SelectPhrase(phrase))
    }

    /// Trigger speech of the selected phrase.
    pub fn speak(&mut self) -> Result<(), TrainError<L::Error>> {
        self.send(Command::Speak)
    }

    /// Select a phrase and speak it.
    pub fn speak_phrase(&mut self, phrase: SpeechPhrase) -> Result<(), TrainError<L::Error>> {
        debug!(?phrase, "speak phrase");
        self.set_speech_phrase(phrase)?;
        self.speak()
    }

    // ------------------------------------------------------------------------
    // Motion, lights, signals
    // ------------------------------------------------------------------------

    /// Set the speed step.
    ///
    /// Not range checked here; [`Conductor::adjust_speed_to`] enforces
    /// 0 to 31. The mirror records `speed` even if the write fails.
    ///
    /// [`Conductor::adjust_speed_to`]: crate::Conductor::adjust_speed_to
    pub fn set_speed(&mut self, speed: u8) -> Result<(), TrainError<L::Error>> {
        let result = self.send(Command::Speed(speed));
        self.state.speed = speed;
        result
    }

    /// Last recorded speed step.
    pub fn speed(&self) -> u8 {
        self.state.speed
    }

    /// Set reverse (true) or forward (false).
    pub fn set_reverse(&mut self, enabled: bool) -> Result<(), TrainError<L::Error>> {
        self.send(Command::Reverse(enabled))?;
        self.state.reverse = enabled;
        Ok(())
    }

    /// Last recorded direction.
    pub fn reverse(&self) -> bool {
        self.state.reverse
    }

    /// Turn the headlight on or off.
    pub fn set_light(&mut self, enabled: bool) -> Result<(), TrainError<L::Error>> {
        self.send(Command::Lights(enabled))?;
        self.state.light = enabled;
        Ok(())
    }

    /// Last recorded headlight state.
    pub fn light(&self) -> bool {
        self.state.light
    }

    /// Start or stop the horn.
    pub fn set_horn(&mut self, enabled: bool) -> Result<(), TrainError<L::Error>> {
        self.send(Command::Horn(enabled))
    }

    /// Start or stop the bell.
    pub fn set_bell(&mut self, enabled: bool) -> Result<(), TrainError<L::Error>> {
        self.send(Command::Bell(enabled))
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Drive the train and the mirror to [`TrainState::baseline`].
    ///
    /// Sends speed, reverse, light, main volume, then horn, engine, bell
    /// and speech volumes. Stops at the first failure, leaving the train
    /// partially reset.
    pub fn reset_state(&mut self) -> Result<(), TrainError<L::Error>> {
        info!("reset train state");
        self.set_speed(0)?;
        self.set_reverse(false)?;
        self.set_light(true)?;
        self.set_main_volume(BASELINE_VOLUME)?;
        for channel in SoundChannel::ALL {
            self.set_channel_volume(channel, BASELINE_VOLUME)?;
        }
        Ok(())
    }

    /// Send the disconnect signal, then close the link.
    ///
    /// The link is closed even if the signal could not be sent; a close
    /// failure takes precedence over a signal failure.
    pub fn disconnect(&mut self) -> Result<(), TrainError<L::Error>> {
        info!("disconnect train");
        let signal = self.send(Command::Disconnect);
        if let Err(e) = &signal {
            warn!(error = ?e, "disconnect signal failed");
        }
        self.link.disconnect().map_err(TrainError::Link)?;
        signal
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Snapshot of the mirrored state.
    pub fn state(&self) -> TrainState {
        self.state
    }

    /// Borrow the link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutably borrow the link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Consume the engine, returning the link.
    pub fn into_link(self) -> L {
        self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockLink, MockLinkError};

    fn engine() -> TrainEngine<MockLink> {
        TrainEngine::new(MockLink::new())
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn main_volume_accepts_zero_to_seven() {
        let mut engine = engine();
        for volume in 0..=7 {
            engine.set_main_volume(volume).unwrap();
            assert_eq!(engine.state().volume, volume);
        }
        assert_eq!(engine.link().frames.len(), 8);
    }

    #[test]
    fn main_volume_rejects_eight_without_writing() {
        let mut engine = engine();
        let err = engine.set_main_volume(8).unwrap_err();
        assert_eq!(
            err,
            TrainError::Invalid(ValidationError::VolumeOutOfRange {
                volume: 8,
                min: 0,
                max: 7
            })
        );
        assert!(engine.link().frames.is_empty());
        assert_eq!(engine.state().volume, 1);
    }

    #[test]
    fn channel_volume_bounds() {
        let mut engine = engine();
        engine.set_engine_volume(13).unwrap();
        assert_eq!(engine.state().volume_engine, 13);

        assert!(engine.set_engine_volume(14).unwrap_err().is_validation());
        assert!(engine.set_bell_volume(255).unwrap_err().is_validation());
        assert_eq!(engine.state().volume_engine, 13);
        assert_eq!(engine.link().frames.len(), 1);
    }

    // =========================================================================
    // State Update Tests
    // =========================================================================

    #[test]
    fn pitch_and_speech_do_not_touch_state() {
        let mut engine = engine();
        let before = engine.state();
        engine.set_bell_pitch(SoundPitch::Highest).unwrap();
        engine.speak_phrase(SpeechPhrase::CallMePennsylvaniaFlyer).unwrap();
        assert_eq!(engine.state(), before);
        assert_eq!(
            engine.link().payloads(),
            vec![vec![68, 2, 14, 2], vec![68, 3, 14, 2], vec![77, 0]]
        );
    }

    #[test]
    fn failed_volume_write_keeps_old_value() {
        let mut engine = engine();
        engine.link_mut().fail_write(0);
        let err = engine.set_horn_volume(9).unwrap_err();
        assert_eq!(err, TrainError::Link(MockLinkError::WriteFailed));
        assert_eq!(engine.state().volume_horn, 1);
    }

    #[test]
    fn failed_speed_write_is_still_recorded() {
        let mut engine = engine();
        engine.link_mut().fail_write(0);
        assert!(engine.set_speed(12).is_err());
        assert_eq!(engine.speed(), 12);
    }

    #[test]
    fn failed_reverse_and_light_writes_are_not_recorded() {
        let mut engine = engine();
        engine.link_mut().fail_write(0);
        engine.link_mut().fail_write(1);
        assert!(engine.set_reverse(true).is_err());
        assert!(engine.set_light(false).is_err());
        assert!(!engine.reverse());
        assert!(engine.light());
    }

    // =========================================================================
    // Transport Policy Tests
    // =========================================================================

    #[test]
    fn soft_timeout_is_success() {
        let mut engine = engine();
        engine.link_mut().time_out_write(0);
        engine.set_light(false).unwrap();
        assert!(!engine.light());
        assert_eq!(engine.link().frames.len(), 1);
    }

    #[test]
    fn short_write_is_hard_error() {
        let mut engine = engine();
        engine.link_mut().short_write(0, 3);
        let err = engine.set_main_volume(5).unwrap_err();
        assert_eq!(
            err,
            TrainError::ShortWrite {
                written: 3,
                expected: 4
            }
        );
        assert_eq!(engine.state().volume, 1);
    }

    #[test]
    fn custom_command_is_framed() {
        let mut engine = engine();
        engine.send_custom_command(&[0x45, 0x05]).unwrap();
        assert_eq!(engine.link().frames[0], vec![0x00, 0x45, 0x05, 0x4a]);
        assert!(engine.send_custom_command(&[]).unwrap_err().is_validation());
    }

    // =========================================================================
    // Lifecycle Tests
    // =========================================================================

    #[test]
    fn reset_sends_full_ordered_sequence() {
        let mut engine = engine();
        engine.reset_state().unwrap();
        assert_eq!(
            engine.link().payloads(),
            vec![
                vec![69, 0],
                vec![70, 0],
                vec![81, 1],
                vec![76, 7],
                vec![68, 1, 7],
                vec![68, 4, 7],
                vec![68, 2, 7],
                vec![68, 3, 7],
            ]
        );
        assert_eq!(engine.state(), TrainState::baseline());
    }

    #[test]
    fn reset_aborts_on_first_failure() {
        let mut engine = engine();
        engine.link_mut().fail_write(4);
        assert!(engine.reset_state().is_err());
        assert_eq!(engine.link().frames.len(), 5);
        let state = engine.state();
        assert_eq!(state.volume, 7);
        assert_eq!(state.volume_horn, 1);
        assert_eq!(state.volume_engine, 0);
    }

    #[test]
    fn disconnect_signals_then_closes() {
        let mut engine = engine();
        engine.disconnect().unwrap();
        assert_eq!(engine.link().payloads(), vec![vec![75, 0, 0]]);
        assert!(!engine.link().connected);
    }

    #[test]
    fn disconnect_closes_even_when_signal_fails() {
        let mut engine = engine();
        engine.link_mut().fail_write(0);
        let err = engine.disconnect().unwrap_err();
        assert_eq!(err, TrainError::Link(MockLinkError::WriteFailed));
        assert!(!engine.link().connected);
    }
}
