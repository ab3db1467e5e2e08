//! The sequencing layer: speed ramps and timed choreographies.
//!
//! [`Conductor`] composes [`TrainEngine`] operations and [`Delay`] sleeps
//! into named behaviors. It has no protocol knowledge of its own.
//!
//! # Choreographies
//!
//! | Operation | Script |
//! |-----------|--------|
//! | [`begin_train_service`](Conductor::begin_train_service) | bell on, 1 s, bell off, 2 s, ramp to 3 |
//! | [`end_train_service`](Conductor::end_train_service) | horn on, 1 s, horn off, 1 s, ramp to 0 |
//! | [`reverse_train_service`](Conductor::reverse_train_service) | two horn toots, ramp to 0, flip direction, ramp back |
//! | [`sound_horn`](Conductor::sound_horn) / [`sound_bell`](Conductor::sound_bell) | on, N s, off |
//! | [`speak`](Conductor::speak) | random safe phrase |
//! | [`speak_spiel`](Conductor::speak_spiel) | spiel phrases in order, 3 s apart |
//!
//! Every step blocks; nothing is cancellable once started. The first failing
//! step aborts the script and its error is returned unchanged. Steps already
//! taken are not undone (a failed "bell off" leaves the bell ringing).
//!
//! # Example
//!
//! ```rust
//! use rs_lionchief::{Conductor, TrainEngine};
//! use rs_lionchief::hal::{MockDelay, MockLink};
//!
//! let engine = TrainEngine::connect(MockLink::new()).unwrap();
//! let mut conductor = Conductor::new(engine, MockDelay::new());
//!
//! conductor.begin_train_service().unwrap();
//! assert_eq!(conductor.state().speed, 3);
//! assert_eq!(conductor.delay().delays, vec![1000, 2000]);
//!
//! // A ramp to the current speed is an error
//! assert!(conductor.adjust_speed_to(3).is_err());
//! ```

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::commands::{SoundChannel, SoundPitch, SpeechPhrase};
use crate::config::Config;
use crate::engine::TrainEngine;
use crate::error::TrainError;
use crate::ramp::SpeedRamp;
use crate::state::TrainState;
use crate::traits::{Delay, TrainConnector, TrainLink};

/// Length of a horn or bell signal inside a choreography.
pub const SIGNAL_SECS: u32 = 1;

/// Pause between the departure bell and pulling away.
pub const DEPARTURE_PAUSE_SECS: u32 = 2;

/// Speed a new service pulls away to.
pub const DEPARTURE_SPEED: u8 = 3;

/// Pause after each phrase of the spiel.
pub const SPIEL_PAUSE_SECS: u32 = 3;

/// Sequencing layer over one [`TrainEngine`].
///
/// # Type Parameters
///
/// - `L`: The transport ([`TrainLink`] trait)
/// - `D`: The delay provider ([`Delay`] trait)
pub struct Conductor<L: TrainLink, D: Delay> {
    engine: TrainEngine<L>,
    delay: D,
}

impl<L: TrainLink, D: Delay> Conductor<L, D> {
    /// Create a conductor for an already connected engine.
    pub fn new(engine: TrainEngine<L>, delay: D) -> Self {
        Self { engine, delay }
    }

    /// Connect to the configured train and reset it.
    pub fn connect<C>(connector: &mut C, config: &Config, delay: D) -> Result<Self, TrainError<L::Error>>
    where
        C: TrainConnector<Link = L>,
    {
        info!(device = %config.device.name, "connecting");
        let link = connector.connect(config).map_err(TrainError::Connect)?;
        let engine = TrainEngine::connect(link)?;
        Ok(Self::new(engine, delay))
    }

    /// Replace the engine with a freshly connected and reset one.
    ///
    /// The current engine is kept if connecting or resetting fails.
    pub fn reconnect<C>(&mut self, connector: &mut C, config: &Config) -> Result<(), TrainError<L::Error>>
    where
        C: TrainConnector<Link = L>,
    {
        info!(device = %config.device.name, "reconnecting");
        let link = connector.connect(config).map_err(TrainError::Connect)?;
        self.engine = TrainEngine::connect(link)?;
        Ok(())
    }

    /// Signal the train and close the link.
    pub fn disconnect(&mut self) -> Result<(), TrainError<L::Error>> {
        self.engine.disconnect()
    }

    // ------------------------------------------------------------------------
    // Ramp
    // ------------------------------------------------------------------------

    /// Ramp one speed step at a time to `target`, co-varying engine volume.
    ///
    /// At each step the engine volume `ceil(speed / 3)` is sent before the
    /// speed itself. The first failing write stops the ramp where it is;
    /// there is no rollback.
    ///
    /// # Errors
    ///
    /// - `target` above 31
    /// - `target` equal to the current speed ("train is already at speed N")
    /// - any failing volume or speed write
    #[instrument(skip(self), level = "debug")]
    pub fn adjust_speed_to(&mut self, target: u8) -> Result<(), TrainError<L::Error>> {
        let ramp = SpeedRamp::plan(self.engine.speed(), target)?;
        debug!(from = self.engine.speed(), target, steps = ramp.len(), "ramp");
        for step in ramp {
            self.engine.set_engine_volume(step.engine_volume)?;
            self.engine.set_speed(step.speed)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Choreographies
    // ------------------------------------------------------------------------

    /// Ring the departure bell and pull away to speed 3.
    ///
    /// Fails with "already at speed 3" if the train is running at 3.
    #[instrument(skip(self), level = "info")]
    pub fn begin_train_service(&mut self) -> Result<(), TrainError<L::Error>> {
        self.sound_bell(SIGNAL_SECS)?;
        self.delay.delay_secs(DEPARTURE_PAUSE_SECS);
        self.adjust_speed_to(DEPARTURE_SPEED)
    }

    /// Sound the horn and bring the train to a stop.
    ///
    /// Fails with "already at speed 0" if the train is stationary.
    #[instrument(skip(self), level = "info")]
    pub fn end_train_service(&mut self) -> Result<(), TrainError<L::Error>> {
        self.sound_horn(SIGNAL_SECS)?;
        self.delay.delay_secs(SIGNAL_SECS);
        self.adjust_speed_to(0)
    }

    /// Two horn toots, stop, change direction, return to the previous speed.
    ///
    /// Needs the train to be moving: the ramp down to zero fails with
    /// "already at speed 0" otherwise, after the horn has sounded.
    #[instrument(skip(self), level = "info")]
    pub fn reverse_train_service(&mut self) -> Result<(), TrainError<L::Error>> {
        for _ in 0..2 {
            self.sound_horn(SIGNAL_SECS)?;
            self.delay.delay_secs(SIGNAL_SECS);
        }
        let original_speed = self.engine.speed();
        self.adjust_speed_to(0)?;
        let reverse = !self.engine.reverse();
        self.engine.set_reverse(reverse)?;
        self.adjust_speed_to(original_speed)
    }

    /// Sound the horn for `secs` seconds.
    pub fn sound_horn(&mut self, secs: u32) -> Result<(), TrainError<L::Error>> {
        self.engine.set_horn(true)?;
        self.delay.delay_secs(secs);
        self.engine.set_horn(false)
    }

    /// Ring the bell for `secs` seconds.
    pub fn sound_bell(&mut self, secs: u32) -> Result<(), TrainError<L::Error>> {
        self.engine.set_bell(true)?;
        self.delay.delay_secs(secs);
        self.engine.set_bell(false)
    }

    // ------------------------------------------------------------------------
    // Speech
    // ------------------------------------------------------------------------

    /// Speak a phrase chosen uniformly from [`SpeechPhrase::SAFE`].
    #[cfg(feature = "std")]
    pub fn speak(&mut self) -> Result<SpeechPhrase, TrainError<L::Error>> {
        self.speak_with_rng(&mut rand::thread_rng())
    }

    /// Speak a phrase chosen uniformly from [`SpeechPhrase::SAFE`] using `rng`.
    ///
    /// Returns the phrase that was spoken.
    pub fn speak_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<SpeechPhrase, TrainError<L::Error>> {
        let phrase = SpeechPhrase::SAFE[rng.gen_range(0..SpeechPhrase::SAFE.len())];
        self.engine.speak_phrase(phrase)?;
        Ok(phrase)
    }

    /// Select and speak one phrase.
    pub fn speak_phrase(&mut self, phrase: SpeechPhrase) -> Result<(), TrainError<L::Error>> {
        self.engine.speak_phrase(phrase)
    }

    /// Speak the station spiel, pausing 3 s after each phrase.
    #[instrument(skip(self), level = "info")]
    pub fn speak_spiel(&mut self) -> Result<(), TrainError<L::Error>> {
        for phrase in SpeechPhrase::SPIEL {
            self.engine.speak_phrase(phrase)?;
            self.delay.delay_secs(SPIEL_PAUSE_SECS);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Lights, volume, pitch
    // ------------------------------------------------------------------------

    /// Turn the headlight on or off.
    pub fn lights(&mut self, enabled: bool) -> Result<(), TrainError<L::Error>> {
        self.engine.set_light(enabled)
    }

    /// Flip the headlight relative to the mirrored state.
    pub fn toggle_lights(&mut self) -> Result<(), TrainError<L::Error>> {
        let light = !self.engine.light();
        self.engine.set_light(light)
    }

    /// Set the overall volume (0 to 7).
    pub fn set_main_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        self.engine.set_main_volume(volume)
    }

    /// Set one channel's volume (0 to 13).
    pub fn set_channel_volume(
        &mut self,
        channel: SoundChannel,
        volume: u8,
    ) -> Result<(), TrainError<L::Error>> {
        self.engine.set_channel_volume(channel, volume)
    }

    /// Set one channel's pitch.
    pub fn set_channel_pitch(
        &mut self,
        channel: SoundChannel,
        pitch: SoundPitch,
    ) -> Result<(), TrainError<L::Error>> {
        self.engine.set_channel_pitch(channel, pitch)
    }

    /// Set the horn volume (0 to 13).
    pub fn set_horn_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        self.engine.set_horn_volume(volume)
    }

    /// Set the engine volume (0 to 13).
    pub fn set_engine_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        self.engine.set_engine_volume(volume)
    }

    /// Set the bell volume (0 to 13).
    pub fn set_bell_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        self.engine.set_bell_volume(volume)
    }

    /// Set the speech volume (0 to 13).
    pub fn set_speech_volume(&mut self, volume: u8) -> Result<(), TrainError<L::Error>> {
        self.engine.set_speech_volume(volume)
    }

    /// Set the horn pitch.
    pub fn set_horn_pitch(&mut self, pitch: SoundPitch) -> Result<(), TrainError<L::Error>> {
        self.engine.set_horn_pitch(pitch)
    }

    /// Set the engine pitch.
    pub fn set_engine_pitch(&mut self, pitch: SoundPitch) -> Result<(), TrainError<L::Error>> {
        self.engine.set_engine_pitch(pitch)
    }

    /// Set the bell pitch.
    pub fn set_bell_pitch(&mut self, pitch: SoundPitch) -> Result<(), TrainError<L::Error>> {
        self.engine.set_bell_pitch(pitch)
    }

    /// Set the speech pitch.
    pub fn set_speech_pitch(&mut self, pitch: SoundPitch) -> Result<(), TrainError<L::Error>> {
        self.engine.set_speech_pitch(pitch)
    }

    /// Drive the train back to the baseline state.
    pub fn reset_state(&mut self) -> Result<(), TrainError<L::Error>> {
        self.engine.reset_state()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Snapshot of the mirrored state.
    pub fn state(&self) -> TrainState {
        self.engine.state()
    }

    /// Borrow the engine.
    pub fn engine(&self) -> &TrainEngine<L> {
        &self.engine
    }

    /// Mutably borrow the engine.
    pub fn engine_mut(&mut self) -> &mut TrainEngine<L> {
        &mut self.engine
    }

    /// Borrow the delay provider.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Consume the conductor, returning its parts.
    pub fn into_parts(self) -> (TrainEngine<L>, D) {
        (self.engine, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockDelay, MockLink};

    fn conductor() -> Conductor<MockLink, MockDelay> {
        Conductor::new(TrainEngine::new(MockLink::new()), MockDelay::new())
    }

    #[test]
    fn ramp_pairs_volume_before_speed() {
        let mut c = conductor();
        c.adjust_speed_to(2).unwrap();
        assert_eq!(
            c.engine().link().payloads(),
            vec![vec![68, 4, 1], vec![69, 1], vec![68, 4, 1], vec![69, 2]]
        );
        assert_eq!(c.state().volume_engine, 1);
    }

    #[test]
    fn ramp_rejects_out_of_range_without_writing() {
        let mut c = conductor();
        assert!(c.adjust_speed_to(32).unwrap_err().is_validation());
        assert!(c.engine().link().frames.is_empty());
    }

    #[test]
    fn sound_horn_waits_requested_duration() {
        let mut c = conductor();
        c.sound_horn(4).unwrap();
        assert_eq!(c.engine().link().payloads(), vec![vec![72, 1], vec![72, 0]]);
        assert_eq!(c.delay().delays, vec![4000]);
    }

    #[test]
    fn toggle_lights_flips_mirror() {
        let mut c = conductor();
        assert!(c.state().light);
        c.toggle_lights().unwrap();
        assert!(!c.state().light);
        c.toggle_lights().unwrap();
        assert!(c.state().light);
    }

    #[test]
    fn into_parts_returns_engine_and_delay() {
        let mut c = conductor();
        c.sound_bell(0).unwrap();
        let (engine, delay) = c.into_parts();
        assert_eq!(engine.link().frames.len(), 2);
        assert_eq!(delay.delays, vec![0]);
    }
}
