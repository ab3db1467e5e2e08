//! Command identifiers, sound channels, pitches and speech phrases.
//!
//! This module defines the vocabulary of the train's one-way command
//! protocol. Every physical action is a [`Command`], which knows how to lay
//! itself out as a payload; the [`codec`](crate::codec) module adds the
//! reserved leading byte and checksum.
//!
//! # Payload Shapes
//!
//! | Command | Payload |
//! |---------|---------|
//! | Channel volume | `[68, channel, volume]` |
//! | Channel pitch / phrase select | `[68, channel, 14, code]` |
//! | Speed | `[69, speed]` |
//! | Reverse / Bell / Horn / Lights | `[id, 0 or 1]` |
//! | Disconnect | `[75, 0, 0]` |
//! | Main volume | `[76, volume]` |
//! | Speak | `[77, 0]` |
//!
//! # Example
//!
//! ```rust
//! use rs_lionchief::{Command, SoundChannel, SoundPitch};
//!
//! let cmd = Command::ChannelVolume { channel: SoundChannel::Engine, volume: 3 };
//! assert_eq!(cmd.payload().as_slice(), &[68, 4, 3]);
//!
//! let cmd = Command::ChannelPitch { channel: SoundChannel::Horn, pitch: SoundPitch::Lowest };
//! assert_eq!(cmd.payload().as_slice(), &[68, 1, 14, 254]);
//! ```

use heapless::Vec;

use crate::error::ValidationError;

/// Longest payload produced by a typed [`Command`].
pub const MAX_COMMAND_LEN: usize = 4;

/// Third payload byte marking a channel pitch (or phrase) selection.
pub const PITCH_SUBCODE: u8 = 14;

/// Highest speed step understood by the train.
pub const MAX_SPEED: u8 = 31;

/// Highest main volume level.
pub const MAX_MAIN_VOLUME: u8 = 7;

/// Highest per-channel volume level.
pub const MAX_CHANNEL_VOLUME: u8 = 13;

// ============================================================================
// Command Identifiers
// ============================================================================

/// One-byte command identifier, the first byte of every payload.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CommandType {
    /// Per-channel running volume or pitch.
    SoundRunning = 68,
    /// Throttle speed step.
    Speed = 69,
    /// Direction of travel.
    Reverse = 70,
    /// Bell on/off.
    Bell = 71,
    /// Horn on/off.
    Horn = 72,
    /// Disconnect signal.
    Disconnect = 75,
    /// Overall volume.
    SoundMain = 76,
    /// Speak the selected phrase.
    Speak = 77,
    /// Headlight on/off.
    Lights = 81,
}

impl CommandType {
    /// Raw identifier byte.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CommandType {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            68 => Ok(CommandType::SoundRunning),
            69 => Ok(CommandType::Speed),
            70 => Ok(CommandType::Reverse),
            71 => Ok(CommandType::Bell),
            72 => Ok(CommandType::Horn),
            75 => Ok(CommandType::Disconnect),
            76 => Ok(CommandType::SoundMain),
            77 => Ok(CommandType::Speak),
            81 => Ok(CommandType::Lights),
            other => Err(ValidationError::InvalidCommandType(other)),
        }
    }
}

// ============================================================================
// Sound Channels
// ============================================================================

/// One of the four independently levelled audio sources.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SoundChannel {
    /// Horn / whistle.
    Horn = 1,
    /// Bell.
    Bell = 2,
    /// Conductor speech.
    Speech = 3,
    /// Engine running sound (chuff).
    Engine = 4,
}

impl SoundChannel {
    /// All channels in reset order.
    pub const ALL: [SoundChannel; 4] = [
        SoundChannel::Horn,
        SoundChannel::Engine,
        SoundChannel::Bell,
        SoundChannel::Speech,
    ];

    /// Raw channel byte.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Lowercase channel name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SoundChannel::Horn => "horn",
            SoundChannel::Bell => "bell",
            SoundChannel::Speech => "speech",
            SoundChannel::Engine => "engine",
        }
    }
}

impl TryFrom<u8> for SoundChannel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SoundChannel::Horn),
            2 => Ok(SoundChannel::Bell),
            3 => Ok(SoundChannel::Speech),
            4 => Ok(SoundChannel::Engine),
            other => Err(ValidationError::InvalidChannel(other)),
        }
    }
}

// ============================================================================
// Pitch
// ============================================================================

/// Channel pitch adjustment.
///
/// The wire codes are signed steps around `Normal` stored as an unsigned
/// byte, so `Lowest` (-2) travels as 254 and `Low` (-1) as 255.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SoundPitch {
    /// Two steps down.
    Lowest = 254,
    /// One step down.
    Low = 255,
    /// Factory pitch.
    #[default]
    Normal = 0,
    /// One step up.
    High = 1,
    /// Two steps up.
    Highest = 2,
}

impl SoundPitch {
    /// Every accepted pitch, lowest first.
    pub const ALL: [SoundPitch; 5] = [
        SoundPitch::Lowest,
        SoundPitch::Low,
        SoundPitch::Normal,
        SoundPitch::High,
        SoundPitch::Highest,
    ];

    /// Raw pitch byte.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i32> for SoundPitch {
    type Error = ValidationError;

    /// Accepts exactly the five wire codes `254, 255, 0, 1, 2`.
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            254 => Ok(SoundPitch::Lowest),
            255 => Ok(SoundPitch::Low),
            0 => Ok(SoundPitch::Normal),
            1 => Ok(SoundPitch::High),
            2 => Ok(SoundPitch::Highest),
            other => Err(ValidationError::InvalidPitch(other)),
        }
    }
}

// ============================================================================
// Speech
// ============================================================================

/// Pre-recorded conductor announcements.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpeechPhrase {
    /// "Hey there, what are you waiting for?"
    HeyThereWhatAreYouWaitingFor = 1,
    /// "Call me the Pennsylvania Flyer."
    CallMePennsylvaniaFlyer = 2,
    /// "Fastest freight you can hire."
    FastestFreightYouCanHire = 3,
    /// "Pennsylvania Flyer is ready to roll."
    PennsylvaniaFlyerIsReadyToRoll = 4,
    /// "I make steam from water and fire."
    IMakeSteamFromWaterAndFire = 5,
    /// "I'm feeling a little squeaky, give me a little oil."
    ImFeelingALittleSqueakyGiveMeALittleOil = 6,
    /// "Water tank is low."
    WaterTankIsLow = 7,
}

impl SpeechPhrase {
    /// Phrases suitable for unprompted random announcements.
    pub const SAFE: [SpeechPhrase; 6] = [
        SpeechPhrase::HeyThereWhatAreYouWaitingFor,
        SpeechPhrase::CallMePennsylvaniaFlyer,
        SpeechPhrase::FastestFreightYouCanHire,
        SpeechPhrase::PennsylvaniaFlyerIsReadyToRoll,
        SpeechPhrase::IMakeSteamFromWaterAndFire,
        SpeechPhrase::ImFeelingALittleSqueakyGiveMeALittleOil,
    ];

    /// The station spiel, spoken in order.
    pub const SPIEL: [SpeechPhrase; 3] = [
        SpeechPhrase::PennsylvaniaFlyerIsReadyToRoll,
        SpeechPhrase::IMakeSteamFromWaterAndFire,
        SpeechPhrase::ImFeelingALittleSqueakyGiveMeALittleOil,
    ];

    /// Raw phrase byte.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i32> for SpeechPhrase {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SpeechPhrase::HeyThereWhatAreYouWaitingFor),
            2 => Ok(SpeechPhrase::CallMePennsylvaniaFlyer),
            3 => Ok(SpeechPhrase::FastestFreightYouCanHire),
            4 => Ok(SpeechPhrase::PennsylvaniaFlyerIsReadyToRoll),
            5 => Ok(SpeechPhrase::IMakeSteamFromWaterAndFire),
            6 => Ok(SpeechPhrase::ImFeelingALittleSqueakyGiveMeALittleOil),
            7 => Ok(SpeechPhrase::WaterTankIsLow),
            other => Err(ValidationError::InvalidPhrase(other)),
        }
    }
}

// ============================================================================
// Typed Commands
// ============================================================================

/// A single physical command with its arguments.
///
/// Construction performs no range checks; [`TrainEngine`] validates before
/// building a command.
///
/// [`TrainEngine`]: crate::TrainEngine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Set the running volume of one channel.
    ChannelVolume {
        /// Target channel.
        channel: SoundChannel,
        /// Volume level.
        volume: u8,
    },
    /// Set the pitch of one channel.
    ChannelPitch {
        /// Target channel.
        channel: SoundChannel,
        /// Pitch step.
        pitch: SoundPitch,
    },
    /// Select the phrase used by the next [`Command::Speak`].
    SelectPhrase(SpeechPhrase),
    /// Set the throttle speed step.
    Speed(u8),
    /// Set reverse (true) or forward (false).
    Reverse(bool),
    /// Bell on/off.
    Bell(bool),
    /// Horn on/off.
    Horn(bool),
    /// Disconnect signal.
    Disconnect,
    /// Set the overall volume.
    MainVolume(u8),
    /// Speak the selected phrase.
    Speak,
    /// Headlight on/off.
    Lights(bool),
}

impl Command {
    /// The identifier byte this command is sent under.
    pub const fn command_type(&self) -> CommandType {
        match self {
            Command::ChannelVolume { .. }
            | Command::ChannelPitch { .. }
            | Command::SelectPhrase(_) => CommandType::SoundRunning,
            Command::Speed(_) => CommandType::Speed,
            Command::Reverse(_) => CommandType::Reverse,
            Command::Bell(_) => CommandType::Bell,
            Command::Horn(_) => CommandType::Horn,
            Command::Disconnect => CommandType::Disconnect,
            Command::MainVolume(_) => CommandType::SoundMain,
            Command::Speak => CommandType::Speak,
            Command::Lights(_) => CommandType::Lights,
        }
    }

    /// Lay the command out as payload bytes (without frame header or checksum).
    pub fn payload(&self) -> Vec<u8, MAX_COMMAND_LEN> {
        let id = self.command_type().code();
        let (bytes, len): ([u8; MAX_COMMAND_LEN], usize) = match *self {
            Command::ChannelVolume { channel, volume } => ([id, channel.code(), volume, 0], 3),
            Command::ChannelPitch { channel, pitch } => {
                ([id, channel.code(), PITCH_SUBCODE, pitch.code()], 4)
            }
            Command::SelectPhrase(phrase) => (
                [id, SoundChannel::Speech.code(), PITCH_SUBCODE, phrase.code()],
                4,
            ),
            Command::Speed(speed) => ([id, speed, 0, 0], 2),
            Command::Reverse(on)
            | Command::Bell(on)
            | Command::Horn(on)
            | Command::Lights(on) => ([id, u8::from(on), 0, 0], 2),
            Command::Disconnect => ([id, 0, 0, 0], 3),
            Command::MainVolume(volume) => ([id, volume, 0, 0], 2),
            Command::Speak => ([id, 0, 0, 0], 2),
        };
        let mut payload = Vec::new();
        // len never exceeds MAX_COMMAND_LEN
        let _ = payload.extend_from_slice(&bytes[..len]);
        payload
    }
}
