//! Integration tests for the command layer

use rs_lionchief::{
    hal::{MockLink, MockLinkError},
    Command, CommandType, SoundChannel, SoundPitch, SpeechPhrase, TrainEngine, TrainError,
    TrainState, ValidationError,
};

fn connected() -> TrainEngine<MockLink> {
    TrainEngine::connect(MockLink::new()).unwrap()
}

/// Engine with the connect-time reset frames cleared.
fn quiet() -> TrainEngine<MockLink> {
    let mut engine = connected();
    engine.link_mut().frames.clear();
    engine
}

// ============================================================================
// Connection Tests
// ============================================================================

#[test]
fn connect_resets_to_baseline() {
    let engine = connected();
    assert_eq!(engine.state(), TrainState::baseline());
    assert_eq!(engine.link().frames.len(), 8);
    assert_eq!(engine.link().frames[0], vec![0x00, 69, 0, 69]);
}

#[test]
fn connect_fails_when_reset_fails() {
    let mut link = MockLink::new();
    link.fail_write(2);
    let result = TrainEngine::connect(link);
    assert_eq!(
        result.err(),
        Some(TrainError::Link(MockLinkError::WriteFailed))
    );
}

#[test]
fn new_engine_assumes_connection_defaults() {
    let engine = TrainEngine::new(MockLink::new());
    let state = engine.state();
    assert_eq!(state.volume, 1);
    assert_eq!(state.volume_horn, 1);
    assert_eq!(state.volume_engine, 0);
    assert_eq!(state.volume_bell, 1);
    assert_eq!(state.volume_speech, 1);
    assert!(state.light);
    assert!(engine.link().frames.is_empty());
}

// ============================================================================
// Volume Boundary Tests
// ============================================================================

#[test]
fn main_volume_boundaries() {
    let mut engine = quiet();
    engine.set_main_volume(0).unwrap();
    engine.set_main_volume(7).unwrap();
    assert_eq!(
        engine.set_main_volume(8).unwrap_err().to_string(),
        "invalid volume 8, must be between '0' and '7' (inclusive)"
    );
    assert_eq!(engine.link().payloads(), vec![vec![76, 0], vec![76, 7]]);
    assert_eq!(engine.state().volume, 7);
}

#[test]
fn channel_volume_boundaries_for_every_channel() {
    let mut engine = quiet();
    for channel in SoundChannel::ALL {
        engine.set_channel_volume(channel, 13).unwrap();
        assert_eq!(engine.state().channel_volume(channel), 13);

        let err = engine.set_channel_volume(channel, 14).unwrap_err();
        assert_eq!(
            err,
            TrainError::Invalid(ValidationError::VolumeOutOfRange {
                volume: 14,
                min: 0,
                max: 13
            })
        );
        assert_eq!(engine.state().channel_volume(channel), 13);
    }
    assert_eq!(engine.link().frames.len(), 4);
}

#[test]
fn channel_volume_wire_format() {
    let mut engine = quiet();
    engine.set_speech_volume(5).unwrap();
    assert_eq!(engine.link().frames[0], vec![0x00, 0x44, 0x03, 0x05, 0x4c]);
}

// ============================================================================
// Pitch Tests
// ============================================================================

#[test]
fn pitch_accepts_only_documented_codes() {
    for raw in [254i32, 255, 0, 1, 2] {
        assert!(SoundPitch::try_from(raw).is_ok(), "{raw} should be valid");
    }
    for raw in [-1i32, 3, 253, 256, 14] {
        assert_eq!(
            SoundPitch::try_from(raw),
            Err(ValidationError::InvalidPitch(raw))
        );
    }
}

#[test]
fn lowest_horn_pitch_on_the_wire() {
    let mut engine = quiet();
    let pitch = SoundPitch::try_from(254).unwrap();
    engine.set_horn_pitch(pitch).unwrap();
    assert_eq!(engine.link().payloads(), vec![vec![68, 1, 14, 254]]);
    // Checksum wraps: 68 + 1 + 14 + 254 = 337
    assert_eq!(engine.link().frames[0].last(), Some(&81));
}

#[test]
fn engine_pitch_normal() {
    let mut engine = quiet();
    engine.set_engine_pitch(SoundPitch::Normal).unwrap();
    assert_eq!(engine.link().payloads(), vec![vec![68, 4, 14, 0]]);
}

// ============================================================================
// Speech Tests
// ============================================================================

#[test]
fn speak_phrase_selects_then_speaks() {
    let mut engine = quiet();
    engine
        .speak_phrase(SpeechPhrase::PennsylvaniaFlyerIsReadyToRoll)
        .unwrap();
    assert_eq!(engine.link().payloads(), vec![vec![68, 3, 14, 4], vec![77, 0]]);
}

#[test]
fn invalid_phrase_codes_rejected() {
    assert_eq!(
        SpeechPhrase::try_from(0),
        Err(ValidationError::InvalidPhrase(0))
    );
    assert_eq!(
        SpeechPhrase::try_from(8),
        Err(ValidationError::InvalidPhrase(8))
    );
    assert_eq!(
        SpeechPhrase::try_from(7),
        Ok(SpeechPhrase::WaterTankIsLow)
    );
}

// ============================================================================
// Soft Timeout Tests
// ============================================================================

#[test]
fn bell_on_times_out_without_retry() {
    let mut engine = quiet();
    engine.link_mut().time_out_write(0);
    engine.set_bell(true).unwrap();
    assert_eq!(engine.link().payloads(), vec![vec![71, 1]]);
}

#[test]
fn timed_out_volume_is_recorded() {
    let mut engine = quiet();
    engine.link_mut().time_out_write(0);
    engine.set_main_volume(3).unwrap();
    assert_eq!(engine.state().volume, 3);
}

#[test]
fn link_failure_is_reported_with_cause() {
    let mut engine = quiet();
    engine.link_mut().fail_write(0);
    let err = engine.set_horn(true).unwrap_err();
    assert_eq!(err, TrainError::Link(MockLinkError::WriteFailed));
    assert!(!err.is_validation());
}

#[test]
fn short_write_message() {
    let mut engine = quiet();
    engine.link_mut().short_write(0, 2);
    let err = engine.set_reverse(true).unwrap_err();
    assert_eq!(
        err.to_string(),
        "writing command only wrote '2' bytes of '4'"
    );
    assert!(!engine.reverse());
}

// ============================================================================
// Mirror Tests
// ============================================================================

#[test]
fn reverse_and_light_mirror_successful_writes() {
    let mut engine = quiet();
    engine.set_reverse(true).unwrap();
    engine.set_light(false).unwrap();
    assert!(engine.reverse());
    assert!(!engine.light());
    assert_eq!(engine.link().payloads(), vec![vec![70, 1], vec![81, 0]]);
}

#[test]
fn speed_is_not_range_checked_by_the_setter() {
    let mut engine = quiet();
    engine.set_speed(40).unwrap();
    assert_eq!(engine.speed(), 40);
    assert_eq!(engine.link().payloads(), vec![vec![69, 40]]);
}

#[test]
fn custom_command_length_limits() {
    let mut engine = quiet();
    engine.send_custom_command(&[0x45; 16]).unwrap();
    assert_eq!(engine.link().frames[0].len(), 18);

    let err = engine.send_custom_command(&[0x45; 17]).unwrap_err();
    assert_eq!(
        err,
        TrainError::Invalid(ValidationError::PayloadLength { len: 17, max: 16 })
    );
    assert_eq!(engine.link().frames.len(), 1);
    assert_eq!(engine.state(), TrainState::baseline());
}

#[test]
fn custom_command_matches_typed_command() {
    let mut engine = quiet();
    let payload = Command::Horn(true).payload();
    assert_eq!(
        CommandType::try_from(payload[0]),
        Ok(CommandType::Horn)
    );
    engine.send_custom_command(&payload).unwrap();
    engine.set_horn(true).unwrap();
    let frames = &engine.link().frames;
    assert_eq!(frames[0], frames[1]);
}

// ============================================================================
// Disconnect Tests
// ============================================================================

#[test]
fn disconnect_then_writes_fail() {
    let mut engine = quiet();
    engine.disconnect().unwrap();
    assert_eq!(engine.link().frames[0], vec![0x00, 75, 0, 0, 75]);

    let err = engine.set_bell(true).unwrap_err();
    assert_eq!(err, TrainError::Link(MockLinkError::NotConnected));
}
