//! Fuzz target: command bytes and ticks against `ApplianceState`
//!
//! Each input byte is either a command code (0..=5), a tick (6) or an
//! unmapped byte.  After every step the flag invariants must hold and a
//! rejected command must leave the state untouched.
//!
//! cargo fuzz run fuzz_command_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use washer::app::animation;
use washer::app::commands::WasherCommand;
use washer::app::state::ApplianceState;

const TICK: u8 = 6;

fuzz_target!(|data: &[u8]| {
    let mut state = ApplianceState::new();
    for &byte in data {
        let _ = state.take_changed();
        let before = state.clone();

        let accepted = match WasherCommand::from_code(byte) {
            Some(WasherCommand::Off) => state.turn_off().is_some(),
            Some(WasherCommand::On) => state.turn_on().is_some(),
            Some(WasherCommand::Stop) => state.stop().is_some(),
            Some(WasherCommand::Start) => state.start().is_some(),
            Some(WasherCommand::Resume) => state.resume().is_some(),
            Some(WasherCommand::Pause) => state.pause().is_some(),
            None if byte == TICK => {
                let _ = animation::tick(&mut state);
                assert!(!state.is_changed(), "ticks never dirty the state");
                continue;
            }
            None => false,
        };

        if !accepted {
            assert_eq!(state, before);
        }
        assert_eq!(state.take_changed(), accepted);
        assert!(!state.running() || state.powered());
        assert!(!state.paused() || state.running());
    }
});
