//! Fuzz target: `CommandPacket::decode`
//!
//! The first byte picks a discovery-token length, the rest is split into a
//! token and a datagram.  Decoding must never panic, only an exact token
//! match may be a discovery probe, and single bytes must agree with the
//! command table.
//!
//! cargo fuzz run fuzz_packet_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use washer::app::commands::WasherCommand;
use washer::net::packet::{CommandPacket, RECV_BUF_LEN};

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (token, payload) = rest.split_at(split);
    // The socket truncates anything longer.
    let payload = &payload[..payload.len().min(RECV_BUF_LEN)];

    match CommandPacket::decode(payload, token) {
        CommandPacket::Discovery => assert_eq!(payload, token),
        CommandPacket::Command(cmd) => {
            assert_eq!(payload, [cmd.code()]);
            assert_eq!(WasherCommand::from_code(cmd.code()), Some(cmd));
        }
        CommandPacket::UnknownCommand(code) => {
            assert_eq!(payload, [code]);
            assert!(WasherCommand::from_code(code).is_none());
        }
        CommandPacket::Unrecognized => assert!(payload != token && payload.len() != 1),
    }
});
