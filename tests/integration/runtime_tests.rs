//! Integration tests for the poll loop over a real localhost UDP socket.
//!
//! The runtime binds an ephemeral port; a client socket plays the role of
//! the local-home controller.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use washer::app::commands::ButtonEvent;
use washer::app::ports::StateReport;
use washer::app::service::WasherService;
use washer::app::shared::SharedWasher;
use washer::config::WasherConfig;
use washer::net::channel::{CommandChannel, PollOutcome};
use washer::net::report::{ReportOutcome, StateReporter};
use washer::runtime::{CycleReport, Runtime};

use super::mock_hw::{
    MockDisplay, MockReporter, MockTimer, RecordingSink, ScriptedButtons, capture_logs, logged,
};

type TestRuntime = Runtime<MockDisplay, MockTimer, RecordingSink, ScriptedButtons, MockReporter>;

struct Harness {
    runtime: TestRuntime,
    client: UdpSocket,
    target: SocketAddr,
}

fn harness(reporter: Option<MockReporter>, buttons: ScriptedButtons) -> Harness {
    let config = WasherConfig {
        udp_port: 0,
        idle_sleep_ms: 1,
        ..WasherConfig::default()
    };
    let channel = CommandChannel::bind(&config).expect("bind ephemeral port");
    let target = SocketAddr::from((Ipv4Addr::LOCALHOST, channel.local_port()));

    let mut service = WasherService::new(
        MockDisplay::default(),
        MockTimer::default(),
        RecordingSink::default(),
    );
    service.boot();

    let client = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    client
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();

    Harness {
        runtime: Runtime::new(
            SharedWasher::new(service),
            channel,
            StateReporter::new(reporter),
            buttons,
        ),
        client,
        target,
    }
}

impl Harness {
    fn send(&self, payload: &[u8]) {
        self.client.send_to(payload, self.target).unwrap();
    }

    /// Cycle until the datagram just sent has been consumed.
    fn cycle_until_received(&mut self) -> CycleReport {
        for _ in 0..500 {
            let report = self.runtime.cycle();
            if report.poll != PollOutcome::Idle {
                return report;
            }
        }
        panic!("datagram never arrived");
    }

    fn state(&self) -> StateReport {
        self.runtime.washer().with(|svc| svc.report())
    }

    fn sent_reports(&self) -> Vec<StateReport> {
        self.runtime
            .reporter()
            .port()
            .map(|r| r.sent.clone())
            .unwrap_or_default()
    }
}

const OFF: StateReport = StateReport {
    on: false,
    is_running: false,
    is_paused: false,
};

// ── Discovery ─────────────────────────────────────────────────

#[test]
fn discovery_probe_gets_device_id_reply() {
    let mut h = harness(None, ScriptedButtons::default());
    h.send(b"HelloLocalHomeSDK");
    let report = h.cycle_until_received();
    assert!(matches!(report.poll, PollOutcome::Discovered(_)));

    let mut buf = [0u8; 64];
    let (n, from) = h.client.recv_from(&mut buf).expect("discovery reply");
    assert_eq!(&buf[..n], b"deviceid123");
    assert_eq!(from.port(), h.target.port());
    assert_eq!(h.state(), OFF, "discovery never changes state");
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn on_byte_powers_up_and_is_reported_once() {
    let mut h = harness(Some(MockReporter::default()), ScriptedButtons::default());

    let first = h.runtime.cycle();
    assert!(first.changed, "initial state is reported on the first cycle");
    assert_eq!(first.report, ReportOutcome::Sent);

    h.send(&[0x01]);
    let report = h.cycle_until_received();
    assert!(report.changed);
    assert_eq!(report.report, ReportOutcome::Sent);
    assert!(h.state().on);

    let quiet = h.runtime.cycle();
    assert!(!quiet.changed);
    assert_eq!(quiet.report, ReportOutcome::Skipped);

    let on = StateReport { on: true, ..OFF };
    assert_eq!(h.sent_reports(), vec![OFF, on]);
}

#[test]
fn unmapped_byte_changes_nothing_and_gets_no_reply() {
    capture_logs();
    let mut h = harness(Some(MockReporter::default()), ScriptedButtons::default());
    let _ = h.runtime.cycle();

    h.send(&[0x09]);
    let report = h.cycle_until_received();
    assert_eq!(report.poll, PollOutcome::Ignored);
    assert!(!report.changed);
    assert_eq!(h.state(), OFF);
    assert!(logged("WARN unrecognized command: 9"));

    let mut buf = [0u8; 8];
    assert!(h.client.recv_from(&mut buf).is_err(), "no reply expected");
    assert_eq!(h.sent_reports(), vec![OFF]);
}

#[test]
fn start_while_off_is_absorbed() {
    let mut h = harness(None, ScriptedButtons::default());
    let _ = h.runtime.cycle();
    h.send(&[0x03]);
    let report = h.cycle_until_received();
    assert!(matches!(report.poll, PollOutcome::Dispatched(_)));
    assert!(!report.changed);
    assert_eq!(h.state(), OFF);
}

// ── Buttons + reporting ───────────────────────────────────────

#[test]
fn presses_in_one_cycle_coalesce_into_one_report() {
    let mut buttons = ScriptedButtons::default();
    buttons.press(ButtonEvent::PowerToggle);
    buttons.press(ButtonEvent::StartStopToggle);
    let mut h = harness(Some(MockReporter::default()), buttons);

    let report = h.runtime.cycle();
    assert_eq!(report.presses, 2);
    assert!(report.changed);

    let running = StateReport {
        on: true,
        is_running: true,
        is_paused: false,
    };
    assert_eq!(h.sent_reports(), vec![running]);
    assert_eq!(h.runtime.cycles(), 1);
}

#[test]
fn failed_report_is_not_retried() {
    let reporter = MockReporter {
        fail: true,
        ..MockReporter::default()
    };
    let mut h = harness(Some(reporter), ScriptedButtons::default());

    let first = h.runtime.cycle();
    assert!(matches!(first.report, ReportOutcome::Failed(_)));
    let second = h.runtime.cycle();
    assert_eq!(second.report, ReportOutcome::Skipped);
    assert_eq!(h.sent_reports().len(), 1);
}
