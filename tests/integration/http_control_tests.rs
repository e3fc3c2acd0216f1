//! Integration tests for the HTTP control endpoint.
//!
//! The server binds an ephemeral port and shares the washer with a poll
//! loop; a blocking `reqwest` client plays the local-home app.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use washer::app::ports::StateReport;
use washer::app::service::WasherService;
use washer::app::shared::SharedWasher;
use washer::config::WasherConfig;
use washer::net::channel::CommandChannel;
use washer::net::http_control::HttpControl;
use washer::net::report::{ReportOutcome, StateReporter};
use washer::runtime::Runtime;

use super::mock_hw::{MockDisplay, MockReporter, MockTimer, RecordingSink, ScriptedButtons};

type Washer = SharedWasher<WasherService<MockDisplay, MockTimer, RecordingSink>>;

struct Device {
    washer: Washer,
    url: String,
    client: reqwest::blocking::Client,
    _control: HttpControl,
}

fn device() -> Device {
    let mut service = WasherService::new(
        MockDisplay::default(),
        MockTimer::default(),
        RecordingSink::default(),
    );
    service.boot();
    let washer = SharedWasher::new(service);
    let control = HttpControl::spawn(0, washer.clone()).expect("bind ephemeral port");
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, control.local_addr().port()));
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    Device {
        washer,
        url: format!("http://{addr}/"),
        client,
        _control: control,
    }
}

impl Device {
    /// POST `body` as the local-home app does; returns status and reply text.
    fn post(&self, body: &str) -> (u16, String) {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_owned())
            .send()
            .expect("control endpoint reachable");
        let status = response.status().as_u16();
        (status, response.text().unwrap())
    }

    fn state(&self) -> StateReport {
        self.washer.with(|svc| svc.report())
    }
}

const OFF: StateReport = StateReport {
    on: false,
    is_running: false,
    is_paused: false,
};

#[test]
fn on_field_powers_up() {
    let d = device();
    let _ = d.washer.with(|svc| svc.take_changed());
    assert_eq!(d.post(r#"{"on":true}"#), (200, "OK".to_owned()));
    assert_eq!(d.state(), StateReport { on: true, ..OFF });
    assert!(d.washer.with(|svc| svc.take_changed()));
}

#[test]
fn app_command_sequence_walks_the_cycle() {
    let d = device();
    d.post(r#"{"on":true}"#);
    d.post(r#"{"isRunning":true}"#);
    d.post(r#"{"isPaused":true}"#);
    assert_eq!(
        d.state(),
        StateReport {
            on: true,
            is_running: true,
            is_paused: true,
        }
    );
    assert!(d.washer.with(|svc| svc.timer().armed), "start over HTTP arms the tick");

    d.post(r#"{"isPaused":false}"#);
    assert!(!d.state().is_paused);
    d.post(r#"{"on":false}"#);
    assert_eq!(d.state(), OFF);
}

#[test]
fn guarded_fields_are_absorbed() {
    let d = device();
    let _ = d.washer.with(|svc| svc.take_changed());

    assert_eq!(d.post(r#"{"isRunning":true}"#).0, 200);
    assert_eq!(d.post(r#"{"isPaused":true}"#).0, 200);
    assert_eq!(d.state(), OFF);
    assert!(!d.washer.with(|svc| svc.take_changed()));
}

#[test]
fn malformed_body_is_rejected_without_change() {
    let d = device();
    let _ = d.washer.with(|svc| svc.take_changed());

    let (status, _) = d.post(r#"{"on":"please"}"#);
    assert_eq!(status, 400);
    assert_eq!(d.state(), OFF);
    assert!(!d.washer.with(|svc| svc.take_changed()));
}

#[test]
fn http_change_is_reported_by_the_next_cycle() {
    let d = device();
    let config = WasherConfig {
        udp_port: 0,
        idle_sleep_ms: 1,
        ..WasherConfig::default()
    };
    let mut runtime = Runtime::new(
        d.washer.clone(),
        CommandChannel::bind(&config).unwrap(),
        StateReporter::new(Some(MockReporter::default())),
        ScriptedButtons::default(),
    );
    let _ = runtime.cycle();

    d.post(r#"{"on":true,"isRunning":true}"#);
    let cycle = runtime.cycle();
    assert!(cycle.changed);
    assert_eq!(cycle.report, ReportOutcome::Sent);

    let running = StateReport {
        on: true,
        is_running: true,
        is_paused: false,
    };
    let sent = runtime.reporter().port().map(|r| r.sent.clone()).unwrap();
    assert_eq!(sent, vec![OFF, running]);
}
