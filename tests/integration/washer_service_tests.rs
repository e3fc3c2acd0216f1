//! Integration tests for the WasherService → display / timer / sink pipeline.
//!
//! Drive the service through commands, button presses and ticks exactly as
//! the runtime does, with mock adapters on every port.

use washer::app::animation::Frame;
use washer::app::commands::{ButtonEvent, WasherCommand};
use washer::app::events::AppEvent;
use washer::app::ports::CommandHandler;
use washer::app::screen::{
    POWER_INDICATOR, POWER_OFF, POWER_ON, RUNNING_INDICATOR, RUNNING_OFF, RUNNING_ON, SWEEP,
    WATER,
};
use washer::app::service::WasherService;
use washer::app::state::Transition;

use super::mock_hw::{DrawCall, MockDisplay, MockTimer, RecordingSink};

type Service = WasherService<MockDisplay, MockTimer, RecordingSink>;

fn booted() -> Service {
    let mut svc = WasherService::new(
        MockDisplay::default(),
        MockTimer::default(),
        RecordingSink::default(),
    );
    svc.boot();
    svc
}

fn transitions(svc: &Service) -> Vec<Transition> {
    svc.sink()
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Transition { transition, .. } => Some(*transition),
            AppEvent::Started(_) => None,
        })
        .collect()
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_draws_powered_off_face_and_reports_initial_state() {
    let mut svc = booted();
    let display = svc.display();
    assert!(matches!(display.calls.first(), Some(DrawCall::Clear(_))));
    assert_eq!(
        display.rect_colour_at(POWER_INDICATOR.x, POWER_INDICATOR.y),
        Some(POWER_OFF)
    );
    assert!(matches!(svc.sink().events[0], AppEvent::Started(r) if !r.on));
    assert!(svc.take_changed(), "initial state is reported once");
    assert!(!svc.take_changed());
}

// ── Full scenario ─────────────────────────────────────────────

#[test]
fn on_start_pause_resume_off_scenario() {
    let mut svc = booted();
    let _ = svc.take_changed();
    let mut observed = Vec::new();

    svc.handle_command(WasherCommand::On);
    observed.push(svc.take_changed());
    svc.handle_command(WasherCommand::Start);
    observed.push(svc.take_changed());
    assert!(svc.timer().armed);

    for _ in 0..5 {
        svc.tick();
        observed.push(svc.take_changed());
    }
    assert_eq!(svc.state().phase(), 5 * 32);
    assert_eq!(svc.state().blink_phase(), 5 * 32);

    svc.handle_command(WasherCommand::Pause);
    observed.push(svc.take_changed());
    for _ in 0..3 {
        svc.tick();
    }
    assert_eq!(svc.state().phase(), 5 * 32, "phase frozen while paused");
    assert_eq!(svc.state().blink_phase(), 3 * 32);

    svc.handle_command(WasherCommand::Resume);
    observed.push(svc.take_changed());
    assert_eq!(svc.state().blink_phase(), 0, "resume resets the blink cursor");
    assert_eq!(svc.state().phase(), 5 * 32);

    svc.handle_command(WasherCommand::Off);
    observed.push(svc.take_changed());

    assert_eq!(
        observed,
        vec![true, true, false, false, false, false, false, true, true, true]
    );
    assert_eq!(
        transitions(&svc),
        vec![
            Transition::PoweredOn,
            Transition::Started,
            Transition::Paused,
            Transition::Resumed,
            Transition::PoweredOff { stopped: true },
        ]
    );

    let s = svc.state();
    assert!(!s.powered() && !s.running() && !s.paused());
    assert_eq!((s.phase(), s.blink_phase()), (0, 0));
    assert!(!svc.timer().armed, "power off while running cancels the tick");
    assert_eq!(
        svc.display().rect_colour_at(POWER_INDICATOR.x, POWER_INDICATOR.y),
        Some(POWER_OFF)
    );
}

// ── No-op commands ────────────────────────────────────────────

#[test]
fn commands_without_preconditions_are_silent() {
    let mut svc = booted();
    let _ = svc.take_changed();
    let drawn = svc.display().calls.len();

    for cmd in [
        WasherCommand::Off,
        WasherCommand::Start,
        WasherCommand::Stop,
        WasherCommand::Pause,
        WasherCommand::Resume,
    ] {
        svc.handle_command(cmd);
    }

    assert!(!svc.take_changed());
    assert!(transitions(&svc).is_empty());
    assert_eq!(svc.display().calls.len(), drawn, "no redraw for a no-op");
    assert_eq!(svc.timer().arms, 0);
}

#[test]
fn start_while_paused_resumes_without_resetting_phase() {
    let mut svc = booted();
    svc.turn_on();
    svc.start();
    svc.tick();
    svc.tick();
    svc.pause();
    svc.tick();
    let _ = svc.take_changed();

    assert_eq!(svc.start(), Some(Transition::Resumed));
    assert!(svc.take_changed());
    assert!(!svc.state().paused());
    assert_eq!(svc.state().phase(), 64);
    assert_eq!(svc.state().blink_phase(), 0);
    assert_eq!(svc.timer().arms, 1, "resume does not re-arm");
}

// ── Animation ─────────────────────────────────────────────────

#[test]
fn ticks_draw_sweep_and_blink_indicator() {
    let mut svc = booted();
    svc.turn_on();
    svc.start();
    svc.display_mut().clear_history();

    let frame = svc.tick();
    let Frame::Running { indicator, sweep } = frame else {
        panic!("expected a running frame, got {frame:?}");
    };
    assert_eq!(indicator, RUNNING_ON);
    assert_eq!((sweep.start_deg, sweep.end_deg, sweep.colour), (0, 32, WATER));
    assert_eq!(svc.display().arcs_at(SWEEP.radius), vec![(0, 32, WATER)]);
    assert_eq!(
        svc.display().rect_colour_at(RUNNING_INDICATOR.x, RUNNING_INDICATOR.y),
        Some(RUNNING_ON)
    );
    assert_eq!(svc.tick_count(), 1);
}

#[test]
fn stray_tick_after_stop_draws_idle_frame() {
    let mut svc = booted();
    svc.turn_on();
    svc.start();
    svc.tick();
    svc.stop();
    let _ = svc.take_changed();

    assert_eq!(svc.tick(), Frame::Idle);
    assert_eq!(svc.state().phase(), 0);
    assert_eq!(svc.state().blink_phase(), 0);
    assert!(!svc.take_changed(), "ticks never set the dirty flag");
    assert_eq!(
        svc.display().arcs_at(SWEEP.radius).last().map(|a| a.2),
        Some(WATER)
    );
    assert_eq!(
        svc.display().rect_colour_at(RUNNING_INDICATOR.x, RUNNING_INDICATOR.y),
        Some(RUNNING_OFF)
    );
}

// ── Buttons ───────────────────────────────────────────────────

#[test]
fn buttons_toggle_current_flags() {
    let mut svc = booted();

    svc.press(ButtonEvent::PowerToggle);
    assert!(svc.state().powered());
    assert_eq!(
        svc.display().rect_colour_at(POWER_INDICATOR.x, POWER_INDICATOR.y),
        Some(POWER_ON)
    );

    svc.press(ButtonEvent::StartStopToggle);
    assert!(svc.state().running());
    svc.press(ButtonEvent::PauseResumeToggle);
    assert!(svc.state().paused());
    svc.press(ButtonEvent::PauseResumeToggle);
    assert!(!svc.state().paused());
    svc.press(ButtonEvent::StartStopToggle);
    assert!(!svc.state().running());
    assert!(!svc.timer().armed);

    svc.press(ButtonEvent::PowerToggle);
    assert!(!svc.state().powered());
}

#[test]
fn pause_button_while_stopped_is_a_no_op() {
    let mut svc = booted();
    svc.press(ButtonEvent::PowerToggle);
    let _ = svc.take_changed();
    assert_eq!(svc.press(ButtonEvent::PauseResumeToggle), None);
    assert!(!svc.take_changed());
}
