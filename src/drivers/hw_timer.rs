//! Periodic animation tick timer.
//!
//! One fixed-period timer runs for the whole process; arming and disarming
//! only flip a shared flag that the timer callback checks before calling
//! into the service.  This keeps the service free of any timer handle it
//! would otherwise need to create from inside its own lock.
//!
//! - **`target_os = "espidf"`**: `EspTaskTimerService` periodic timer.  The
//!   callback runs in the ESP timer task, not in an ISR.
//! - **all other targets**: a dedicated `tick` thread that sleeps one
//!   period between callbacks.

use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

use crate::app::ports::TickTimerPort;
use crate::error::Error;

/// Service-side half: arms and disarms the tick.
#[derive(Debug)]
pub struct TickTimer {
    armed: Arc<AtomicBool>,
}

impl TickTimerPort for TickTimer {
    fn arm(&mut self) {
        self.armed.store(true, Ordering::Release);
    }

    fn disarm(&mut self) {
        self.armed.store(false, Ordering::Release);
    }

    fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

/// Driver-side half: owns the period and starts the underlying timer.
pub struct TickDriver {
    armed: Arc<AtomicBool>,
    period: Duration,
}

/// Create a disarmed timer pair with the given period.
pub fn tick_timer(period: Duration) -> (TickTimer, TickDriver) {
    let armed = Arc::new(AtomicBool::new(false));
    (
        TickTimer {
            armed: Arc::clone(&armed),
        },
        TickDriver { armed, period },
    )
}

/// Keeps the underlying timer alive.  Dropping it stops the ticks.
pub struct TickHandle {
    #[cfg(not(target_os = "espidf"))]
    shutdown: Arc<AtomicBool>,
    #[cfg(not(target_os = "espidf"))]
    thread: Option<std::thread::JoinHandle<()>>,
    #[cfg(target_os = "espidf")]
    _timer: esp_idf_svc::timer::EspTimer<'static>,
}

impl TickDriver {
    /// Start ticking.  `on_tick` runs once per period while armed.
    #[cfg(not(target_os = "espidf"))]
    pub fn start(self, mut on_tick: impl FnMut() + Send + 'static) -> Result<TickHandle, Error> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&shutdown);
        let Self { armed, period } = self;

        let thread = std::thread::Builder::new()
            .name("tick".into())
            .spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    std::thread::sleep(period);
                    if armed.load(Ordering::Acquire) {
                        on_tick();
                    }
                }
            })
            .map_err(|_| Error::Init("tick thread spawn failed"))?;

        info!("hw_timer(sim): tick thread started, period={:?}", period);
        Ok(TickHandle {
            shutdown,
            thread: Some(thread),
        })
    }

    /// Start ticking.  `on_tick` runs once per period while armed.
    #[cfg(target_os = "espidf")]
    pub fn start(self, mut on_tick: impl FnMut() + Send + 'static) -> Result<TickHandle, Error> {
        use esp_idf_svc::timer::EspTaskTimerService;

        let Self { armed, period } = self;
        let service = EspTaskTimerService::new().map_err(|_| Error::Init("timer service"))?;
        let timer = service
            .timer(move || {
                if armed.load(Ordering::Acquire) {
                    on_tick();
                }
            })
            .map_err(|_| Error::Init("timer create"))?;
        timer
            .every(period)
            .map_err(|_| Error::Init("timer start"))?;

        info!("hw_timer: tick timer started, period={:?}", period);
        Ok(TickHandle { _timer: timer })
    }
}

#[cfg(not(target_os = "espidf"))]
impl Drop for TickHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
