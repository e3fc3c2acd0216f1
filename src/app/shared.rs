//! Shared handle to the washer service.
//!
//! The tick timer and the poll loop run on different execution contexts
//! (timer thread / ESP timer task vs. main task).  Both reach the service
//! only through this handle, which serialises every access behind one
//! `embassy-sync` blocking mutex guarding the whole service.

use core::cell::RefCell;
use std::sync::Arc;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use super::commands::WasherCommand;
use super::ports::CommandHandler;

/// Cloneable, thread-safe handle around a service value.
pub struct SharedWasher<S> {
    inner: Arc<Mutex<CriticalSectionRawMutex, RefCell<S>>>,
}

impl<S> Clone for SharedWasher<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> SharedWasher<S> {
    pub fn new(service: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RefCell::new(service))),
        }
    }

    /// Run `f` with exclusive access.  Keep `f` short: the tick timer waits
    /// on the same lock.  `f` must not call back into this handle.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<S: CommandHandler> CommandHandler for SharedWasher<S> {
    fn handle_command(&mut self, cmd: WasherCommand) {
        self.with(|svc| svc.handle_command(cmd));
    }
}
