//! Round timer and mismatch release callbacks on browser timers.

use gloo_timers::callback::{Interval, Timeout};

use crate::round::{PendingRelease, RoundTimer, Scheduler};

use super::current_session;

/// Holds at most one live interval; dropping it cancels the browser timer.
#[derive(Default)]
pub struct IntervalTimer {
    active: Option<Interval>,
}

impl RoundTimer for IntervalTimer {
    fn start(&mut self, period_ms: u32) {
        self.stop();
        self.active = Some(Interval::new(period_ms, || {
            if let Some(session) = current_session() {
                session.tick();
            }
        }));
    }

    fn stop(&mut self) {
        self.active = None;
    }
}

/// One-shot timeout per mismatch; the release is dropped by the controller
/// if the round changed in the meantime.
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule_release(&mut self, delay_ms: u32, pending: PendingRelease) {
        Timeout::new(delay_ms, move || {
            if let Some(session) = current_session() {
                session.release(pending);
            }
        })
        .forget();
    }
}
