//! Press-and-hold SOS trigger.
//!
//! Holding the button fills a gauge over 1.5 seconds; releasing early cancels.
//! A full gauge starts a ten second countdown during which the alert can
//! still be aborted, then the dispatch fires.

pub const HOLD_THRESHOLD_MS: f64 = 1_500.0;
pub const COUNTDOWN_SECONDS: u32 = 10;

/// Gauge state for one press. Progress is a function of the clock, so the
/// render loop just asks with the current timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldGauge {
    started_at_ms: f64,
}

impl HoldGauge {
    pub fn begin(now_ms: f64) -> Self {
        Self {
            started_at_ms: now_ms,
        }
    }

    pub fn progress(&self, now_ms: f64) -> u8 {
        let elapsed = (now_ms - self.started_at_ms).max(0.0);
        let ratio = (elapsed / HOLD_THRESHOLD_MS).clamp(0.0, 1.0);
        (ratio * 100.0).round() as u8
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        now_ms - self.started_at_ms >= HOLD_THRESHOLD_MS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SosPhase {
    #[default]
    Idle,
    Holding,
    Countdown(u32),
    Dispatching,
    Sent,
}

impl SosPhase {
    pub fn begin_countdown() -> Self {
        SosPhase::Countdown(COUNTDOWN_SECONDS)
    }

    /// One countdown second elapsed. At zero the alert goes out.
    pub fn tick(self) -> Self {
        match self {
            SosPhase::Countdown(1) => SosPhase::Dispatching,
            SosPhase::Countdown(n) if n > 1 => SosPhase::Countdown(n - 1),
            other => other,
        }
    }

    pub fn cancel(self) -> Self {
        match self {
            SosPhase::Holding | SosPhase::Countdown(_) => SosPhase::Idle,
            other => other,
        }
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(self, SosPhase::Holding | SosPhase::Countdown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_fills_linearly_to_one_hundred() {
        let gauge = HoldGauge::begin(1_000.0);
        assert_eq!(gauge.progress(1_000.0), 0);
        assert_eq!(gauge.progress(1_750.0), 50);
        assert_eq!(gauge.progress(2_500.0), 100);
        assert_eq!(gauge.progress(9_999.0), 100);
    }

    #[test]
    fn gauge_completes_exactly_at_the_threshold() {
        let gauge = HoldGauge::begin(0.0);
        assert!(!gauge.is_complete(1_499.0));
        assert!(gauge.is_complete(1_500.0));
    }

    #[test]
    fn clock_going_backwards_reads_as_zero() {
        let gauge = HoldGauge::begin(5_000.0);
        assert_eq!(gauge.progress(4_000.0), 0);
        assert!(!gauge.is_complete(4_000.0));
    }

    #[test]
    fn countdown_ticks_down_to_dispatch() {
        let mut phase = SosPhase::begin_countdown();
        assert_eq!(phase, SosPhase::Countdown(COUNTDOWN_SECONDS));
        for _ in 0..COUNTDOWN_SECONDS - 1 {
            phase = phase.tick();
        }
        assert_eq!(phase, SosPhase::Countdown(1));
        assert_eq!(phase.tick(), SosPhase::Dispatching);
    }

    #[test]
    fn cancel_only_applies_before_dispatch() {
        assert_eq!(SosPhase::Countdown(4).cancel(), SosPhase::Idle);
        assert_eq!(SosPhase::Holding.cancel(), SosPhase::Idle);
        assert_eq!(SosPhase::Dispatching.cancel(), SosPhase::Dispatching);
        assert_eq!(SosPhase::Sent.cancel(), SosPhase::Sent);
    }

    #[test]
    fn ticking_outside_the_countdown_is_inert() {
        assert_eq!(SosPhase::Idle.tick(), SosPhase::Idle);
        assert_eq!(SosPhase::Dispatching.tick(), SosPhase::Dispatching);
    }
}
