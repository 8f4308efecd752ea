//! Resize event debouncer.
//!
//! Browsers fire `resize` many times while a window is dragged. Each event
//! invalidates rendered plots and triggers a layout pass; the debouncer decides
//! when that pass runs.
//!
//! - **Latest-wins**: the pass reads measurements when it runs, so the last
//!   event in a burst determines the final layout. A pending burst always ends
//!   in an [`ResizeAction::Apply`].
//! - **Bounded latency**: a burst cannot postpone the pass beyond
//!   `hard_deadline_ms` from its first event.
//! - **Host-driven time**: callers pass `now`, so sequences are deterministic.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `delay_ms = 0` | Apply on every event |
//! | `hard_deadline_ms = 0` | Apply immediately (forced) |
//! | `tick_at` with nothing pending | `None` |

use tracing::trace;
use web_time::{Duration, Instant};

use crate::config::ResizeConfig;

#[inline]
fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier).unwrap_or(Duration::ZERO)
}

/// What the host should do after an event or tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAction {
    /// Nothing pending.
    None,
    /// A pass is pending; tick again after `retry_in`.
    Defer { retry_in: Duration },
    /// Run the layout pass now.
    Apply {
        /// Events folded into this pass.
        coalesced: u64,
        /// Whether the hard deadline forced the pass.
        forced: bool,
    },
}

/// Counters since construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebouncerStats {
    pub events: u64,
    pub applies: u64,
    pub forced_applies: u64,
}

/// Latest-wins resize debouncer.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    config: ResizeConfig,
    /// First event of the pending burst.
    window_start: Option<Instant>,
    /// Most recent event of the pending burst.
    last_event: Option<Instant>,
    events_in_window: u64,
    stats: DebouncerStats,
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(config: ResizeConfig) -> Self {
        Self {
            config,
            window_start: None,
            last_event: None,
            events_in_window: 0,
            stats: DebouncerStats::default(),
        }
    }

    /// Record a resize event at `now`.
    pub fn handle_resize_at(&mut self, now: Instant) -> ResizeAction {
        self.stats.events += 1;
        self.events_in_window += 1;
        let window_start = *self.window_start.get_or_insert(now);
        self.last_event = Some(now);

        if self.config.delay_ms == 0 {
            return self.apply(false);
        }
        let deadline = Duration::from_millis(self.config.hard_deadline_ms);
        if duration_since_or_zero(now, window_start) >= deadline {
            return self.apply(true);
        }

        trace!(pending = self.events_in_window, "resize deferred");
        ResizeAction::Defer {
            retry_in: Duration::from_millis(self.config.delay_ms),
        }
    }

    /// Advance the debouncer to `now`.
    pub fn tick_at(&mut self, now: Instant) -> ResizeAction {
        let (Some(window_start), Some(last_event)) = (self.window_start, self.last_event) else {
            return ResizeAction::None;
        };

        let deadline = Duration::from_millis(self.config.hard_deadline_ms);
        if duration_since_or_zero(now, window_start) >= deadline {
            return self.apply(true);
        }

        let delay = Duration::from_millis(self.config.delay_ms);
        let quiet = duration_since_or_zero(now, last_event);
        if quiet >= delay {
            return self.apply(false);
        }

        let until_deadline = deadline - duration_since_or_zero(now, window_start);
        ResizeAction::Defer {
            retry_in: (delay - quiet).min(until_deadline),
        }
    }

    /// Time until the pending pass is due, if one is pending.
    #[must_use]
    pub fn time_until_apply(&self, now: Instant) -> Option<Duration> {
        let window_start = self.window_start?;
        let last_event = self.last_event?;
        let delay = Duration::from_millis(self.config.delay_ms)
            .saturating_sub(duration_since_or_zero(now, last_event));
        let deadline = Duration::from_millis(self.config.hard_deadline_ms)
            .saturating_sub(duration_since_or_zero(now, window_start));
        Some(delay.min(deadline))
    }

    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.window_start.is_some()
    }

    #[must_use]
    pub fn stats(&self) -> DebouncerStats {
        self.stats
    }

    #[must_use]
    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    fn apply(&mut self, forced: bool) -> ResizeAction {
        let coalesced = self.events_in_window;
        self.window_start = None;
        self.last_event = None;
        self.events_in_window = 0;
        self.stats.applies += 1;
        if forced {
            self.stats.forced_applies += 1;
        }
        trace!(coalesced, forced, "resize apply");
        ResizeAction::Apply { coalesced, forced }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn debouncer(delay_ms: u64, hard_deadline_ms: u64) -> ResizeDebouncer {
        ResizeDebouncer::new(ResizeConfig {
            delay_ms,
            hard_deadline_ms,
        })
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn zero_delay_applies_every_event() {
        let mut d = debouncer(0, 250);
        let t0 = Instant::now();
        for i in 0..3 {
            assert_eq!(
                d.handle_resize_at(t0 + ms(i)),
                ResizeAction::Apply {
                    coalesced: 1,
                    forced: false,
                }
            );
        }
        assert!(!d.has_pending());
        assert_eq!(d.stats().applies, 3);
    }

    #[test]
    fn burst_coalesces_into_one_trailing_apply() {
        let mut d = debouncer(50, 1_000);
        let t0 = Instant::now();
        for i in 0..5 {
            assert_eq!(
                d.handle_resize_at(t0 + ms(i * 10)),
                ResizeAction::Defer { retry_in: ms(50) }
            );
        }
        // Last event at t0+40.
        assert_eq!(
            d.tick_at(t0 + ms(60)),
            ResizeAction::Defer { retry_in: ms(30) }
        );
        assert_eq!(
            d.tick_at(t0 + ms(90)),
            ResizeAction::Apply {
                coalesced: 5,
                forced: false,
            }
        );
        assert_eq!(d.tick_at(t0 + ms(200)), ResizeAction::None);
        assert_eq!(
            d.stats(),
            DebouncerStats {
                events: 5,
                applies: 1,
                forced_applies: 0,
            }
        );
    }

    #[test]
    fn hard_deadline_bounds_a_long_burst() {
        let mut d = debouncer(50, 100);
        let t0 = Instant::now();
        d.handle_resize_at(t0);
        d.handle_resize_at(t0 + ms(40));
        d.handle_resize_at(t0 + ms(80));
        assert_eq!(
            d.handle_resize_at(t0 + ms(120)),
            ResizeAction::Apply {
                coalesced: 4,
                forced: true,
            }
        );
        assert_eq!(d.stats().forced_applies, 1);
    }

    #[test]
    fn zero_deadline_forces_immediate_apply() {
        let mut d = debouncer(50, 0);
        assert_eq!(
            d.handle_resize_at(Instant::now()),
            ResizeAction::Apply {
                coalesced: 1,
                forced: true,
            }
        );
    }

    #[test]
    fn time_until_apply_tracks_pending_burst() {
        let mut d = debouncer(50, 1_000);
        let t0 = Instant::now();
        assert_eq!(d.time_until_apply(t0), None);
        d.handle_resize_at(t0);
        assert_eq!(d.time_until_apply(t0 + ms(20)), Some(ms(30)));
        assert_eq!(d.time_until_apply(t0 + ms(80)), Some(Duration::ZERO));
    }
}
