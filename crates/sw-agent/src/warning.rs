//! The warning-display region.
//!
//! A warning is the only evidence the operator gets.  Each customer is given
//! a fixed budget of warnings at creation (3 for thieves, 0–2 otherwise) and
//! shows one every `interval` ticks until the budget is spent.  Each warning
//! stays visible for `display` ticks (at least one).

use sw_core::Countdown;

/// Maximum warnings any customer can show; reaching it marks a confirmed thief.
pub const CONFIRMED_WARNINGS: u8 = 3;

/// A visible change produced by one [`WarningTimer::tick`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WarningEvent {
    /// A new warning appeared; `count` is the running total including it.
    Shown { count: u8 },
    /// The current warning's display time ran out.
    Hidden,
}

/// Independent warning timer for one customer.
#[derive(Clone, Debug)]
pub struct WarningTimer {
    total:          u8,
    shown:          u8,
    interval:       Countdown,
    display:        Countdown,
    interval_ticks: u64,
    display_ticks:  u64,
}

impl WarningTimer {
    /// `total` is clamped to [`CONFIRMED_WARNINGS`].
    pub fn new(total: u8, interval_ticks: u64, display_ticks: u64) -> Self {
        let total = total.min(CONFIRMED_WARNINGS);
        let interval = if total > 0 { Countdown::new(interval_ticks) } else { Countdown::idle() };
        Self {
            total,
            shown: 0,
            interval,
            display: Countdown::idle(),
            interval_ticks,
            display_ticks: display_ticks.max(1),
        }
    }

    /// Advance one tick.  At most one hide and one show per tick, in that
    /// order.
    pub fn tick(&mut self) -> (Option<WarningEvent>, Option<WarningEvent>) {
        let hidden = self.display.tick().then_some(WarningEvent::Hidden);

        let mut shown = None;
        if self.interval.tick() && self.shown < self.total {
            self.shown += 1;
            self.display.reset(self.display_ticks);
            shown = Some(WarningEvent::Shown { count: self.shown });
            if self.shown < self.total {
                self.interval.reset(self.interval_ticks);
            }
        }
        (hidden, shown)
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn shown(&self) -> u8 {
        self.shown
    }

    /// `true` while a warning is on screen.
    pub fn is_visible(&self) -> bool {
        self.display.is_armed()
    }

    /// `true` once every budgeted warning has been shown.
    pub fn is_exhausted(&self) -> bool {
        self.shown >= self.total
    }
}
