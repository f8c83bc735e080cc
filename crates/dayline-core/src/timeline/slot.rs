//! Time-slot arithmetic for the day window.
//!
//! Minutes are counted from local midnight of the diary day. The window runs
//! from 06:00 to 06:00 the next day, so valid values span `360..=1800`.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Minutes since midnight of the diary day.
pub type Minutes = i64;

pub const DEFAULT_WINDOW_START: Minutes = 6 * 60;
pub const DEFAULT_WINDOW_LENGTH: Minutes = 24 * 60;
pub const DEFAULT_SLOT_MINUTES: Minutes = 15;

/// Slots between two hour labels.
pub const SLOTS_PER_LABEL: usize = 4;

/// Quantisation grid of a day timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGrid {
    pub window_start: Minutes,
    pub window_length: Minutes,
    pub slot_minutes: Minutes,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            window_start: DEFAULT_WINDOW_START,
            window_length: DEFAULT_WINDOW_LENGTH,
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

impl SlotGrid {
    pub fn window_end(&self) -> Minutes {
        self.window_start + self.window_length
    }

    /// Number of slots in the window (96 for the default grid).
    pub fn slot_count(&self) -> usize {
        (self.window_length / self.slot_minutes) as usize
    }

    /// Rounds to the nearest slot boundary relative to the window start.
    ///
    /// Halves round away from zero.
    pub fn snap(&self, minutes: Minutes) -> Minutes {
        let offset = (minutes - self.window_start) as f64;
        let slots = (offset / self.slot_minutes as f64).round() as Minutes;
        self.window_start + slots * self.slot_minutes
    }

    pub fn clamp(&self, minutes: Minutes) -> Minutes {
        minutes.clamp(self.window_start, self.window_end())
    }

    pub fn snap_and_clamp(&self, minutes: Minutes) -> Minutes {
        self.clamp(self.snap(minutes))
    }

    /// Whether `minutes` sits exactly on a slot boundary.
    pub fn is_aligned(&self, minutes: Minutes) -> bool {
        (minutes - self.window_start).rem_euclid(self.slot_minutes) == 0
    }

    /// Rounded slot index of an absolute minute value, measured from the window start.
    pub fn slot_of(&self, minutes: Minutes) -> i64 {
        let offset = (minutes - self.window_start) as f64;
        (offset / self.slot_minutes as f64).round() as i64
    }

    pub fn minutes_at_slot(&self, slot: i64) -> Minutes {
        self.window_start + slot * self.slot_minutes
    }

    /// Converts a form's wall-clock time into window minutes.
    ///
    /// Times before the window start belong to the following morning, so
    /// `02:00` maps to `1560` rather than `120`.
    pub fn wall_clock_to_minutes(&self, time: NaiveTime) -> Minutes {
        let minutes = Minutes::from(time.hour()) * 60 + Minutes::from(time.minute());
        if minutes < self.window_start.rem_euclid(24 * 60) {
            minutes + 24 * 60
        } else {
            minutes
        }
    }

    /// Like [`SlotGrid::wall_clock_to_minutes`], but the window start read
    /// as an end time means the end of the window.
    pub fn end_wall_clock_to_minutes(&self, time: NaiveTime) -> Minutes {
        let minutes = self.wall_clock_to_minutes(time);
        if minutes == self.window_start {
            self.window_end()
        } else {
            minutes
        }
    }
}

/// Wall-clock time shown for a minute value; hours wrap at 24.
pub fn minutes_to_wall_clock(minutes: Minutes) -> NaiveTime {
    let hour = minutes.div_euclid(60).rem_euclid(24) as u32;
    let minute = minutes.rem_euclid(60) as u32;
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// `HH:MM` with hours modulo 24.
pub fn format_clock(minutes: Minutes) -> String {
    format!(
        "{:02}:{:02}",
        minutes.div_euclid(60).rem_euclid(24),
        minutes.rem_euclid(60)
    )
}

/// `HH:MM-HH:MM`, the time part of block labels and summaries.
pub fn format_range(start: Minutes, end: Minutes) -> String {
    format!("{}-{}", format_clock(start), format_clock(end))
}
