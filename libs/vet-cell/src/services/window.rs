use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// Assumed length of a requested appointment.
pub const DEFAULT_APPOINTMENT_DURATION_MINUTES: i64 = 120;
/// Margin before the requested start inside which an existing booking conflicts.
pub const LEADING_BUFFER_MINUTES: i64 = 160;
/// Margin after the requested end inside which an existing booking conflicts.
pub const TRAILING_BUFFER_MINUTES: i64 = 60;

/// Open interval `(min_time, max_time)` on a single day. Bookings exactly on
/// either bound do not conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictWindow {
    pub min_time: NaiveTime,
    pub max_time: NaiveTime,
}

impl ConflictWindow {
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.min_time < time && time < self.max_time
    }
}

/// Last representable instant of the day, `23:59:59.999`.
pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("23:59:59.999 is a valid time of day")
}

/// Converts a requested start into the window used for conflict checks.
///
/// `min_time` is `start - 2h40m`, clamped to `00:00:00` when that would fall
/// on the previous day. `max_time` is `start + 2h + 1h`, clamped to
/// `23:59:59.999` when either step runs past midnight.
pub fn compute_window(requested_start: NaiveTime) -> ConflictWindow {
    let (min_time, wrapped_back) =
        requested_start.overflowing_sub_signed(Duration::minutes(LEADING_BUFFER_MINUTES));
    let min_time = if wrapped_back != 0 { NaiveTime::MIN } else { min_time };

    let (requested_end, end_wrapped) = requested_start
        .overflowing_add_signed(Duration::minutes(DEFAULT_APPOINTMENT_DURATION_MINUTES));
    let (max_time, max_wrapped) =
        requested_end.overflowing_add_signed(Duration::minutes(TRAILING_BUFFER_MINUTES));
    let max_time = if end_wrapped != 0 || max_wrapped != 0 { end_of_day() } else { max_time };

    ConflictWindow { min_time, max_time }
}
