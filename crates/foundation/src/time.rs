//! Civil-time primitives for the daily sun timeline.
//!
//! All times in this workspace are wall-clock times in the service's civil
//! time zone. `ClockTime` is a minute-of-day; dates are `chrono::NaiveDate`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Fixed step between two timeline slots.
pub const SLOT_STEP_MINUTES: u16 = 15;

/// First slot of the daily window (07:00).
pub const DAY_START: ClockTime = ClockTime(7 * 60);

/// Last slot of the daily window (22:00).
pub const DAY_END: ClockTime = ClockTime(22 * 60);

const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockTimeError {
    Malformed(String),
    OutOfRange { hours: u32, minutes: u32 },
}

impl std::fmt::Display for ClockTimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockTimeError::Malformed(raw) => write!(f, "malformed clock time: {raw:?}"),
            ClockTimeError::OutOfRange { hours, minutes } => {
                write!(f, "clock time out of range: {hours}:{minutes:02}")
            }
        }
    }
}

impl std::error::Error for ClockTimeError {}

/// Minute of the day, `00:00..=23:59`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(ClockTime(minutes))
    }

    pub fn from_hm(hours: u8, minutes: u8) -> Option<Self> {
        if hours >= 24 || minutes >= 60 {
            return None;
        }
        Some(ClockTime(hours as u16 * 60 + minutes as u16))
    }

    /// Parses `"H:MM"` or `"HH:MM"`. Anything else (including trailing
    /// garbage such as `"14:00703"`) is rejected.
    pub fn parse(raw: &str) -> Result<Self, ClockTimeError> {
        let malformed = || ClockTimeError::Malformed(raw.to_string());
        let (h, m) = raw.trim().split_once(':').ok_or_else(malformed)?;
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(h) || h.len() > 2 || !digits(m) || m.len() != 2 {
            return Err(malformed());
        }
        let hours: u32 = h.parse().map_err(|_| malformed())?;
        let minutes: u32 = m.parse().map_err(|_| malformed())?;
        if hours >= 24 || minutes >= 60 {
            return Err(ClockTimeError::OutOfRange { hours, minutes });
        }
        Ok(ClockTime((hours * 60 + minutes) as u16))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Rounds down to the slot step, then clamps into the daily window.
    pub fn floor_to_window(self) -> Self {
        let floored = self.0 - self.0 % SLOT_STEP_MINUTES;
        ClockTime(floored).clamp(DAY_START, DAY_END)
    }

    /// Maps a raw slider position (minutes since midnight, possibly out of
    /// range) to the nearest slot step inside the daily window.
    pub fn from_slider(raw_minutes: i64) -> Self {
        let snapped = snap_minutes(raw_minutes);
        let clamped = snapped.clamp(DAY_START.0 as i64, DAY_END.0 as i64);
        ClockTime(clamped as u16)
    }

    pub fn with_date(self, date: NaiveDate) -> NaiveDateTime {
        date.and_hms_opt(self.hour() as u32, self.minute() as u32, 0)
            .unwrap_or_else(|| date.and_time(chrono::NaiveTime::default()))
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl std::str::FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClockTime::parse(s)
    }
}

/// Rounds a minute count to the nearest slot step (ties round up).
pub fn snap_minutes(raw_minutes: i64) -> i64 {
    let step = SLOT_STEP_MINUTES as i64;
    let shifted = raw_minutes.saturating_add(step / 2);
    shifted.saturating_sub(shifted.rem_euclid(step))
}

/// Every slot time of the daily window, in order.
pub fn day_window_slots() -> impl Iterator<Item = ClockTime> {
    (DAY_START.0..=DAY_END.0)
        .step_by(SLOT_STEP_MINUTES as usize)
        .map(ClockTime)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Moves `date` by whole days. Out-of-range results leave the date unchanged.
pub fn step_date(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

/// Local date-time in the `YYYY-MM-DDTHH:MM:00` form the nearby query expects.
pub fn query_datetime(date: NaiveDate, time: ClockTime) -> String {
    format!("{}T{}:00", format_date(date), time)
}

/// Resolves a civil date and clock time in `tz` to an instant.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant; times
/// that do not exist (DST spring-forward gap) yield `None`.
pub fn local_to_utc(date: NaiveDate, time: ClockTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&time.with_date(date))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Wall-clock "now", captured once when a view mounts.
///
/// Views derive their defaults (selected time, date) from this value only,
/// never from the system clock inside render paths.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MountClock {
    now: NaiveDateTime,
}

impl MountClock {
    pub fn capture(tz: Tz) -> Self {
        Self {
            now: Utc::now().with_timezone(&tz).naive_local(),
        }
    }

    pub fn fixed(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Current time rounded down to the slot step, clamped to the window.
    pub fn default_time(&self) -> ClockTime {
        let minutes = (self.now.hour() * 60 + self.now.minute()) as u16;
        ClockTime(minutes).floor_to_window()
    }
}
