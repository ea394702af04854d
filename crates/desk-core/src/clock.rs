//! Time sources used to timestamp ticket events

use std::sync::Mutex;

use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time};

use crate::{Error, Result};

/// Supplies the current instant for new events
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set_time(&self, instant: OffsetDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    /// Set the time from a short US timestamp such as `1/3/22 13:37` (UTC)
    pub fn set_time_str(&self, text: &str) -> Result<()> {
        self.set_time(parse_short_timestamp(text)?);
        Ok(())
    }

    /// Move the clock by `by`. Fails, leaving the time unchanged, if the
    /// result is out of range.
    pub fn advance(&self, by: Duration) -> Result<()> {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now
            .checked_add(by)
            .ok_or_else(|| Error::invalid_argument(format!("Can't advance the clock by {}", by)))?;
        Ok(())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(OffsetDateTime::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parse `M/d/yy HH:mm`. Two-digit years land in the 2000s.
pub fn parse_short_timestamp(text: &str) -> Result<OffsetDateTime> {
    let bad = || Error::invalid_argument(format!("Unrecognized timestamp: {:?}", text));

    let (date_part, time_part) = text.trim().split_once(' ').ok_or_else(bad)?;

    let mut date_fields = date_part.split('/');
    let (Some(month), Some(day), Some(year), None) = (
        date_fields.next(),
        date_fields.next(),
        date_fields.next(),
        date_fields.next(),
    ) else {
        return Err(bad());
    };
    let (hour, minute) = time_part.trim().split_once(':').ok_or_else(bad)?;

    let month: u8 = month.parse().map_err(|_| bad())?;
    let day: u8 = day.parse().map_err(|_| bad())?;
    let mut year: i32 = year.parse().map_err(|_| bad())?;
    if year < 100 {
        year += 2000;
    }
    let hour: u8 = hour.parse().map_err(|_| bad())?;
    let minute: u8 = minute.parse().map_err(|_| bad())?;

    let month = Month::try_from(month).map_err(|_| bad())?;
    let date = Date::from_calendar_date(year, month, day).map_err(|_| bad())?;
    let time = Time::from_hms(hour, minute, 0).map_err(|_| bad())?;

    Ok(PrimitiveDateTime::new(date, time).assume_utc())
}
