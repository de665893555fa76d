//! Next occurrence search.
//!
//! The search looks at the fields of the starting instant from year down to
//! second. The first field whose value is not in the schedule decides where to
//! search: that field moves to its next scheduled value and every finer field
//! restarts at its first one. When a field runs out of values the search
//! carries into the next coarser field, exactly like counting.
//!
//! Seconds and minutes are stepped by truncating the instant and adding the
//! distance to the target. Hours try the same shortcut and fall back to
//! building the instant from its wall-clock fields, which days, months and
//! years always do. Wall-clock times skipped by a daylight saving gap resolve
//! to the instant the same distance past the gap, and repeated wall-clock
//! times resolve to their first occurrence. A schedule covering every hour
//! keeps stepping through the repeated hour, so `0 * * * *` still fires once
//! per real hour when clocks go back.

use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone,
    Timelike,
};
use log::trace;

use crate::pattern::CronPattern;

const HOURS_PER_DAY: usize = 24;

pub(crate) struct Resolver<'a, Tz: TimeZone> {
    pattern: &'a CronPattern,
    timezone: Tz,
    // Days of the month currently searched
    days: Vec<u32>,
}

impl<'a, Tz: TimeZone> Resolver<'a, Tz> {
    pub(crate) fn new(pattern: &'a CronPattern, timezone: Tz) -> Self {
        Self {
            pattern,
            timezone,
            days: Vec::new(),
        }
    }

    /// Finds the first instant strictly after `from` matching the pattern.
    pub(crate) fn next(&mut self, from: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let pattern = self.pattern;

        let year = from.year();
        if pattern.year_at_or_after(year)? != year {
            return self.next_year(year);
        }

        let month = from.month();
        match at_or_after(pattern.months(), month) {
            None => return self.next_year(year),
            Some(found) if found != month => return self.next_month(year, month),
            Some(_) => {}
        }

        self.days = pattern.actual_days(year, month);
        let day = from.day();
        match at_or_after(&self.days, day) {
            None => return self.next_month(year, month),
            Some(found) if found != day => return self.next_day(from),
            Some(_) => {}
        }

        let hour = from.hour();
        match at_or_after(pattern.hours(), hour) {
            None => return self.next_day(from),
            Some(found) if found != hour => return self.next_hour(from),
            Some(_) => {}
        }

        let minute = from.minute();
        match at_or_after(pattern.minutes(), minute) {
            None => return self.next_hour(from),
            Some(found) if found != minute => return self.next_minute(from),
            Some(_) => {}
        }

        self.next_second(from)
    }

    fn next_year(&mut self, year: i32) -> Option<DateTime<Tz>> {
        let Some(year) = self.pattern.year_after(year) else {
            trace!("No scheduled year after {year}");
            return None;
        };
        self.first_in_month(year, self.pattern.months()[0])
    }

    fn next_month(&mut self, year: i32, month: u32) -> Option<DateTime<Tz>> {
        match after(self.pattern.months(), month) {
            Some(month) => self.first_in_month(year, month),
            None => self.next_year(year),
        }
    }

    // Earliest moment of the first month at or after (year, month) that has a
    // scheduled day.
    fn first_in_month(&mut self, mut year: i32, mut month: u32) -> Option<DateTime<Tz>> {
        let pattern = self.pattern;
        loop {
            trace!("Searching {year}-{month:02}");
            self.days = pattern.actual_days(year, month);
            if let Some(&day) = self.days.first() {
                return self.civil(year, month, day, pattern.hours()[0]);
            }
            (year, month) = match after(pattern.months(), month) {
                Some(month) => (year, month),
                None => (pattern.year_after(year)?, pattern.months()[0]),
            };
        }
    }

    fn next_day(&mut self, from: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        match after(&self.days, from.day()) {
            Some(day) => self.civil(from.year(), from.month(), day, self.pattern.hours()[0]),
            None => self.next_month(from.year(), from.month()),
        }
    }

    fn next_hour(&mut self, from: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let Some(hour) = after(self.pattern.hours(), from.hour()) else {
            return self.next_day(from);
        };
        let (minute, second) = (self.pattern.minutes()[0], self.pattern.seconds()[0]);

        let target = from.date_naive().and_hms_opt(hour, minute, second)?;
        let shifted = truncate_to_hour(from)?.checked_add_signed(
            TimeDelta::hours(i64::from(hour - from.hour()))
                + TimeDelta::minutes(i64::from(minute))
                + TimeDelta::seconds(i64::from(second)),
        )?;
        // An offset change on the way moves the wall clock. Landing early means
        // the clocks went back and the instant sits in the repeated hour, which
        // only a schedule running every hour fires in again.
        let local = shifted.naive_local();
        if local == target
            || (local < target
                && local.date() == target.date()
                && local.minute() == minute
                && local.second() == second
                && self.pattern.hours().len() == HOURS_PER_DAY)
        {
            return Some(shifted);
        }
        resolve_local(&self.timezone, target)
    }

    fn next_minute(&mut self, from: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let Some(minute) = after(self.pattern.minutes(), from.minute()) else {
            return self.next_hour(from);
        };
        truncate_to_hour(from)?.checked_add_signed(
            TimeDelta::minutes(i64::from(minute))
                + TimeDelta::seconds(i64::from(self.pattern.seconds()[0])),
        )
    }

    fn next_second(&mut self, from: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let Some(second) = after(self.pattern.seconds(), from.second()) else {
            return self.next_minute(from);
        };
        truncate_to_minute(from)?.checked_add_signed(TimeDelta::seconds(i64::from(second)))
    }

    // Builds the instant from wall-clock fields, minute and second at their
    // first scheduled values.
    fn civil(&self, year: i32, month: u32, day: u32, hour: u32) -> Option<DateTime<Tz>> {
        let local = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(
            hour,
            self.pattern.minutes()[0],
            self.pattern.seconds()[0],
        )?;
        resolve_local(&self.timezone, local)
    }
}

/// Smallest value of a sorted list strictly greater than `value`.
fn after(list: &[u32], value: u32) -> Option<u32> {
    list.get(list.partition_point(|&v| v <= value)).copied()
}

/// Smallest value of a sorted list not less than `value`.
fn at_or_after(list: &[u32], value: u32) -> Option<u32> {
    list.get(list.partition_point(|&v| v < value)).copied()
}

fn truncate_to_minute<Tz: TimeZone>(time: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    time.clone().checked_sub_signed(
        TimeDelta::seconds(i64::from(time.second()))
            + TimeDelta::nanoseconds(i64::from(time.nanosecond())),
    )
}

fn truncate_to_hour<Tz: TimeZone>(time: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    truncate_to_minute(time)?
        .checked_sub_signed(TimeDelta::minutes(i64::from(time.minute())))
}

/// Maps a wall-clock time to an instant of `timezone`.
///
/// A time repeated by a backward transition maps to its first occurrence. A
/// time skipped by a forward transition is read with the offset in force
/// before the transition, so 02:30 inside a 02:00-03:00 gap becomes 03:30.
pub(crate) fn resolve_local<Tz: TimeZone>(
    timezone: &Tz,
    local: NaiveDateTime,
) -> Option<DateTime<Tz>> {
    match timezone.from_local_datetime(&local) {
        LocalResult::Single(time) => Some(time),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let before = timezone
                .offset_from_utc_datetime(&local.checked_sub_signed(TimeDelta::days(1))?)
                .fix();
            let utc = local.checked_sub_signed(TimeDelta::seconds(i64::from(
                before.local_minus_utc(),
            )))?;
            Some(timezone.from_utc_datetime(&utc))
        }
    }
}
