use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Months, NaiveDate};

use crate::{YEAR_LOWER_LIMIT, YEAR_UPPER_LIMIT};

/// Day-of-month part of a schedule.
///
/// Every set below contributes days on its own; the contributions are unioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DaysOfMonth {
    /// `false` when the field held a wildcard.
    pub restricted: bool,
    /// Plain days, `1-31`.
    pub days: BTreeSet<u32>,
    /// Days given as `nW`, moved to the nearest weekday of the same month.
    pub workdays: BTreeSet<u32>,
    /// `L`
    pub last_day: bool,
    /// `LW`
    pub last_workday: bool,
    /// `L-n`, zero when absent.
    pub last_nth_day: u32,
}

/// Day-of-week part of a schedule. Sunday is 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DaysOfWeek {
    /// `false` when the field held a wildcard.
    pub restricted: bool,
    /// Plain weekdays, every occurrence in the month.
    pub days: BTreeSet<u32>,
    /// `(week, weekday)` pairs given as `weekday#week`.
    pub nth_days: BTreeSet<(u32, u32)>,
    /// Weekdays given as `nL`, the last occurrence in the month.
    pub last_days: BTreeSet<u32>,
}

/// A cron expression parsed into sorted value lists per field.
///
/// Built by [`CronParser`](crate::parser::CronParser) and never changed
/// afterwards. Two patterns compare equal when they describe the same
/// schedule, whatever the text they were parsed from.
#[derive(Debug, Clone)]
pub struct CronPattern {
    pub(crate) pattern: String,

    pub(crate) seconds: Vec<u32>,
    pub(crate) minutes: Vec<u32>,
    pub(crate) hours: Vec<u32>,
    pub(crate) months: Vec<u32>,
    // None is every supported year
    pub(crate) years: Option<Vec<i32>>,

    pub(crate) days_of_month: DaysOfMonth,
    pub(crate) days_of_week: DaysOfWeek,
}

impl CronPattern {
    pub fn seconds(&self) -> &[u32] {
        &self.seconds
    }

    pub fn minutes(&self) -> &[u32] {
        &self.minutes
    }

    pub fn hours(&self) -> &[u32] {
        &self.hours
    }

    pub fn months(&self) -> &[u32] {
        &self.months
    }

    /// Years the schedule is restricted to, or `None` when every year from
    /// 1970 through 3999 qualifies.
    pub fn years(&self) -> Option<&[i32]> {
        self.years.as_deref()
    }

    pub fn days_of_month(&self) -> &DaysOfMonth {
        &self.days_of_month
    }

    pub fn days_of_week(&self) -> &DaysOfWeek {
        &self.days_of_week
    }

    /// Get a reference to the original pattern
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// First year of the schedule at or after `year`.
    pub(crate) fn year_at_or_after(&self, year: i32) -> Option<i32> {
        match &self.years {
            Some(years) => years.get(years.partition_point(|&y| y < year)).copied(),
            None if year > YEAR_UPPER_LIMIT => None,
            None => Some(year.max(YEAR_LOWER_LIMIT)),
        }
    }

    pub(crate) fn year_after(&self, year: i32) -> Option<i32> {
        self.year_at_or_after(year.checked_add(1)?)
    }

    /// Computes the days of the given month on which the schedule fires.
    ///
    /// When neither day-of-month nor day-of-week is restricted every day of
    /// the month qualifies. Otherwise the days produced by the restricted
    /// fields are unioned. The result is sorted and empty for a month that
    /// has no matching day or cannot be represented.
    pub fn actual_days(&self, year: i32, month: u32) -> Vec<u32> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };
        let Some(last) = last_day_of_month(first) else {
            return Vec::new();
        };

        let dom = &self.days_of_month;
        let dow = &self.days_of_week;
        if !dom.restricted && !dow.restricted {
            return (1..=last).collect();
        }

        let mut days = BTreeSet::new();
        if dom.restricted {
            days.extend(dom.days.iter().copied().filter(|&day| day <= last));
            days.extend(
                dom.workdays
                    .iter()
                    .filter(|&&day| day <= last)
                    .map(|&day| nearest_workday(first, day, last)),
            );
            if dom.last_day {
                days.insert(last);
            }
            if dom.last_workday {
                days.insert(nearest_workday(first, last, last));
            }
            if dom.last_nth_day > 0 {
                days.insert(last.saturating_sub(dom.last_nth_day).max(1));
            }
        }

        if dow.restricted {
            // Distance from the 1st to the first Sunday of the month
            let offset = (7 - weekday(first, 1)) % 7;
            let first_of = |weekday: u32| 1 + (offset + weekday) % 7;

            for &weekday in &dow.days {
                days.extend((first_of(weekday)..=last).step_by(7));
            }
            for &(week, weekday) in &dow.nth_days {
                let day = first_of(weekday) + 7 * (week - 1);
                if day <= last {
                    days.insert(day);
                }
            }

            // Anchor on the last seven days of the month
            let anchor = last - 6;
            let offset = (7 - weekday(first, anchor)) % 7;
            days.extend(
                dow.last_days
                    .iter()
                    .map(|&weekday| anchor + (offset + weekday) % 7),
            );
        }

        days.into_iter().collect()
    }

    /// Checks whether the civil fields of a moment satisfy the schedule.
    pub(crate) fn is_matching(
        &self,
        year: i32,
        month: u32,
        day: u32,
        (hour, minute, second): (u32, u32, u32),
    ) -> bool {
        self.year_at_or_after(year) == Some(year)
            && self.months.binary_search(&month).is_ok()
            && self.actual_days(year, month).binary_search(&day).is_ok()
            && self.hours.binary_search(&hour).is_ok()
            && self.minutes.binary_search(&minute).is_ok()
            && self.seconds.binary_search(&second).is_ok()
    }
}

// Weekday of `day` in the month starting at `first`, Sunday being 0.
fn weekday(first: NaiveDate, day: u32) -> u32 {
    (first.weekday().num_days_from_sunday() + day - 1) % 7
}

fn last_day_of_month(first: NaiveDate) -> Option<u32> {
    let next_month = first.checked_add_months(Months::new(1))?;
    Some(next_month.pred_opt()?.day())
}

// Weekend days move to the closest weekday without leaving the month.
fn nearest_workday(first: NaiveDate, day: u32, last: u32) -> u32 {
    match weekday(first, day) {
        6 if day > 1 => day - 1,
        6 => day + 2,
        0 if day < last => day + 1,
        0 => day - 2,
        _ => day,
    }
}

impl std::fmt::Display for CronPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

impl PartialEq for CronPattern {
    /// Checks for functional equality between two CronPattern instances.
    ///
    /// The original pattern string is ignored in this comparison.
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds
            && self.minutes == other.minutes
            && self.hours == other.hours
            && self.months == other.months
            && self.years == other.years
            && self.days_of_month == other.days_of_month
            && self.days_of_week == other.days_of_week
    }
}

impl Eq for CronPattern {}

impl Hash for CronPattern {
    /// Hashes the same fields `PartialEq` compares.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seconds.hash(state);
        self.minutes.hash(state);
        self.hours.hash(state);
        self.months.hash(state);
        self.years.hash(state);
        self.days_of_month.hash(state);
        self.days_of_week.hash(state);
    }
}
