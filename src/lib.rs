//! # cronexpr
//!
//! cronexpr parses cron expressions and computes the instants at which they fire,
//! for any `chrono` time zone.
//!
//! ## Features
//! - Five, six and seven field expressions, with optional seconds and years.
//! - Month and weekday names, `@yearly` style nicknames.
//! - Last day (`L`), nearest weekday (`15W`, `LW`), days before the end of the
//!   month (`L-3`), last weekday (`5L`) and nth weekday (`5#3`).
//! - Calendar correct search across month lengths, leap years and daylight saving
//!   transitions.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use cronexpr::Cron;
//!
//! // Midnight on the fifth Saturday of a month
//! let cron = Cron::parse("0 0 * * 6#5").expect("Successful parsing");
//!
//! let from = Utc.with_ymd_and_hms(2013, 9, 2, 8, 44, 30).unwrap();
//! let next = cron.next(&from).expect("A future occurrence");
//! assert_eq!(next, Utc.with_ymd_and_hms(2013, 11, 30, 0, 0, 0).unwrap());
//!
//! for time in cron.next_n(&from, 5) {
//!     println!("{time}");
//! }
//! ```
//!
//! ## Pattern
//!
//! ```text
//! ┌───────────── (optional) second (0 - 59)
//! │ ┌─────────── minute (0 - 59)
//! │ │ ┌───────── hour (0 - 23)
//! │ │ │ ┌─────── day of month (1 - 31)
//! │ │ │ │ ┌───── month (1 - 12, JAN-DEC)
//! │ │ │ │ │ ┌─── day of week (0 - 6, SUN-SAT, 7 is Sunday too)
//! │ │ │ │ │ │ ┌─ (optional) year (1970 - 3999)
//! │ │ │ │ │ │ │
//! * * * * * * *
//! ```
//!
//! | Field        | Allowed values      | Allowed special characters |
//! | ------------ | ------------------- | -------------------------- |
//! | Seconds      | 0-59                | * , - / ?                  |
//! | Minutes      | 0-59                | * , - / ?                  |
//! | Hours        | 0-23                | * , - / ?                  |
//! | Day of Month | 1-31                | * , - / ? L W              |
//! | Month        | 1-12 or JAN-DEC     | * , - / ?                  |
//! | Day of Week  | 0-7 or SUN-SAT      | * , - / ? L #              |
//! | Year         | 1970-3999           | * , - / ?                  |
//!
//! Five fields leave out seconds and year. Six fields leave out seconds when the
//! last field reads as a year and the year otherwise; see
//! [`parser::SixFields`] for other choices.
//!
//! When both day of month and day of week are restricted, a day matching either
//! of them qualifies.

mod component;
mod directive;
mod errors;
mod iterator;
mod occurrence;
pub mod parser;
mod pattern;

pub use component::Field;
pub use errors::CronError;
pub use iterator::CronIterator;
pub use pattern::{CronPattern, DaysOfMonth, DaysOfWeek};

use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Timelike};

use occurrence::Resolver;
use parser::CronParser;

/// First year a schedule can fire in.
pub const YEAR_LOWER_LIMIT: i32 = 1970;
/// Last year a schedule can fire in.
pub const YEAR_UPPER_LIMIT: i32 = 3999;

/// A parsed cron schedule.
///
/// Parsing is the only fallible step. Looking up occurrences never fails; a
/// schedule without further occurrences yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cron {
    pub pattern: CronPattern,
}

impl Cron {
    /// Parses a cron expression with the default [`CronParser`].
    ///
    /// ```
    /// use cronexpr::Cron;
    ///
    /// assert!(Cron::parse("30 3 15W 3/3 *").is_ok());
    /// assert!(Cron::parse("*/60 * * * *").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Cron, CronError> {
        CronParser::new().parse(pattern)
    }

    /// Parses a cron expression that is known to be valid.
    ///
    /// # Panics
    ///
    /// Panics when the expression does not parse.
    pub fn must_parse(pattern: &str) -> Cron {
        match Self::parse(pattern) {
            Ok(cron) => cron,
            Err(err) => panic!("invalid cron expression '{pattern}': {err}"),
        }
    }

    /// Finds the first occurrence strictly after `from`, in the time zone of
    /// `from`.
    ///
    /// Returns `None` when the schedule has no occurrence after `from`, for
    /// example when all of its years lie in the past.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use cronexpr::Cron;
    ///
    /// let cron = Cron::parse("0 0 L * *").unwrap();
    /// let from = Utc.with_ymd_and_hms(2014, 2, 1, 0, 0, 0).unwrap();
    /// assert_eq!(
    ///     cron.next(&from),
    ///     Some(Utc.with_ymd_and_hms(2014, 2, 28, 0, 0, 0).unwrap())
    /// );
    /// ```
    pub fn next<Tz: TimeZone>(&self, from: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        Resolver::new(&self.pattern, from.timezone()).next(from)
    }

    /// Collects up to `n` successive occurrences after `from`.
    ///
    /// Fewer than `n` are returned only if the schedule runs out.
    pub fn next_n<Tz: TimeZone>(&self, from: &DateTime<Tz>, n: usize) -> Vec<DateTime<Tz>> {
        self.iter_after(from.clone()).take(n).collect()
    }

    /// Creates a `CronIterator` over the occurrences after `start_after`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use cronexpr::Cron;
    ///
    /// let cron = Cron::parse("0 0 * * MON").unwrap();
    /// let start = Utc.with_ymd_and_hms(2013, 12, 30, 0, 30, 0).unwrap();
    ///
    /// let mondays: Vec<_> = cron.iter_after(start).take(2).collect();
    /// assert_eq!(mondays[0], Utc.with_ymd_and_hms(2014, 1, 6, 0, 0, 0).unwrap());
    /// assert_eq!(mondays[1], Utc.with_ymd_and_hms(2014, 1, 13, 0, 0, 0).unwrap());
    /// ```
    pub fn iter_after<Tz: TimeZone>(&self, start_after: DateTime<Tz>) -> CronIterator<Tz> {
        CronIterator::new(self.clone(), start_after)
    }

    /// Evaluates if a given `DateTime` matches the schedule.
    ///
    /// Fractions of a second are ignored.
    pub fn is_time_matching<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> bool {
        self.pattern.is_matching(
            time.year(),
            time.month(),
            time.day(),
            (time.hour(), time.minute(), time.second()),
        )
    }
}

impl FromStr for Cron {
    type Err = CronError;

    fn from_str(pattern: &str) -> Result<Cron, CronError> {
        Cron::parse(pattern)
    }
}

impl std::fmt::Display for Cron {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::Cron;

    impl Serialize for Cron {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.pattern.as_str())
        }
    }

    struct CronVisitor;

    impl Visitor<'_> for CronVisitor {
        type Value = Cron;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a cron expression")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Cron, E> {
            Cron::parse(value).map_err(E::custom)
        }
    }

    impl<'de> Deserialize<'de> for Cron {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_str(CronVisitor)
        }
    }
}
