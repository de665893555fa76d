//! Parser for cron expressions.
//!
//! [`Cron::parse`] and the [`FromStr`](std::str::FromStr) implementation of
//! [`Cron`] use a [`CronParser`] with default settings, so
//!
//! ```rust
//! # use cronexpr::{Cron, parser::CronParser};
//! #
//! let cron = Cron::parse("0 0 * * FRI");
//! ```
//!
//! is equivalent to
//!
//! ```rust
//! # use cronexpr::{Cron, parser::CronParser};
//! #
//! let cron = CronParser::new().parse("0 0 * * FRI");
//! ```
//!
//! A parser builder from [`CronParser::builder`] customises the parse. For
//! example, to read six field expressions as having a leading seconds field
//! even when the last field looks like a year:
//!
//! ```rust
//! use cronexpr::parser::{CronParser, SixFields};
//!
//! let parser = CronParser::builder()
//!     .six_fields(SixFields::SecondsFirst)
//!     .build();
//!
//! let every_ten_seconds = parser.parse("*/10 * * * * *").unwrap();
//! assert_eq!(every_ten_seconds.pattern.seconds(), &[0, 10, 20, 30, 40, 50]);
//! ```

use std::collections::BTreeSet;

use derive_builder::Builder;
use log::debug;
use strum::EnumIs;

use crate::{
    component::Field,
    directive::{self, DayOfMonthDirective, DayOfWeekDirective, Directive},
    errors::CronError,
    pattern::{CronPattern, DaysOfMonth, DaysOfWeek},
    Cron,
};

/// How an expression with six fields is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs)]
pub enum SixFields {
    /// The last field is a year when it parses as one (`*` included), otherwise
    /// the first field holds seconds.
    #[default]
    Auto,
    /// `second minute hour day-of-month month day-of-week`
    SecondsFirst,
    /// `minute hour day-of-month month day-of-week year`
    YearLast,
}

/// Parser for cron expressions.
///
/// In order to build a custom cron parser use [`CronParser::builder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Builder)]
#[builder(default, build_fn(skip), pattern = "owned")]
pub struct CronParser {
    /// Configure how six field expressions are read.
    six_fields: SixFields,
    /// Silently drop fields past the seventh instead of failing.
    ignore_extra_fields: bool,
}

/// Entries of one field, sorted by kind.
#[derive(Debug, Default)]
struct Entries<'a> {
    wildcard: bool,
    values: BTreeSet<u32>,
    unrecognized: Vec<&'a str>,
}

impl CronParser {
    /// Create a new parser.
    ///
    /// You should probably be using [`Cron::parse`] instead of invoking this.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a builder for custom parsing.
    ///
    /// Equivalent to [`CronParserBuilder::default`].
    pub fn builder() -> CronParserBuilder {
        CronParserBuilder::default()
    }

    /// Parses a cron expression.
    ///
    /// The expression has 5, 6 or 7 whitespace separated fields, or is one of
    /// the nicknames `@yearly`, `@annually`, `@monthly`, `@weekly`, `@daily`
    /// and `@hourly`.
    pub fn parse(&self, pattern: &str) -> Result<Cron, CronError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(CronError::EmptyPattern);
        }

        let expanded = Self::handle_nicknames(pattern);
        let mut parts: Vec<&str> = expanded.split_whitespace().collect();
        if parts.len() > 7 && self.ignore_extra_fields {
            parts.truncate(7);
        }

        let [second, minute, hour, day_of_month, month, day_of_week, year] = match parts[..] {
            [minute, hour, dom, month, dow] => ["0", minute, hour, dom, month, dow, "*"],
            [first, minute, hour, dom, month, last] if self.year_last(last) => {
                ["0", first, minute, hour, dom, month, last]
            }
            [second, minute, hour, dom, month, dow] => {
                [second, minute, hour, dom, month, dow, "*"]
            }
            [second, minute, hour, dom, month, dow, year] => {
                [second, minute, hour, dom, month, dow, year]
            }
            _ => return Err(CronError::FieldCount(parts.len())),
        };

        let pattern = CronPattern {
            pattern: pattern.to_string(),
            seconds: Self::values(Field::Second, second)?,
            minutes: Self::values(Field::Minute, minute)?,
            hours: Self::values(Field::Hour, hour)?,
            days_of_month: Self::days_of_month(day_of_month)?,
            months: Self::values(Field::Month, month)?,
            days_of_week: Self::days_of_week(day_of_week)?,
            years: Self::years(year)?,
        };
        debug!(
            "Parsed cron expression '{}' as '{} {} {} {} {} {} {}'",
            pattern, second, minute, hour, day_of_month, month, day_of_week, year
        );

        Ok(Cron { pattern })
    }

    fn year_last(&self, last: &str) -> bool {
        match self.six_fields {
            SixFields::Auto => Self::years(last).is_ok(),
            SixFields::SecondsFirst => false,
            SixFields::YearLast => true,
        }
    }

    // Converts named cron pattern shortcuts into their equivalent seven field pattern.
    fn handle_nicknames(pattern: &str) -> &str {
        let eq_ignore_case = |a: &str, b: &str| a.eq_ignore_ascii_case(b);

        match pattern {
            p if eq_ignore_case(p, "@yearly") || eq_ignore_case(p, "@annually") => "0 0 0 1 1 * *",
            p if eq_ignore_case(p, "@monthly") => "0 0 0 1 * * *",
            p if eq_ignore_case(p, "@weekly") => "0 0 0 * * 0 *",
            p if eq_ignore_case(p, "@daily") => "0 0 0 * * * *",
            p if eq_ignore_case(p, "@hourly") => "0 0 * * * * *",
            _ => pattern,
        }
    }

    fn entries(field: Field, text: &str) -> Result<Entries<'_>, CronError> {
        let mut entries = Entries::default();
        let mut seen = false;
        for entry in text.split(',').filter(|entry| !entry.is_empty()) {
            seen = true;
            match directive::match_entry(field, entry)? {
                Directive::Wildcard => entries.wildcard = true,
                Directive::Single(value) => {
                    entries.values.insert(field.normalize(value));
                }
                Directive::Span { first, last, step } => entries.values.extend(
                    (first..=last)
                        .step_by(step as usize)
                        .map(|value| field.normalize(value)),
                ),
                Directive::Unrecognized(token) => entries.unrecognized.push(token),
            }
        }
        if !seen {
            return Err(CronError::MissingDirective(field));
        }
        Ok(entries)
    }

    fn values(field: Field, text: &str) -> Result<Vec<u32>, CronError> {
        let entries = Self::entries(field, text)?;
        if let Some(token) = entries.unrecognized.first() {
            return Err(syntax_error(field, token));
        }
        if entries.wildcard {
            return Ok(field.defaults());
        }
        Ok(entries.values.into_iter().collect())
    }

    fn years(text: &str) -> Result<Option<Vec<i32>>, CronError> {
        let entries = Self::entries(Field::Year, text)?;
        if let Some(token) = entries.unrecognized.first() {
            return Err(syntax_error(Field::Year, token));
        }
        if entries.wildcard {
            return Ok(None);
        }
        // Year values are capped at 3999 by their syntax
        Ok(Some(entries.values.into_iter().map(|year| year as i32).collect()))
    }

    fn days_of_month(text: &str) -> Result<DaysOfMonth, CronError> {
        let entries = Self::entries(Field::DayOfMonth, text)?;
        let mut days = DaysOfMonth {
            restricted: !entries.wildcard,
            days: entries.values,
            ..DaysOfMonth::default()
        };
        for token in entries.unrecognized {
            match directive::match_day_of_month(token) {
                Some(DayOfMonthDirective::Last | DayOfMonthDirective::LastNth(0)) => {
                    days.last_day = true
                }
                Some(DayOfMonthDirective::LastWorkday) => days.last_workday = true,
                Some(DayOfMonthDirective::LastNth(n)) => days.last_nth_day = n,
                Some(DayOfMonthDirective::Workday(day)) => {
                    days.workdays.insert(day);
                }
                None => return Err(syntax_error(Field::DayOfMonth, token)),
            }
        }
        Ok(days)
    }

    fn days_of_week(text: &str) -> Result<DaysOfWeek, CronError> {
        let entries = Self::entries(Field::DayOfWeek, text)?;
        let mut days = DaysOfWeek {
            restricted: !entries.wildcard,
            days: entries.values,
            ..DaysOfWeek::default()
        };
        for token in entries.unrecognized {
            match directive::match_day_of_week(token) {
                Some(DayOfWeekDirective::Last(weekday)) => {
                    days.last_days.insert(weekday);
                }
                Some(DayOfWeekDirective::Nth { weekday, week }) => {
                    days.nth_days.insert((week, weekday));
                }
                None => return Err(syntax_error(Field::DayOfWeek, token)),
            }
        }
        Ok(days)
    }
}

impl CronParserBuilder {
    pub fn build(self) -> CronParser {
        let CronParserBuilder {
            six_fields,
            ignore_extra_fields,
        } = self;
        CronParser {
            six_fields: six_fields.unwrap_or_default(),
            ignore_extra_fields: ignore_extra_fields.unwrap_or_default(),
        }
    }
}

fn syntax_error(field: Field, token: &str) -> CronError {
    CronError::Syntax {
        field,
        token: token.to_string(),
    }
}
