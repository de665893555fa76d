//! Classification of the comma separated entries of a field.
//!
//! Every field accepts the same six layouts: `*` (or `?`), `a`, `a-b`, `*/n`,
//! `a/n` and `a-b/n`. What counts as a value differs per [`Field`], so each field
//! gets its own set of compiled layouts. The patterns are built once, on first
//! use, and shared by every parse afterwards.
//!
//! Entries that fit none of the layouts come back as
//! [`Directive::Unrecognized`]. Day-of-month and day-of-week then try their
//! extended forms on them ([`DayOfMonthDirective`], [`DayOfWeekDirective`]).

use std::sync::LazyLock;

use regex::{Captures, Regex};
use strum::IntoEnumIterator;

use crate::{component::Field, errors::CronError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Directive<'a> {
    Wildcard,
    Single(u32),
    /// Inclusive range walked with `step`.
    Span {
        first: u32,
        last: u32,
        step: u32,
    },
    Unrecognized(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayOfMonthDirective {
    /// `L`
    Last,
    /// `LW`
    LastWorkday,
    /// `L-n`
    LastNth(u32),
    /// `nW`
    Workday(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayOfWeekDirective {
    /// `nL`, the last given weekday of the month.
    Last(u32),
    /// `n#w`, the w-th given weekday of the month.
    Nth { weekday: u32, week: u32 },
}

struct Layouts {
    value: Regex,
    range: Regex,
    wildcard_step: Regex,
    value_step: Regex,
    range_step: Regex,
}

impl Layouts {
    fn compile(field: Field) -> Self {
        let value = field.value_pattern();
        Self {
            value: compile(&format!("^({value})$")),
            range: compile(&format!("^({value})-({value})$")),
            wildcard_step: compile(r"^\*/(\d+)$"),
            value_step: compile(&format!(r"^({value})/(\d+)$")),
            range_step: compile(&format!(r"^({value})-({value})/(\d+)$")),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("cron field layouts are valid regular expressions")
}

// Indexed by field, in declaration order.
static LAYOUTS: LazyLock<Vec<Layouts>> =
    LazyLock::new(|| Field::iter().map(Layouts::compile).collect());

static LAST_NTH_DAY: LazyLock<Regex> = LazyLock::new(|| compile(r"^l-(\d{1,2})$"));
static WORKDAY: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!("^({})w$", Field::DayOfMonth.value_pattern()))
});
static LAST_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!("^({})l$", Field::DayOfWeek.value_pattern()))
});
static NTH_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!("^({})#([1-5])$", Field::DayOfWeek.value_pattern()))
});

/// Classifies one entry of `field`. Matching ignores ASCII case.
pub(crate) fn match_entry(field: Field, entry: &str) -> Result<Directive<'_>, CronError> {
    let token = entry.to_ascii_lowercase();
    if token == "*" || token == "?" {
        return Ok(Directive::Wildcard);
    }

    let layouts = &LAYOUTS[field as usize];
    let value = |caps: &Captures, group: usize| {
        field
            .value_of(&caps[group])
            .ok_or_else(|| syntax_error(field, entry))
    };
    let step = |caps: &Captures, group: usize| match caps[group].parse::<u32>() {
        Ok(step) if (1..=field.max()).contains(&step) => Ok(step),
        _ => Err(CronError::InvalidInterval(entry.to_string())),
    };

    if let Some(caps) = layouts.value.captures(&token) {
        return Ok(Directive::Single(value(&caps, 1)?));
    }
    if let Some(caps) = layouts.range.captures(&token) {
        return span(field, entry, value(&caps, 1)?, value(&caps, 2)?, 1);
    }
    if let Some(caps) = layouts.wildcard_step.captures(&token) {
        return span(field, entry, field.min(), field.max(), step(&caps, 1)?);
    }
    if let Some(caps) = layouts.value_step.captures(&token) {
        return span(field, entry, value(&caps, 1)?, field.max(), step(&caps, 2)?);
    }
    if let Some(caps) = layouts.range_step.captures(&token) {
        return span(
            field,
            entry,
            value(&caps, 1)?,
            value(&caps, 2)?,
            step(&caps, 3)?,
        );
    }
    Ok(Directive::Unrecognized(entry))
}

fn span(
    field: Field,
    entry: &str,
    first: u32,
    last: u32,
    step: u32,
) -> Result<Directive<'_>, CronError> {
    // sat-sun and 5-0 end the week on Sunday
    let last = match field {
        Field::DayOfWeek if last == 0 && first > 0 => 7,
        _ => last,
    };
    if first > last {
        return Err(CronError::InvalidRange {
            field,
            token: entry.to_string(),
        });
    }
    Ok(Directive::Span { first, last, step })
}

pub(crate) fn match_day_of_month(entry: &str) -> Option<DayOfMonthDirective> {
    let token = entry.to_ascii_lowercase();
    match token.as_str() {
        "l" => return Some(DayOfMonthDirective::Last),
        "lw" => return Some(DayOfMonthDirective::LastWorkday),
        _ => {}
    }
    if let Some(caps) = LAST_NTH_DAY.captures(&token) {
        return caps[1].parse().ok().map(DayOfMonthDirective::LastNth);
    }
    let caps = WORKDAY.captures(&token)?;
    Field::DayOfMonth
        .value_of(&caps[1])
        .map(DayOfMonthDirective::Workday)
}

pub(crate) fn match_day_of_week(entry: &str) -> Option<DayOfWeekDirective> {
    let token = entry.to_ascii_lowercase();
    let weekday = |caps: &Captures| {
        Field::DayOfWeek
            .value_of(&caps[1])
            .map(|value| Field::DayOfWeek.normalize(value))
    };
    if let Some(caps) = LAST_WEEKDAY.captures(&token) {
        return weekday(&caps).map(DayOfWeekDirective::Last);
    }
    let caps = NTH_WEEKDAY.captures(&token)?;
    Some(DayOfWeekDirective::Nth {
        weekday: weekday(&caps)?,
        week: caps[2].parse().ok()?,
    })
}

fn syntax_error(field: Field, entry: &str) -> CronError {
    CronError::Syntax {
        field,
        token: entry.to_string(),
    }
}
