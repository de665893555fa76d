use strum::{Display, EnumIter};

use crate::{YEAR_LOWER_LIMIT, YEAR_UPPER_LIMIT};

/// Month names accepted in the month field, lower case.
pub const MONTH_NAMES: [(&str, u32); 23] = [
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// Weekday names accepted in the day-of-week field, lower case. Sunday is 0.
pub const WEEKDAY_NAMES: [(&str, u32); 14] = [
    ("sun", 0),
    ("mon", 1),
    ("tue", 2),
    ("wed", 3),
    ("thu", 4),
    ("fri", 5),
    ("sat", 6),
    ("sunday", 0),
    ("monday", 1),
    ("tuesday", 2),
    ("wednesday", 3),
    ("thursday", 4),
    ("friday", 5),
    ("saturday", 6),
];

/// One of the seven fields of a cron expression.
///
/// Each field knows its legal range, the syntax of a single value and how a
/// value token converts to a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Field {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl Field {
    pub fn min(self) -> u32 {
        match self {
            Field::Second | Field::Minute | Field::Hour | Field::DayOfWeek => 0,
            Field::DayOfMonth | Field::Month => 1,
            Field::Year => YEAR_LOWER_LIMIT as u32,
        }
    }

    pub fn max(self) -> u32 {
        match self {
            Field::Second | Field::Minute => 59,
            Field::Hour => 23,
            Field::DayOfMonth => 31,
            Field::Month => 12,
            Field::DayOfWeek => 6,
            Field::Year => YEAR_UPPER_LIMIT as u32,
        }
    }

    /// Every value of the field, ascending.
    pub fn defaults(self) -> Vec<u32> {
        (self.min()..=self.max()).collect()
    }

    /// Regular expression alternation matching a single value of this field,
    /// written for lower case input and without anchors.
    pub(crate) fn value_pattern(self) -> String {
        let numeric = match self {
            Field::Second | Field::Minute => "0?[0-9]|[1-5][0-9]",
            Field::Hour => "0?[0-9]|1[0-9]|2[0-3]",
            Field::DayOfMonth => "0?[1-9]|[12][0-9]|3[01]",
            Field::Month => "0?[1-9]|1[0-2]",
            Field::DayOfWeek => "0?[0-7]",
            Field::Year => "19[7-9][0-9]|2[0-9]{3}|3[0-9]{3}",
        };
        let names: &[(&str, u32)] = match self {
            Field::Month => &MONTH_NAMES,
            Field::DayOfWeek => &WEEKDAY_NAMES,
            _ => &[],
        };
        names.iter().fold(numeric.to_string(), |mut pattern, (name, _)| {
            pattern.push('|');
            pattern.push_str(name);
            pattern
        })
    }

    /// Converts a lower case value token to its number.
    ///
    /// Day-of-week keeps `7` as is; [`Field::normalize`] folds it onto Sunday.
    pub(crate) fn value_of(self, token: &str) -> Option<u32> {
        let names: &[(&str, u32)] = match self {
            Field::Month => &MONTH_NAMES,
            Field::DayOfWeek => &WEEKDAY_NAMES,
            _ => &[],
        };
        names
            .iter()
            .find(|(name, _)| *name == token)
            .map(|&(_, value)| value)
            .or_else(|| token.parse().ok())
    }

    pub(crate) fn normalize(self, value: u32) -> u32 {
        match self {
            Field::DayOfWeek => value % 7,
            _ => value,
        }
    }
}
