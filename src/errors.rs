use thiserror::Error;

use crate::component::Field;

/// Represents errors that can occur while parsing cron expressions.
///
/// Resolving occurrences never fails, so every variant comes out of
/// [`Cron::parse`](crate::Cron::parse) or [`CronParser::parse`](crate::parser::CronParser::parse).
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum CronError {
    /// The expression was empty or consisted only of whitespace.
    #[error("cron expression is empty")]
    EmptyPattern,

    /// The expression did not have between 5 and 7 whitespace separated fields.
    #[error("expected 5 to 7 fields, found {0}")]
    FieldCount(usize),

    /// A field held nothing but commas.
    #[error("{0} field: missing directive")]
    MissingDirective(Field),

    /// An entry of a field matched none of the layouts accepted by that field.
    ///
    /// The token is reported as written in the expression.
    #[error("syntax error in {field} field: '{token}'")]
    Syntax { field: Field, token: String },

    /// A step was zero or larger than the maximum value of its field, as in `*/60`
    /// for minutes.
    #[error("invalid interval {0}")]
    InvalidInterval(String),

    /// A range started after it ended, as in `30-10`.
    #[error("invalid range in {field} field: '{token}'")]
    InvalidRange { field: Field, token: String },
}
