use std::{fmt, str::FromStr};

use chrono::TimeDelta;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    grammar,
    property::{Property, value_type::ValueType},
    types::date::{CalDateOrDateTime, DateOrTime},
};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

lazy_static! {
    // Only applied to values already matching the DURATION grammar.
    static ref RE_DURATION_PARTS: Regex = Regex::new(
        r"^([+-])?P(?:([0-9]+)W)?(?:([0-9]+)D)?(?:T(?:([0-9]+)H)?(?:([0-9]+)M)?(?:([0-9]+)S)?)?$"
    )
    .unwrap();
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum InvalidDuration {
    #[error("{0} does not match pattern for DURATION")]
    Format(String),
    #[error("Duration component out of range: {0}")]
    Overflow(String),
    #[error("Start and end must both be dates or both be date-times")]
    MismatchedEndpoints,
    #[error("Start must not be after end")]
    StartAfterEnd,
}

/// A `DURATION` value (RFC 5545 §3.3.6): either weeks or any combination of
/// days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CalendarDuration {
    negative: bool,
    weeks: Option<u64>,
    days: Option<u64>,
    hours: Option<u64>,
    minutes: Option<u64>,
    seconds: Option<u64>,
}

impl CalendarDuration {
    pub fn parse(value: &str) -> Result<Self, InvalidDuration> {
        if !grammar::DURATION.is_match(value) {
            return Err(InvalidDuration::Format(value.to_owned()));
        }
        let caps = RE_DURATION_PARTS
            .captures(value)
            .ok_or_else(|| InvalidDuration::Format(value.to_owned()))?;
        let field = |group: usize| {
            caps.get(group)
                .map(|m| {
                    m.as_str()
                        .parse::<u64>()
                        .map_err(|_| InvalidDuration::Overflow(m.as_str().to_owned()))
                })
                .transpose()
        };
        Ok(Self {
            negative: caps.get(1).is_some_and(|sign| sign.as_str() == "-"),
            weeks: field(2)?,
            days: field(3)?,
            hours: field(4)?,
            minutes: field(5)?,
            seconds: field(6)?,
        })
    }

    pub fn from_weeks(weeks: u64) -> Self {
        Self {
            weeks: Some(weeks),
            ..Default::default()
        }
    }

    pub fn from_days(days: u64) -> Self {
        Self {
            days: Some(days),
            ..Default::default()
        }
    }

    /// Split a number of seconds into days, hours, minutes and seconds,
    /// keeping only the non-zero parts.
    pub fn from_seconds(seconds: u64) -> Self {
        if seconds == 0 {
            return Self {
                seconds: Some(0),
                ..Default::default()
            };
        }
        let non_zero = |n: u64| (n > 0).then_some(n);
        Self {
            negative: false,
            weeks: None,
            days: non_zero(seconds / SECONDS_PER_DAY),
            hours: non_zero(seconds % SECONDS_PER_DAY / SECONDS_PER_HOUR),
            minutes: non_zero(seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE),
            seconds: non_zero(seconds % SECONDS_PER_MINUTE),
        }
    }

    /// The duration from `start` to `end`: whole days between two dates,
    /// seconds between two date-times.
    pub fn from_difference(
        start: &CalDateOrDateTime,
        end: &CalDateOrDateTime,
    ) -> Result<Self, InvalidDuration> {
        match (start, end) {
            (CalDateOrDateTime::Date(start), CalDateOrDateTime::Date(end)) => {
                let days = (end.date() - start.date()).num_days();
                Ok(Self::from_days(
                    u64::try_from(days).map_err(|_| InvalidDuration::StartAfterEnd)?,
                ))
            }
            (CalDateOrDateTime::DateTime(_), CalDateOrDateTime::DateTime(_)) => {
                let seconds = (end.underlying_instant() - start.underlying_instant()).num_seconds();
                Ok(Self::from_seconds(
                    u64::try_from(seconds).map_err(|_| InvalidDuration::StartAfterEnd)?,
                ))
            }
            _ => Err(InvalidDuration::MismatchedEndpoints),
        }
    }

    #[must_use]
    pub fn negated(self) -> Self {
        Self {
            negative: !self.negative,
            ..self
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn weeks(&self) -> Option<u64> {
        self.weeks
    }

    pub fn days(&self) -> Option<u64> {
        self.days
    }

    pub fn hours(&self) -> Option<u64> {
        self.hours
    }

    pub fn minutes(&self) -> Option<u64> {
        self.minutes
    }

    pub fn seconds(&self) -> Option<u64> {
        self.seconds
    }

    fn magnitude(&self) -> u64 {
        [
            (self.weeks, SECONDS_PER_WEEK),
            (self.days, SECONDS_PER_DAY),
            (self.hours, SECONDS_PER_HOUR),
            (self.minutes, SECONDS_PER_MINUTE),
            (self.seconds, 1),
        ]
        .into_iter()
        .fold(0u64, |total, (count, unit)| {
            total.saturating_add(count.unwrap_or(0).saturating_mul(unit))
        })
    }

    /// Total length in seconds, negative for negative durations.
    pub fn in_seconds(&self) -> i64 {
        let magnitude = i64::try_from(self.magnitude()).unwrap_or(i64::MAX);
        if self.negative { -magnitude } else { magnitude }
    }

    pub fn in_milliseconds(&self) -> i64 {
        self.in_seconds().saturating_mul(1000)
    }

    /// The minimal canonical text form.
    pub fn value(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        match self.weeks {
            Some(weeks) => format!("{sign}{}", to_week_duration_string(weeks)),
            None => format!("{sign}{}", to_duration_string(self.magnitude())),
        }
    }

    pub fn to_property(&self, name: &str) -> Property {
        let mut prop = Property::new(name, self.value());
        if crate::property::value_type::default_value_type(name) != ValueType::Duration {
            prop.set_value_type(ValueType::Duration);
        }
        prop
    }
}

impl FromStr for CalendarDuration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CalendarDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

impl From<&CalendarDuration> for TimeDelta {
    fn from(duration: &CalendarDuration) -> Self {
        TimeDelta::try_seconds(duration.in_seconds()).unwrap_or(TimeDelta::MAX)
    }
}

/// Format a number of seconds as `PnDTnHnMnS`, omitting zero parts.
///
/// A minute part is kept between hours and seconds so the result still
/// matches the DURATION grammar. Zero is `PT0S`.
pub fn to_duration_string(seconds: u64) -> String {
    let days = seconds / SECONDS_PER_DAY;
    let hours = seconds % SECONDS_PER_DAY / SECONDS_PER_HOUR;
    let minutes = seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;
    let secs = seconds % SECONDS_PER_MINUTE;

    let mut out = String::from("P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || secs > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 || (hours > 0 && secs > 0) {
            out.push_str(&format!("{minutes}M"));
        }
        if secs > 0 {
            out.push_str(&format!("{secs}S"));
        }
    }
    if out == "P" {
        out.push_str("T0S");
    }
    out
}

/// `PnD`
pub fn to_day_duration_string(days: u64) -> String {
    format!("P{days}D")
}

/// `PnW`
pub fn to_week_duration_string(weeks: u64) -> String {
    format!("P{weeks}W")
}
