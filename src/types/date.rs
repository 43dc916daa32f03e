use std::{fmt, str::FromStr};

use chrono::{
    DateTime, Datelike, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone, Timelike, Utc,
};
use derive_more::From;

use crate::{
    grammar,
    property::{
        Property,
        validate::PropertyValidationError,
        value_type::{ResolvedValueType, ValueType, explicit_value_type},
    },
};

const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CalDateTimeError {
    #[error("Invalid date: {0:?}")]
    InvalidDateFormat(String),
    #[error("Invalid date-time: {0:?}")]
    InvalidDateTimeFormat(String),
    #[error("Invalid month {0}")]
    InvalidMonth(u32),
    #[error("Invalid day {day} for {year:04}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[error("Invalid hour {0}")]
    InvalidHour(u32),
    #[error("Invalid minute {0}")]
    InvalidMinute(u32),
    #[error("Invalid second {0}")]
    InvalidSecond(u32),
    #[error("Year {0} is out of range 0..=9999")]
    YearOutOfRange(i32),
    #[error("Number must not be negative: {0}")]
    NegativeNumber(i64),
    #[error("Width must be at least 1")]
    ZeroWidth,
    #[error("Number {num} has more than {width} digits")]
    TooManyDigits { num: i64, width: usize },
    #[error("Illegal value type for date: {0}")]
    IllegalValueType(ResolvedValueType),
    #[error(transparent)]
    ValueParameter(#[from] PropertyValidationError),
}

fn check_year_range(year: i32) -> Result<(), CalDateTimeError> {
    if YEAR_RANGE.contains(&year) {
        Ok(())
    } else {
        Err(CalDateTimeError::YearOutOfRange(year))
    }
}

/// Left-pad a non-negative number with zeros to exactly `width` digits.
pub fn pad_zeros(num: i64, width: usize) -> Result<String, CalDateTimeError> {
    if num < 0 {
        return Err(CalDateTimeError::NegativeNumber(num));
    }
    if width == 0 {
        return Err(CalDateTimeError::ZeroWidth);
    }
    let digits = num.to_string();
    if digits.len() > width {
        return Err(CalDateTimeError::TooManyDigits { num, width });
    }
    Ok(format!("{digits:0>width$}"))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn checked_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, CalDateTimeError> {
    if !(1..=12).contains(&month) {
        return Err(CalDateTimeError::InvalidMonth(month));
    }
    if day == 0 || day > days_in_month(year, month) {
        return Err(CalDateTimeError::InvalidDay { year, month, day });
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(CalDateTimeError::InvalidDay { year, month, day })
}

fn checked_time(hour: u32, minute: u32, second: u32) -> Result<NaiveTime, CalDateTimeError> {
    if hour > 23 {
        return Err(CalDateTimeError::InvalidHour(hour));
    }
    if minute > 59 {
        return Err(CalDateTimeError::InvalidMinute(minute));
    }
    // leap seconds are not representable
    if second > 59 {
        return Err(CalDateTimeError::InvalidSecond(second));
    }
    NaiveTime::from_hms_opt(hour, minute, second).ok_or(CalDateTimeError::InvalidSecond(second))
}

// Captures of the DATE / DATE-TIME patterns are ASCII digits of bounded length.
fn number<T: FromStr>(caps: &regex::Captures, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

/// Parse a `YYYYMMDD` date.
pub fn parse_date_string(value: &str) -> Result<NaiveDate, CalDateTimeError> {
    let invalid = || CalDateTimeError::InvalidDateFormat(value.to_owned());
    let caps = grammar::DATE.captures(value).ok_or_else(invalid)?;
    let (Some(year), Some(month), Some(day)) = (number(&caps, 1), number(&caps, 2), number(&caps, 3))
    else {
        return Err(invalid());
    };
    checked_date(year, month, day)
}

/// Parse a `YYYYMMDDTHHMMSS[Z]` date-time into its wall-clock time and
/// whether it is in UTC.
pub(crate) fn parse_date_time_parts(value: &str) -> Result<(NaiveDateTime, bool), CalDateTimeError> {
    let invalid = || CalDateTimeError::InvalidDateTimeFormat(value.to_owned());
    let caps = grammar::DATE_TIME.captures(value).ok_or_else(invalid)?;
    let (Some(year), Some(month), Some(day), Some(hour), Some(minute), Some(second)) = (
        number(&caps, 1),
        number(&caps, 2),
        number(&caps, 3),
        number(&caps, 4),
        number(&caps, 5),
        number(&caps, 6),
    ) else {
        return Err(invalid());
    };
    let date = checked_date(year, month, day)?;
    let time = checked_time(hour, minute, second)?;
    Ok((date.and_time(time), caps.get(7).is_some()))
}

/// Parse a `YYYYMMDDTHHMMSS[Z]` date-time into an instant.
///
/// Without a trailing `Z` the value is interpreted in the local time zone.
pub fn parse_date_time_string(value: &str) -> Result<DateTime<Utc>, CalDateTimeError> {
    let (naive, utc) = parse_date_time_parts(value)?;
    Ok(if utc { naive.and_utc() } else { local_instant(&naive) })
}

/// The instant a local wall-clock time refers to. Times inside a DST gap are
/// resolved with the offset in effect just after the gap.
fn local_instant(naive: &NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            let offset = Local.offset_from_utc_datetime(naive).fix();
            (*naive - TimeDelta::seconds(i64::from(offset.local_minus_utc()))).and_utc()
        }
    }
}

/// `YYYYMMDD`
pub fn to_date_string(date: &impl Datelike) -> Result<String, CalDateTimeError> {
    Ok(format!(
        "{}{}{}",
        pad_zeros(i64::from(date.year()), 4)?,
        pad_zeros(i64::from(date.month()), 2)?,
        pad_zeros(i64::from(date.day()), 2)?
    ))
}

/// `HHMMSS`
pub fn to_time_string(time: &impl Timelike) -> Result<String, CalDateTimeError> {
    Ok(format!(
        "{}{}{}",
        pad_zeros(i64::from(time.hour()), 2)?,
        pad_zeros(i64::from(time.minute()), 2)?,
        pad_zeros(i64::from(time.second()), 2)?
    ))
}

/// `YYYYMMDDTHHMMSS`
pub fn to_date_time_string(date_time: &NaiveDateTime) -> Result<String, CalDateTimeError> {
    Ok(format!(
        "{}T{}",
        to_date_string(date_time)?,
        to_time_string(date_time)?
    ))
}

/// `YYYYMMDDTHHMMSSZ` of a wall-clock time whose UTC offset is
/// `offset_minutes` behind it, i.e. `UTC = local + offset_minutes`.
pub fn to_date_time_string_utc(
    local: &NaiveDateTime,
    offset_minutes: i64,
) -> Result<String, CalDateTimeError> {
    let utc = TimeDelta::try_minutes(offset_minutes)
        .and_then(|delta| local.checked_add_signed(delta))
        .ok_or(CalDateTimeError::YearOutOfRange(local.year()))?;
    Ok(format!("{}Z", to_date_time_string(&utc)?))
}

/// A date or date-time property value.
pub trait DateOrTime {
    /// The RFC 5545 text form.
    fn value(&self) -> String;
    fn underlying_instant(&self) -> DateTime<Utc>;
    fn is_full_day(&self) -> bool;

    /// A property carrying this value, tagged `VALUE=DATE` for full days.
    fn to_property(&self, name: &str) -> Property {
        let mut prop = Property::new(name, self.value());
        if self.is_full_day() {
            prop.set_value_type(ValueType::Date);
        }
        prop
    }
}

/// A full day, anchored at local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn parse(value: &str) -> Result<Self, CalDateTimeError> {
        Ok(Self(parse_date_string(value)?))
    }

    /// The local calendar day of an instant.
    pub fn from_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> Result<Self, CalDateTimeError> {
        instant.with_timezone(&Local).date_naive().try_into()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = CalDateTimeError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        check_year_range(date.year())?;
        Ok(Self(date))
    }
}

/// The local calendar day of a date-time.
impl TryFrom<&CalendarDateTime> for CalendarDate {
    type Error = CalDateTimeError;

    fn try_from(date_time: &CalendarDateTime) -> Result<Self, Self::Error> {
        if date_time.is_utc() {
            Self::from_instant(&date_time.underlying_instant())
        } else {
            Ok(Self(date_time.naive().date()))
        }
    }
}

impl DateOrTime for CalendarDate {
    fn value(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    fn underlying_instant(&self) -> DateTime<Utc> {
        local_instant(&self.0.and_time(NaiveTime::MIN))
    }

    fn is_full_day(&self) -> bool {
        true
    }
}

/// A date with time of day. The time is either UTC (written with a trailing
/// `Z`) or floating local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDateTime {
    naive: NaiveDateTime,
    utc: bool,
}

impl CalendarDateTime {
    pub fn parse(value: &str) -> Result<Self, CalDateTimeError> {
        let (naive, utc) = parse_date_time_parts(value)?;
        Ok(Self { naive, utc })
    }

    /// A UTC date-time at `instant`, truncated to whole seconds.
    pub fn from_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> Result<Self, CalDateTimeError> {
        let naive = instant.naive_utc();
        check_year_range(naive.year())?;
        Ok(Self {
            naive: naive.with_nanosecond(0).unwrap_or(naive),
            utc: true,
        })
    }

    /// A floating local date-time, truncated to whole seconds.
    pub fn from_local(naive: NaiveDateTime) -> Result<Self, CalDateTimeError> {
        check_year_range(naive.year())?;
        Ok(Self {
            naive: naive.with_nanosecond(0).unwrap_or(naive),
            utc: false,
        })
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.naive
    }

    pub fn is_utc(&self) -> bool {
        self.utc
    }
}

/// Midnight of the given day, as floating local time.
impl From<&CalendarDate> for CalendarDateTime {
    fn from(date: &CalendarDate) -> Self {
        Self {
            naive: date.0.and_time(NaiveTime::MIN),
            utc: false,
        }
    }
}

impl DateOrTime for CalendarDateTime {
    fn value(&self) -> String {
        let mut value = self.naive.format("%Y%m%dT%H%M%S").to_string();
        if self.utc {
            value.push('Z');
        }
        value
    }

    fn underlying_instant(&self) -> DateTime<Utc> {
        if self.utc {
            self.naive.and_utc()
        } else {
            local_instant(&self.naive)
        }
    }

    fn is_full_day(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From)]
pub enum CalDateOrDateTime {
    Date(CalendarDate),
    DateTime(CalendarDateTime),
}

impl CalDateOrDateTime {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Date(_) => ValueType::Date,
            Self::DateTime(_) => ValueType::DateTime,
        }
    }
}

impl DateOrTime for CalDateOrDateTime {
    fn value(&self) -> String {
        match self {
            Self::Date(date) => date.value(),
            Self::DateTime(date_time) => date_time.value(),
        }
    }

    fn underlying_instant(&self) -> DateTime<Utc> {
        match self {
            Self::Date(date) => date.underlying_instant(),
            Self::DateTime(date_time) => date_time.underlying_instant(),
        }
    }

    fn is_full_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

impl fmt::Display for CalDateOrDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

/// Interpret a property as a date or date-time. The `VALUE` parameter takes
/// precedence over `default_type`.
pub fn parse_date_property(
    property: &Property,
    default_type: ValueType,
) -> Result<CalDateOrDateTime, CalDateTimeError> {
    let value_type = explicit_value_type(property)?.unwrap_or(default_type.into());
    match value_type {
        ResolvedValueType::Known(ValueType::DateTime) => {
            Ok(CalendarDateTime::parse(&property.value)?.into())
        }
        ResolvedValueType::Known(ValueType::Date) => Ok(CalendarDate::parse(&property.value)?.into()),
        other => Err(CalDateTimeError::IllegalValueType(other)),
    }
}
