pub mod date;
pub mod duration;
pub mod geo;

pub use date::{
    CalDateOrDateTime, CalDateTimeError, CalendarDate, CalendarDateTime, DateOrTime,
    parse_date_property, pad_zeros,
};
pub use duration::{CalendarDuration, InvalidDuration};
pub use geo::{Geo, InvalidGeo};
