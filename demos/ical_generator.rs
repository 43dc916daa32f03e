use std::fs::read_to_string;

use ical_codec::{
    Component, Property,
    generator::Emitter,
    types::{CalendarDateTime, CalendarDuration, DateOrTime},
};

fn main() {
    let buf = read_to_string("./tests/resources/ical_events.ics").unwrap();
    let mut calendar = ical_codec::parse(&buf).unwrap();
    println!("{calendar:?}");

    let start = CalendarDateTime::parse("20251011T100000Z").unwrap();
    let mut event = Component::new("VEVENT");
    event.add_property(Property::new("UID", "generated@example.com"));
    event.add_property(start.to_property("DTSTAMP"));
    event.add_property(start.to_property("DTSTART"));
    event.add_property(CalendarDuration::from_seconds(5400).to_property("DURATION"));
    event.add_property(Property::new("SUMMARY", "Coffee, cake; and a chat"));
    calendar.add_component(event);

    if let Err(err) = calendar.validate() {
        eprintln!("{err}");
    }
    println!("{}", calendar.generate());
}
