use ical_codec::LineReader;
use std::borrow::Cow;

// Simple function for sorting properties and components
// to allow for order-invariant comparison of Emitter outputs
pub fn lines_normalise_prop_order<'a>(
    line_iter: &mut impl Iterator<Item = Cow<'a, str>>,
    header: Option<Cow<'a, str>>,
) -> Vec<Cow<'a, str>> {
    let mut props = vec![];
    let mut comps = vec![];
    let mut end = None;
    while let Some(line) = line_iter.next() {
        if line.to_uppercase().starts_with("BEGIN:") {
            comps.push(lines_normalise_prop_order(line_iter, Some(line)));
        } else if line.to_uppercase().starts_with("END:") {
            end = Some(line);
            break;
        } else {
            props.push(line);
        }
    }
    assert_eq!(header.is_some(), end.is_some());
    props.sort();

    [
        header.map(|hdr| vec![hdr]).unwrap_or_default(),
        props,
        comps.into_iter().flatten().collect(),
        end.map(|end| vec![end]).unwrap_or_default(),
    ]
    .concat()
}

pub fn str_normalise_prop_order(input: &str) -> String {
    let mut lines = LineReader::from_slice(input.as_bytes()).map(|line| line.unwrap().inner);
    let sorted = lines_normalise_prop_order(&mut lines, None);
    sorted.join("\r\n") + "\r\n"
}

pub mod sort_lines {
    use crate::{lines_normalise_prop_order, str_normalise_prop_order};
    use ical_codec::{ComponentKind, LineReader, generator::Emitter};
    use itertools::Itertools;

    #[test]
    fn test_sort_output_lines() {
        let lines = vec![
            "a",
            "c",
            "b",
            "begin:event",
            "d",
            "a",
            "begin:alarm",
            "g",
            "f",
            "end:alarm",
            "end:event",
            "begin:event",
            "p",
            "a",
            "end:event",
            "d",
        ];
        let input = lines.join("\r\n") + "\r\n";
        let mut lines = LineReader::from_slice(input.as_bytes()).map(|line| line.unwrap().inner);
        let sorted = lines_normalise_prop_order(&mut lines, None);
        assert_eq!(
            sorted.iter().collect_vec(),
            vec![
                "a",
                "b",
                "c",
                "d",
                "begin:event",
                "a",
                "d",
                "begin:alarm",
                "f",
                "g",
                "end:alarm",
                "end:event",
                "begin:event",
                "a",
                "p",
                "end:event",
            ]
        );
    }

    #[test]
    fn property_order_does_not_matter() {
        let input = include_str!("./resources/ical_events.ics");
        let mut calendar = ical_codec::parse(input).unwrap();
        for event in calendar
            .components
            .iter_mut()
            .filter(|comp| comp.kind() == ComponentKind::Event)
        {
            event.properties.reverse();
        }
        similar_asserts::assert_eq!(
            str_normalise_prop_order(&calendar.generate()),
            str_normalise_prop_order(input)
        );
    }
}

pub mod line {
    use ical_codec::LineReader;
    use itertools::Itertools;
    use rstest::rstest;

    #[test]
    fn multioctet_line_wrapping() {
        let input = b"\xc3\r\n \xbc";
        let line = LineReader::from_slice(input.as_slice())
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(line.as_str(), "ü");
    }

    #[rstest]
    #[case(b"\xc3\r\n \x00")]
    #[case(b"\xc3\r\n ")]
    #[case(b"\xc3 \r\n \xbc")]
    #[case(b"\xc3 \r\n \n\xbc")]
    fn invalid_lines(#[case] input: &[u8]) {
        assert!(LineReader::from_slice(input).next().unwrap().is_err());
    }

    #[test]
    fn folded_lines_are_joined() {
        let input = include_bytes!("./resources/ical_events.ics");
        let lines = LineReader::from_slice(input.as_slice())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let description = lines
            .iter()
            .find(|line| line.as_str().starts_with("DESCRIPTION:Project"))
            .unwrap();
        assert_eq!(description.number(), 20);
        assert_eq!(
            description.as_str(),
            "DESCRIPTION:Project XYZ Review Meeting will include the following agenda items: (a) Market Overview\\, (b) Finances\\, (c) Project Management"
        );
        assert_eq!(lines.len(), 36);
        assert!(lines.iter().all(|line| !line.as_str().contains("\r\n")));
    }

    #[test]
    fn lenient_and_strict_line_endings() {
        let crlf = include_bytes!("./resources/ical_events.ics");
        let lf = include_bytes!("./resources/ical_events_lf.ics");
        let read = |input: &[u8]| {
            LineReader::from_slice(input)
                .map(|line| line.unwrap().inner.into_owned())
                .collect_vec()
        };
        similar_asserts::assert_eq!(read(crlf.as_slice()), read(lf.as_slice()));

        assert!(
            LineReader::from_slice(lf.as_slice())
                .strict(true)
                .any(|line| line.is_err())
        );
        assert!(
            LineReader::from_slice(crlf.as_slice())
                .strict(true)
                .all(|line| line.is_ok())
        );
    }
}

pub mod property {
    use ical_codec::{
        ContentLineParser, Property,
        generator::Emitter,
        property::value_type::{ResolvedValueType, ValueType},
    };

    #[test]
    fn ical() {
        let input = include_str!("./resources/ical_special_symbols.ics");
        let props = ContentLineParser::from_slice(input.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let comment = props.iter().find(|prop| prop.name() == "COMMENT").unwrap();
        assert_eq!(comment.value, "semicolons; commas, colons: all kept");
        assert_eq!(comment.params().get("X-PARAM").unwrap(), ["a;b,c", "plain"]);
        assert_eq!(comment.params().get("X-EMPTY").unwrap(), [""]);

        let location = props.iter().find(|prop| prop.name() == "LOCATION").unwrap();
        assert_eq!(
            location.params().get_param("ALTREP"),
            Some("http://example.com/conf-rooms/f123.vcf")
        );
        assert_eq!(location.value, "Conference Room - F123, Bldg. 002");
    }

    #[test]
    fn errors() {
        let input = include_str!("./resources/property_error.ics");
        let reader = ContentLineParser::from_slice(input.as_bytes());
        let mut count = 0;
        for res in reader {
            assert!(res.is_err());
            count += 1;
        }
        assert_eq!(count, 9);
    }

    #[test]
    fn folded_property() {
        let prop = ical_codec::deserialize_property(
            "DESCRIPTION;LANGUAGE=en:This line is just over 75 octets. In fact it is ac\r\n tually 80 octets.",
        )
        .unwrap();
        assert_eq!(prop.name(), "DESCRIPTION");
        assert_eq!(prop.params().get_param("LANGUAGE"), Some("en"));
        assert_eq!(
            prop.value,
            "This line is just over 75 octets. In fact it is actually 80 octets."
        );
    }

    #[test]
    fn property_roundtrip() {
        let line = "ATTENDEE;ROLE=REQ-PARTICIPANT;DELEGATED-FROM=\"mailto:bob@example.com\";PARTS\r\n TAT=ACCEPTED;CN=Jane Doe:mailto:jdoe@example.com\r\n";
        let prop = Property::parse(line).unwrap();
        assert_eq!(
            prop.value_type().unwrap(),
            ResolvedValueType::Known(ValueType::CalAddress)
        );
        assert_eq!(prop.generate(), line);
    }
}

pub mod parser {
    use ical_codec::{
        Component, ComponentKind, ParserError, ParserOptions, Property,
        generator::Emitter,
        types::{CalendarDate, CalendarDateTime, DateOrTime},
    };
    use rstest::rstest;

    #[rstest]
    #[case(include_str!("./resources/ical_events.ics"))]
    #[case(include_str!("./resources/ical_timezone.ics"))]
    #[case(include_str!("./resources/ical_special_symbols.ics"))]
    fn roundtrip(#[case] input: &str) {
        let calendar = ical_codec::parse(input).unwrap();
        similar_asserts::assert_eq!(calendar.generate(), input);
        assert_eq!(ical_codec::parse(&calendar.generate()).unwrap(), calendar);
    }

    #[test_log::test]
    fn resources_are_valid() {
        let options = ParserOptions {
            strict_line_endings: true,
            validate: true,
        };
        for input in [
            include_str!("./resources/ical_events.ics"),
            include_str!("./resources/ical_timezone.ics"),
            include_str!("./resources/ical_special_symbols.ics"),
        ] {
            ical_codec::parse_with_options(input, options.clone()).unwrap();
        }
    }

    #[test]
    fn lenient_input_gives_same_tree() {
        let crlf = ical_codec::parse(include_str!("./resources/ical_events.ics")).unwrap();
        let lf = ical_codec::parse(include_str!("./resources/ical_events_lf.ics")).unwrap();
        assert_eq!(lf, crlf);
    }

    #[test]
    fn calendar_with_event() {
        let input = "BEGIN:VCALENDAR\r\nPRODID:-//Example Corp.//CalDAV Client//EN\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:abc123\r\nSUMMARY:This is a summary\r\nDTSTAMP:20251011T123456\r\nDTSTART;VALUE=DATE:20251011\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let calendar = ical_codec::parse(input).unwrap();

        let mut event = Component::new("VEVENT");
        event.add_property(Property::new("UID", "abc123"));
        event.add_property(Property::new("SUMMARY", "This is a summary"));
        event.add_property(
            CalendarDateTime::parse("20251011T123456")
                .unwrap()
                .to_property("DTSTAMP"),
        );
        event.add_property(CalendarDate::parse("20251011").unwrap().to_property("DTSTART"));
        let mut expected = Component::new("VCALENDAR");
        expected.add_property(Property::new(
            "PRODID",
            "-//Example Corp.//CalDAV Client//EN",
        ));
        expected.add_property(Property::new("VERSION", "2.0"));
        expected.add_component(event);

        assert_eq!(calendar, expected);
        assert_eq!(calendar.kind(), ComponentKind::Calendar);
        assert_eq!(calendar.validate(), Ok(()));
        similar_asserts::assert_eq!(ical_codec::serialize(&calendar), input);
    }

    #[test]
    fn empty_component() {
        let component = ical_codec::parse("BEGIN:X-COMPONENT\nEND:X-COMPONENT").unwrap();
        assert_eq!(component, Component::new("X-COMPONENT"));
        assert_eq!(component.kind(), ComponentKind::Other);
    }

    #[test]
    fn unescapes_commas() {
        let component =
            ical_codec::parse("BEGIN:X-COMPONENT\r\nX-PROP:value\\,with\\, commas\r\nEND:X-COMPONENT\r\n")
                .unwrap();
        assert_eq!(
            component.get_property("X-PROP").unwrap().value,
            "value,with, commas"
        );
    }

    #[rstest]
    #[case("BEGIN:A\r\nBEGIN:B\r\nEND:A\r\nEND:B\r\n")]
    #[case("BEGIN:A\r\nEND:B\r\n")]
    #[case("BEGIN:A\r\nBEGIN:B\r\nEND:B\r\n")]
    #[case("END:A\r\n")]
    #[case("BEGIN:A\r\nEND:A\r\nEND:A\r\n")]
    #[case("BEGIN:A\r\nEND:A\r\nBEGIN:B\r\nEND:B\r\n")]
    fn nesting_errors(#[case] input: &str) {
        assert!(ical_codec::parse(input).is_err());
    }

    #[test]
    fn error_messages() {
        let err = ical_codec::parse("BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\n").unwrap_err();
        insta::assert_snapshot!(err, @"component has no end");
        let err = ical_codec::parse("BEGIN:VCALENDAR\r\nSUMMARY;LANG=\"en:x\r\nEND:VCALENDAR\r\n")
            .unwrap_err();
        insta::assert_snapshot!(err, @"content line error: Line 2: Missing a closing quote.");
        let err = ical_codec::parse("BEGIN:VCALENDAR\r\nEND:VEVENT\r\n").unwrap_err();
        insta::assert_snapshot!(err, @"Line 2: malformed nesting, expected END:VCALENDAR but found END:VEVENT");
    }

    #[test]
    fn binary_dtstart_is_rejected() {
        let input = "BEGIN:VEVENT\r\nUID:1\r\nDTSTAMP:20250729T120000Z\r\nDTSTART;VALUE=BINARY:20250729T120000Z\r\nEND:VEVENT\r\n";
        let options = ParserOptions {
            validate: true,
            ..Default::default()
        };
        let err = ical_codec::parse_with_options(input, options).unwrap_err();
        insta::assert_snapshot!(err, @"validation error: VEVENT: Property DTSTART has unsupported value type BINARY, must be one of DATE-TIME, DATE");
        assert!(matches!(err, ParserError::Validation(_)));
    }

    #[rstest]
    #[case("CN", "Doe\nJane")]
    #[case("CN", "Doe\r\nJane")]
    #[case("CN", "\u{1b}[31m")]
    #[case("CN", "say \"hi\"")]
    #[case("A B", "x")]
    #[case("X-KEY;Y", "x")]
    fn unserializable_parameters_are_rejected(#[case] name: &str, #[case] value: &str) {
        let mut prop = Property::new("ATTENDEE", "mailto:a@example.com");
        assert!(prop.params_mut().insert(name, [value]).is_err());
        assert!(prop.params().is_empty());
        let text = format!("BEGIN:VCALENDAR\r\n{}END:VCALENDAR\r\n", prop.generate());
        assert!(ical_codec::parse(&text).is_ok());
    }

    #[test]
    fn non_text_values_roundtrip() {
        let mut event = Component::new("VEVENT");
        event.add_property(Property::new("URL", "http://example.com/a\\b"));
        event.add_property(Property::new("RRULE", "FREQ=WEEKLY;BYDAY=MO,TU"));
        let mut note = Property::new("X-NOTE", "line1\nline2\\");
        note.params_mut().insert("VALUE", ["X-BLOB"]).unwrap();
        event.add_property(note);
        let mut calendar = Component::new("VCALENDAR");
        calendar.add_component(event);

        let reparsed = ical_codec::parse(&calendar.generate()).unwrap();
        assert_eq!(reparsed, calendar);
    }

    #[test]
    fn mutate_and_serialize() {
        let mut calendar = ical_codec::parse(include_str!("./resources/ical_events.ics")).unwrap();
        let event = &mut calendar.components[0];
        event.set_property(Property::new("SUMMARY", "Rescheduled; again, sorry"));
        event.remove_property("ATTENDEE");
        let alarm = event.components[0].clone();
        assert!(event.remove_component(&alarm));

        let reparsed = ical_codec::parse(&calendar.generate()).unwrap();
        let event = &reparsed.components[0];
        assert_eq!(
            event.get_property("SUMMARY").unwrap().value,
            "Rescheduled; again, sorry"
        );
        assert!(!event.has_property("ATTENDEE"));
        assert!(event.components.is_empty());
    }
}

pub mod proptests {
    use ical_codec::{Component, Property, generator::Emitter};
    use proptest::{collection::vec, prelude::*};

    const COMPONENT_NAME: &str = "[A-Z][A-Z0-9-]{0,10}";

    fn property_name() -> impl Strategy<Value = String> {
        prop_oneof![
            "X-[A-Z]{1,8}",
            prop::sample::select(vec![
                "DESCRIPTION",
                "DTSTART",
                "DURATION",
                "GEO",
                "RRULE",
                "URL",
                "ATTENDEE",
                "TZOFFSETFROM",
            ])
            .prop_map(str::to_owned),
        ]
    }

    fn value_param() -> impl Strategy<Value = Option<String>> {
        prop::option::of(
            prop_oneof![
                prop::sample::select(vec!["TEXT", "URI", "DATE", "RECUR", "BINARY"]),
                prop::sample::select(vec!["X-BLOB", "X-CUSTOM"]),
            ]
            .prop_map(str::to_owned),
        )
    }

    fn property() -> impl Strategy<Value = Property> {
        (
            property_name(),
            value_param(),
            "(?:[^\\p{Cc}]|\n){0,120}",
            vec(("X-[A-Z]{1,6}", vec("[^\"\\p{Cc}]{0,20}", 1..3)), 0..3),
        )
            .prop_map(|(name, value_type, value, params)| {
                let mut prop = Property::new(&name, value);
                if let Some(value_type) = value_type {
                    prop.params_mut().insert("VALUE", [value_type]).unwrap();
                }
                for (key, values) in params {
                    prop.params_mut().insert(&key, values).unwrap();
                }
                prop
            })
    }

    fn build(name: &str, properties: Vec<Property>, components: Vec<Component>) -> Component {
        let mut component = Component::new(name);
        component.properties = properties;
        component.components = components;
        component
    }

    fn component() -> impl Strategy<Value = Component> {
        let leaf = (COMPONENT_NAME, vec(property(), 0..5))
            .prop_map(|(name, properties)| build(&name, properties, vec![]));
        leaf.prop_recursive(3, 24, 4, |inner| {
            (COMPONENT_NAME, vec(property(), 0..5), vec(inner, 0..4))
                .prop_map(|(name, properties, components)| build(&name, properties, components))
        })
    }

    proptest! {
        #[test]
        fn document_roundtrip(component in component()) {
            let text = component.generate();
            prop_assert_eq!(ical_codec::parse(&text).unwrap(), component);
        }

        #[test]
        fn physical_lines_fit(component in component()) {
            let text = component.generate();
            prop_assert!(text.ends_with("\r\n"));
            for line in text.trim_end_matches("\r\n").split("\r\n") {
                prop_assert!(line.len() <= 75);
            }
        }
    }
}
