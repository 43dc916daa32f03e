use std::{env, fs::read_to_string};

fn main() {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "./tests/resources/ical_special_symbols.ics".to_owned());
    let buf = read_to_string(&path).unwrap();

    let reader = ical_codec::ContentLineParser::from_slice(buf.as_bytes());

    for line in reader {
        match line {
            Ok(prop) => println!("{:?} -> {:?}", prop, prop.validate()),
            Err(err) => println!("{err}"),
        }
    }
}
