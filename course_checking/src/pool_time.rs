// Conversions between race times and the compact forms used for manual
// time entry: an integer keypad form and a `MM:SS.hh` string form.
// Minutes in the string form may exceed 59; resolution is hundredths.

use crate::otime::OTime;

/// Packs a time into the keypad integer form, truncating to hundredths:
/// `HMMSShh` read as hour, minute, second, hundredths.
pub fn otime_to_input(t: OTime) -> u64 {
    t.hour() * 1_000_000 + t.minute() * 10_000 + t.sec() * 100 + t.msec() / 10
}

/// Unpacks the keypad integer form. The inverse of [otime_to_input] up to
/// the lost millisecond digit.
pub fn input_to_otime(v: u64) -> OTime {
    let hour = v / 1_000_000;
    let minute = v % 1_000_000 / 10_000;
    let sec = v % 10_000 / 100;
    let msec = v % 100 * 10;
    OTime::new(hour, minute, sec, msec)
}

/// Renders the keypad integer form as `MM:SS.hh`, with hours folded into
/// the minutes.
pub fn input_to_str(v: u64) -> String {
    let t = input_to_otime(v);
    let minute = t.hour() * 60 + t.minute();
    let hundredths = t.msec() / 10;
    format!("{:02}:{:02}.{:02}", minute, t.sec(), hundredths)
}

/// Parses `MM:SS.hh` into a time. Overflowing minutes or seconds normalize,
/// so the output of [input_to_str] always parses back. Blank input is a zero
/// time; anything else unparseable is `None`.
pub fn parse_pool_time(s: &str) -> Option<OTime> {
    let s = s.trim();
    if s.is_empty() {
        return Some(OTime::ZERO);
    }
    let (minutes, rest) = s.split_once(':')?;
    let (sec, hundredths) = match rest.split_once('.') {
        Some((a, b)) => (a, b),
        None => (rest, "0"),
    };
    let minutes = parse_digits(minutes)?;
    let sec = parse_digits(sec)?;
    if hundredths.len() > 2 {
        return None;
    }
    let msec = parse_digits(hundredths)? * 10u64.pow(3 - hundredths.len() as u32);
    Some(OTime::new(0, minutes, sec, msec))
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok()
}
