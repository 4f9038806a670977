use crate::sorg::*;
use course_checking::*;
use serde_json::Value as JSValue;
use snafu::prelude::*;

// Numbers in hand-written JSON files arrive either as numbers or as quoted
// strings. Both spellings are accepted everywhere a number is expected.
pub fn read_js_u32(x: &JSValue) -> SorgResult<u32> {
    match x {
        JSValue::Number(n) => n
            .as_u64()
            .map(|v| v as u32)
            .context(ParsingJsonNumberSnafu {}),
        JSValue::String(s) => s.trim().parse::<u32>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}

/// Parses an optional time of day written as "HH:MM:SS" or "HH:MM:SS.fff".
pub fn opt_time(raw: &Option<String>) -> SorgResult<Option<OTime>> {
    match raw {
        None => Ok(None),
        Some(s) => match OTime::parse_hhmmss(s) {
            Some(t) => Ok(Some(t)),
            None => whatever!("cannot parse time of day {:?}", s),
        },
    }
}
