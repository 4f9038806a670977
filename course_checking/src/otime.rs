use std::fmt::Display;

/// A time of day with millisecond resolution, as read from punching stations
/// or entered by an operator.
///
/// Stored as total milliseconds. Components passed to [OTime::new] normalize:
/// 62 minutes fold into 1 hour and 2 minutes. A zero time means "no time"
/// wherever an optional time is involved.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Default)]
pub struct OTime(u64);

impl OTime {
    pub const ZERO: OTime = OTime(0);

    pub fn new(hour: u64, minute: u64, sec: u64, msec: u64) -> OTime {
        OTime(((hour * 60 + minute) * 60 + sec) * 1000 + msec)
    }

    pub fn from_msec(msec: u64) -> OTime {
        OTime(msec)
    }

    pub fn to_msec(self) -> u64 {
        self.0
    }

    pub fn hour(self) -> u64 {
        self.0 / 3_600_000
    }

    pub fn minute(self) -> u64 {
        self.0 % 3_600_000 / 60_000
    }

    pub fn sec(self) -> u64 {
        self.0 % 60_000 / 1000
    }

    pub fn msec(self) -> u64 {
        self.0 % 1000
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parses `HH:MM:SS` with an optional `.mmm` fraction. Fractions longer
    /// than three digits truncate to milliseconds.
    pub fn parse_hhmmss(s: &str) -> Option<OTime> {
        let s = s.trim();
        let (hms, frac) = match s.split_once('.') {
            Some((a, b)) => (a, Some(b)),
            None => (s, None),
        };
        let mut parts = hms.split(':');
        let hour = parts.next()?.parse::<u64>().ok()?;
        let minute = parts.next()?.parse::<u64>().ok()?;
        let sec = parts.next()?.parse::<u64>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        let msec = match frac {
            None => 0,
            Some(f) => {
                if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let digits = &f[..f.len().min(3)];
                let v = digits.parse::<u64>().ok()?;
                v * 10u64.pow(3 - digits.len() as u32)
            }
        };
        Some(OTime::new(hour, minute, sec, msec))
    }
}

impl Display for OTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.sec()
        )
    }
}
