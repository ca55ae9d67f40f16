use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use std::fmt;
use std::str::FromStr;

/// Datetime format used by the ERP: UTC, no offset marker.
pub const ERP_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats accepted for local timestamps sent by clients.
const LOCAL_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ===============================
/// Deployment-wide civil time zone
/// ===============================
///
/// Every conversion between the caller's wall-clock time and the ERP's UTC
/// storage goes through one fixed offset configured for the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalZone {
    offset: FixedOffset,
}

impl LocalZone {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Local wall-clock time → UTC wall-clock time.
    pub fn to_utc(&self, local: NaiveDateTime) -> NaiveDateTime {
        local - TimeDelta::seconds(i64::from(self.offset.local_minus_utc()))
    }

    /// UTC wall-clock time → local wall-clock time.
    pub fn to_local(&self, utc: NaiveDateTime) -> NaiveDateTime {
        utc.and_utc().with_timezone(&self.offset).naive_local()
    }

    pub fn now_local(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.offset).naive_local()
    }

    /// First and last instant of a local calendar day, both expressed in UTC.
    /// The upper bound is inclusive (`23:59:59.999999999` local).
    pub fn day_bounds_utc(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(NaiveTime::MIN);
        let end = start + TimeDelta::days(1) - TimeDelta::nanoseconds(1);
        (self.to_utc(start), self.to_utc(end))
    }
}

impl fmt::Display for LocalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.offset)
    }
}

/// Parses `+09:00`, `-0530`, `+9`, `Z` or `UTC`.
impl FromStr for LocalZone {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("utc") || raw == "Z" {
            return Ok(Self::new(FixedOffset::east_opt(0).ok_or("invalid UTC offset")?));
        }

        let (sign, rest) = match raw.as_bytes().first() {
            Some(b'+') => (1, &raw[1..]),
            Some(b'-') => (-1, &raw[1..]),
            _ => return Err(format!("offset `{raw}` must start with '+' or '-'")),
        };

        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None if rest.len() == 4 => match (rest.get(..2), rest.get(2..)) {
                (Some(h), Some(m)) => (h, m),
                _ => return Err(format!("invalid offset `{raw}`")),
            },
            None => (rest, "0"),
        };

        let hours: i32 = hours
            .parse()
            .map_err(|_| format!("invalid hours in offset `{raw}`"))?;
        let minutes: i32 = minutes
            .parse()
            .map_err(|_| format!("invalid minutes in offset `{raw}`"))?;
        if !(0..24).contains(&hours) {
            return Err(format!("offset `{raw}` is out of range"));
        }
        if !(0..60).contains(&minutes) {
            return Err(format!("invalid minutes in offset `{raw}`"));
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::new)
            .ok_or_else(|| format!("offset `{raw}` is out of range"))
    }
}

pub fn format_erp(utc: NaiveDateTime) -> String {
    utc.format(ERP_DATETIME_FORMAT).to_string()
}

/// Parses an ERP datetime string; anything else is treated as absent.
pub fn parse_erp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S%.f").ok()
}

pub fn parse_local_input(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
