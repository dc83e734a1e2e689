//! Best-effort conversion of the tracking page's date text into RFC 3339 timestamps.
//!
//! The page omits the year on most dates. Year-less dates are placed in the most
//! recent year that does not put them in the future. Anything that fails every
//! layout is returned unchanged so no source information is lost.

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, SecondsFormat,
    TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{Result, TrackerError};

/// Leap year used to parse year-less text so Feb 29 survives until the real year is chosen.
const REFERENCE_YEAR: i32 = 2000;

const UPDATE_LAYOUT: &str = "%b %d %I:%M %p";
const UPDATE_LAYOUT_WITH_YEAR: &str = "%b %d, %Y %I:%M %p";
const DELIVERY_LAYOUT: &str = "%b %d, %I:%M %p";
const DELIVERY_LAYOUT_WITH_YEAR: &str = "%b %d, %Y, %I:%M %p";
const ESTIMATED_LAYOUT: &str = "%B %d, %Y";

/// Time zone used to interpret and format every timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    /// Resolve an IANA name; `None` or an empty name means the system zone.
    pub fn from_name(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(Zone::Local),
            Some(n) => n
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|_| TrackerError::InvalidTimeZone(n.to_string())),
        }
    }

    /// Attach this zone's offset to a wall-clock time. Ambiguous times take the
    /// earlier instant; times skipped by a DST transition yield `None`.
    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&dt.offset().fix())),
            Zone::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&dt.offset().fix())),
        }
    }

    fn year_of(&self, instant: DateTime<Utc>) -> i32 {
        match self {
            Zone::Local => instant.with_timezone(&Local).year(),
            Zone::Named(tz) => instant.with_timezone(tz).year(),
        }
    }
}

/// Source of "now" for year inference
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct DateNormalizer {
    zone: Zone,
    clock: Box<dyn Clock>,
}

impl DateNormalizer {
    pub fn new(zone: Zone) -> Self {
        Self::with_clock(zone, SystemClock)
    }

    pub fn with_clock(zone: Zone, clock: impl Clock + 'static) -> Self {
        Self {
            zone,
            clock: Box::new(clock),
        }
    }

    /// Update rows: `"Sep 19"` + `"2:51 PM"`, or `"Sep 19, 2023"` + `"2:51 PM"`.
    /// Falls back to `"<date>, <time>"`.
    pub fn normalize_update(&self, date: &str, time: &str) -> String {
        let text = format!("{} {}", date.trim(), time.trim());

        let parsed = parse_without_year(&text, UPDATE_LAYOUT)
            .and_then(|naive| self.most_recent(naive))
            .or_else(|| {
                NaiveDateTime::parse_from_str(&text, UPDATE_LAYOUT_WITH_YEAR)
                    .ok()
                    .and_then(|naive| self.zone.localize(naive))
            });

        match parsed {
            Some(dt) => format_timestamp(&dt),
            None => {
                debug!("Unparsed update date '{}' time '{}'", date, time);
                format!("{}, {}", date, time)
            }
        }
    }

    /// Completed delivery: `"Mon, Sep 18, 2:30 PM"` or `"Mon, Sep 18, 2023, 2:30 PM"`.
    /// Falls back to the input text.
    pub fn normalize_delivery(&self, text: &str) -> String {
        let parsed = strip_weekday(text).and_then(|rest| {
            parse_without_year(rest, DELIVERY_LAYOUT)
                .and_then(|naive| self.most_recent(naive))
                .or_else(|| {
                    NaiveDateTime::parse_from_str(rest, DELIVERY_LAYOUT_WITH_YEAR)
                        .ok()
                        .and_then(|naive| self.zone.localize(naive))
                })
        });

        match parsed {
            Some(dt) => format_timestamp(&dt),
            None => {
                debug!("Unparsed delivery date '{}'", text);
                text.to_string()
            }
        }
    }

    /// Estimated delivery: `"Monday, January 2, 2025"`, midnight in the configured zone.
    /// Falls back to the input text.
    pub fn normalize_estimated(&self, text: &str) -> String {
        let parsed = strip_weekday(text).and_then(|rest| {
            NaiveDate::parse_from_str(rest, ESTIMATED_LAYOUT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .and_then(|naive| self.zone.localize(naive))
        });

        match parsed {
            Some(dt) => format_timestamp(&dt),
            None => {
                debug!("Unparsed estimated delivery '{}'", text);
                text.to_string()
            }
        }
    }

    /// Place a year-less date in the current year, or the year before if the
    /// current year puts it in the future or has no such date (Feb 29).
    ///
    /// A wall-clock time the zone skips (DST gap) fails the layout; it never
    /// moves the year.
    fn most_recent(&self, parsed: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        let now = self.clock.now();
        let year = self.zone.year_of(now);

        let Some(current) = parsed.with_year(year) else {
            return parsed
                .with_year(year - 1)
                .and_then(|naive| self.zone.localize(naive));
        };

        let dt = self.zone.localize(current)?;
        if dt.with_timezone(&Utc) <= now {
            return Some(dt);
        }
        current
            .with_year(year - 1)
            .and_then(|naive| self.zone.localize(naive))
    }
}

fn parse_without_year(text: &str, layout: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(
        &format!("{} {}", text.trim(), REFERENCE_YEAR),
        &format!("{} %Y", layout),
    )
    .ok()
}

/// Drop a leading `"<weekday>, "`. The weekday must be a valid name but is not
/// checked against the date.
fn strip_weekday(text: &str) -> Option<&str> {
    let (day, rest) = text.trim().split_once(", ")?;
    day.parse::<Weekday>().ok()?;
    Some(rest)
}

fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}
