//! Domain entities and their wire-decoding layer.
//!
//! The upstream API speaks German field names (`halte`, `gleis`,
//! `verkehrmittel`); each `*Response` type mirrors the wire shape and
//! converts into a clean domain entity. Times arrive as zone-naive local
//! civil datetimes in Europe/Berlin and are exposed as absolute instants.

mod departure;
mod formation;
mod journey;
mod location;

pub use departure::{BoardEntry, BoardResponse, Departure, Message};
pub use formation::{Carriage, Formation, FormationGroup, FormationResponse, Sector};
pub use journey::{current_stop_index, Journey, JourneyResponse, Stop};
pub use location::{Location, LocationResponse};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Europe::Berlin;
use once_cell::sync::Lazy;
use regex::Regex;

/// Extracts the EVA number from a structured Hafas id ("…@L=8000105@…").
static HAFAS_EVA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@L=(\d+)@").expect("valid regex"));

/// Extracts micro-degree coordinates from a structured id ("…@X=8663785@Y=50107149…").
static COORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@X=(-?\d+)@Y=(-?\d+)").expect("valid regex"));

/// Parse an upstream civil datetime string into an absolute instant.
///
/// The wire format is zone-naive by convention; a trailing `Z` or a
/// `+HH:MM` offset is stripped before the string is resolved in
/// Europe/Berlin.
pub(crate) fn parse_local_time(s: &str) -> Option<DateTime<Utc>> {
    let mut s = s.strip_suffix('Z').unwrap_or(s);
    if let Some(idx) = s.find('+') {
        if idx > 0 {
            s = &s[..idx];
        }
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok()?;
    Berlin
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Extract an EVA number from a station token.
///
/// Plain non-zero decimal strings are taken whole; otherwise the
/// `@L=<digits>@` segment of a structured id is used. Unrecognized ids
/// yield 0 rather than a guess.
pub(crate) fn parse_eva(s: &str) -> i64 {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = s.parse::<i64>() {
            if n != 0 {
                return n;
            }
        }
    }
    HAFAS_EVA_RE
        .captures(s)
        .and_then(|c| c[1].parse::<i64>().ok())
        .unwrap_or(0)
}

/// Extract (lat, lon) in degrees from the `@X=<lon>@Y=<lat>` segment of a
/// structured id. Values on the wire are integer micro-degrees.
pub(crate) fn parse_coordinates(id: &str) -> Option<(f64, f64)> {
    let caps = COORD_RE.captures(id)?;
    let lon: f64 = caps[1].parse().ok()?;
    let lat: f64 = caps[2].parse().ok()?;
    Some((lat / 1e6, lon / 1e6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_plain_local_time() {
        let t = parse_local_time("2024-07-01T19:01:00").expect("parses");
        // 19:01 CEST is 17:01 UTC.
        assert_eq!(t.hour(), 17);
        assert_eq!(t.minute(), 1);
    }

    #[test]
    fn strips_zulu_and_offset_suffixes() {
        let base = parse_local_time("2024-07-01T08:30:00").unwrap();
        assert_eq!(parse_local_time("2024-07-01T08:30:00Z").unwrap(), base);
        assert_eq!(parse_local_time("2024-07-01T08:30:00+02:00").unwrap(), base);
    }

    #[test]
    fn rejects_garbage_time() {
        assert!(parse_local_time("not-a-time").is_none());
        assert!(parse_local_time("").is_none());
    }

    #[test]
    fn eva_from_plain_digits() {
        assert_eq!(parse_eva("8000105"), 8000105);
    }

    #[test]
    fn eva_from_hafas_id() {
        assert_eq!(parse_eva("A=1@O=Köln Hbf@X=6958730@Y=50943029@L=8000207@"), 8000207);
    }

    #[test]
    fn eva_unrecognized_is_zero() {
        assert_eq!(parse_eva(""), 0);
        assert_eq!(parse_eva("0"), 0);
        assert_eq!(parse_eva("A=1@O=Somewhere@"), 0);
    }

    #[test]
    fn coordinates_from_id() {
        let (lat, lon) =
            parse_coordinates("A=1@O=Frankfurt(Main)Hbf@X=8663785@Y=50107149@L=8000105@").unwrap();
        assert!((lat - 50.107149).abs() < 1e-9);
        assert!((lon - 8.663785).abs() < 1e-9);
    }

    #[test]
    fn coordinates_missing() {
        assert!(parse_coordinates("A=1@O=Somewhere@L=123@").is_none());
    }
}
