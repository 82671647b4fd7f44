//! Board entries: one departure (or arrival) at a station.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse_local_time;

/// An alert or notification attached to a board entry or journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub kind: String,
    pub text: String,
}

/// A single departure or arrival at a station.
///
/// Cursor identity across board refreshes is the journey id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Departure {
    pub journey_id: String,
    /// Short train type ("ICE", "S").
    pub train_type: String,
    /// Line label ("RE 5", "S 6").
    pub line: String,
    pub train_short: String,
    pub train_mid: String,
    pub train_long: String,
    /// EVA token of the stop the entry belongs to (raw upstream string).
    pub stop_eva: String,
    pub destination: String,
    /// Scheduled platform.
    pub platform: String,
    /// Realtime platform, empty if unchanged.
    pub rt_platform: String,
    /// Intermediate stops; the upstream origin entry is already dropped.
    pub via: Vec<String>,
    pub sched_time: Option<DateTime<Utc>>,
    pub rt_time: Option<DateTime<Utc>>,
    /// Effective time: realtime when present, else scheduled.
    pub time: Option<DateTime<Utc>>,
    /// Whole minutes of delay; zero when either time is absent.
    pub delay: i64,
    pub cancelled: bool,
    pub messages: Vec<Message>,
}

impl Departure {
    /// Realtime platform when non-empty, else scheduled.
    pub fn effective_platform(&self) -> &str {
        if self.rt_platform.is_empty() {
            &self.platform
        } else {
            &self.rt_platform
        }
    }
}

/// Wire shape of `/reiseloesung/abfahrten` and `/reiseloesung/ankuenfte`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BoardResponse {
    pub entries: Vec<BoardEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardEntry {
    pub journey_id: String,
    pub bahnhofs_id: String,
    pub terminus: String,
    pub gleis: String,
    pub ez_gleis: String,
    pub zeit: String,
    pub ez_zeit: String,
    pub ueber: Vec<String>,
    pub verkehrmittel: Verkehrmittel,
    pub meldungen: Vec<Meldung>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Verkehrmittel {
    pub kurz_text: String,
    pub mittel_text: String,
    pub lang_text: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meldung {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl BoardEntry {
    pub fn into_departure(self) -> Departure {
        let sched_time = parse_local_time(&self.zeit);
        let rt_time = parse_local_time(&self.ez_zeit);
        let time = rt_time.or(sched_time);

        let delay = match (sched_time, rt_time) {
            (Some(sched), Some(rt)) => (rt - sched).num_minutes(),
            _ => 0,
        };

        // The first "via" entry is the station of origin and is dropped.
        let via = if self.ueber.len() > 1 {
            self.ueber[1..].to_vec()
        } else {
            Vec::new()
        };

        let mut cancelled = false;
        let messages: Vec<Message> = self
            .meldungen
            .into_iter()
            .map(|m| {
                if m.kind == "HALT_AUSFALL" {
                    cancelled = true;
                }
                Message {
                    kind: m.kind,
                    text: m.text,
                }
            })
            .collect();

        Departure {
            journey_id: self.journey_id,
            train_type: self.verkehrmittel.kurz_text.clone(),
            line: self.verkehrmittel.mittel_text.clone(),
            train_short: self.verkehrmittel.kurz_text,
            train_mid: self.verkehrmittel.mittel_text,
            train_long: self.verkehrmittel.lang_text,
            stop_eva: self.bahnhofs_id,
            destination: self.terminus,
            platform: self.gleis,
            rt_platform: self.ez_gleis,
            via,
            sched_time,
            rt_time,
            time,
            delay,
            cancelled,
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> BoardEntry {
        serde_json::from_str(
            r#"{
                "journeyId": "2|#VN#1#ST#123#PI#0#ZI#456#",
                "bahnhofsId": "8000105",
                "terminus": "Berlin Hbf",
                "gleis": "7",
                "ezGleis": "9",
                "zeit": "2024-07-01T18:55:00",
                "ezZeit": "2024-07-01T19:01:00",
                "ueber": ["Frankfurt(Main)Hbf", "Hanau Hbf", "Fulda"],
                "verkehrmittel": {
                    "kurzText": "ICE",
                    "mittelText": "ICE 1537",
                    "langText": "ICE 1537 nach Berlin",
                    "name": "ICE 1537"
                },
                "meldungen": []
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn computes_delay_and_effective_time() {
        let dep = sample_entry().into_departure();
        assert_eq!(dep.delay, 6);
        assert_eq!(dep.time, dep.rt_time);
        assert_eq!(dep.effective_platform(), "9");
    }

    #[test]
    fn drops_origin_from_via_list() {
        let dep = sample_entry().into_departure();
        assert_eq!(dep.via, vec!["Hanau Hbf".to_string(), "Fulda".to_string()]);
    }

    #[test]
    fn single_via_entry_means_no_intermediates() {
        let mut entry = sample_entry();
        entry.ueber = vec!["Frankfurt(Main)Hbf".into()];
        assert!(entry.into_departure().via.is_empty());
    }

    #[test]
    fn missing_realtime_means_zero_delay() {
        let mut entry = sample_entry();
        entry.ez_zeit = String::new();
        let dep = entry.into_departure();
        assert_eq!(dep.delay, 0);
        assert_eq!(dep.time, dep.sched_time);
        assert!(dep.rt_time.is_none());
    }

    #[test]
    fn halt_ausfall_marks_cancelled() {
        let mut entry = sample_entry();
        entry.meldungen = vec![Meldung {
            kind: "HALT_AUSFALL".into(),
            text: "Halt entfällt".into(),
        }];
        let dep = entry.into_departure();
        assert!(dep.cancelled);
        assert_eq!(dep.messages.len(), 1);
    }
}
