//! Journeys: one scheduled run of a train with its ordered stops.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::operators;

use super::departure::Message;
use super::{parse_coordinates, parse_eva, parse_local_time};

/// A complete trip with all stops, addressed by an opaque journey id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Journey {
    pub id: String,
    /// Display name, e.g. "ICE 1537".
    pub name: String,
    /// Train type ("ICE", "RE"); falls back to the most common stop category.
    pub train_type: String,
    pub trip_no: String,
    pub operator: String,
    pub day: Option<NaiveDate>,
    pub cancelled: bool,
    pub stops: Vec<Stop>,
    pub messages: Vec<Message>,
}

/// One call of a journey at a station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub eva: i64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub platform: String,
    pub rt_platform: String,
    pub sched_arr: Option<DateTime<Utc>>,
    pub rt_arr: Option<DateTime<Utc>>,
    /// Effective arrival: realtime when present, else scheduled.
    pub arr: Option<DateTime<Utc>>,
    pub sched_dep: Option<DateTime<Utc>>,
    pub rt_dep: Option<DateTime<Utc>>,
    pub dep: Option<DateTime<Utc>>,
    pub arr_delay: i64,
    pub dep_delay: i64,
    /// Combined delay: arrival delay, or departure delay when arrival is zero.
    pub delay: i64,
    pub cancelled: bool,
    pub additional: bool,
}

impl Stop {
    pub fn effective_platform(&self) -> &str {
        if self.rt_platform.is_empty() {
            &self.platform
        } else {
            &self.rt_platform
        }
    }
}

/// Index of the stop the train is at or approaching.
///
/// Two passes over the scheduled times: the first reads the delay at the
/// stop the schedule says is current, the second re-runs the scan at
/// `now - delay`. A train running six minutes late at 19:01 is thereby
/// placed at its 18:55 stop.
pub fn current_stop_index(stops: &[Stop], now: DateTime<Utc>) -> usize {
    if stops.is_empty() {
        return 0;
    }

    let mut delay = 0i64;
    for stop in stops.iter().rev() {
        if let Some(arr) = stop.sched_arr {
            if arr <= now {
                delay = stop.delay;
                break;
            }
        }
    }

    let virtual_now = now - Duration::minutes(delay);

    for (i, stop) in stops.iter().enumerate().rev() {
        if let Some(arr) = stop.sched_arr {
            if arr <= virtual_now {
                return i;
            }
        }
    }

    0
}

// ═══════════════════════════════════════════════════════════════════
// WIRE DECODING
// ═══════════════════════════════════════════════════════════════════

/// Wire shape of `/reiseloesung/fahrt`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JourneyResponse {
    pub reisetag: String,
    pub zug_name: String,
    pub cancelled: bool,
    pub halte: Vec<Halt>,
    pub him_meldungen: Vec<HimMeldung>,
    pub priorisierte_meldungen: Vec<TypedMeldung>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Halt {
    pub name: String,
    pub ext_id: String,
    pub eva_number: i64,
    pub id: String,
    pub gleis: String,
    pub ez_gleis: String,
    pub abfahrts_zeitpunkt: String,
    pub ez_abfahrts_zeitpunkt: String,
    pub ankunfts_zeitpunkt: String,
    pub ez_ankunfts_zeitpunkt: String,
    #[serde(rename = "adminID")]
    pub admin_id: String,
    pub nummer: String,
    pub kategorie: String,
    pub canceled: bool,
    pub additional: bool,
    pub priorisierte_meldungen: Vec<TypedMeldung>,
    pub ris_meldungen: Vec<RisMeldung>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypedMeldung {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RisMeldung {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HimMeldung {
    pub prioritaet: String,
    pub ueberschrift: String,
    pub text: String,
}

impl JourneyResponse {
    pub fn into_journey(self, id: &str) -> Journey {
        let day = NaiveDate::parse_from_str(&self.reisetag, "%Y-%m-%d").ok();

        // "ICE 1537" carries the type up front and the trip number last.
        let mut train_type = String::new();
        let mut trip_no = String::new();
        let parts: Vec<&str> = self.zug_name.split_whitespace().collect();
        if let Some(first) = parts.first() {
            train_type = (*first).to_string();
        }
        if parts.len() >= 2 {
            trip_no = parts[parts.len() - 1].to_string();
        }

        let mut admin_counts: HashMap<String, usize> = HashMap::new();
        let mut type_counts: HashMap<String, usize> = HashMap::new();
        let mut trip_counts: HashMap<String, usize> = HashMap::new();

        let mut stops = Vec::with_capacity(self.halte.len());
        for halt in &self.halte {
            if !halt.admin_id.is_empty() {
                *admin_counts.entry(halt.admin_id.clone()).or_insert(0) += 1;
            }
            if !halt.kategorie.is_empty() {
                *type_counts.entry(halt.kategorie.clone()).or_insert(0) += 1;
            }
            if !halt.nummer.is_empty() {
                *trip_counts.entry(halt.nummer.clone()).or_insert(0) += 1;
            }
            stops.push(decode_stop(halt));
        }

        if train_type.is_empty() {
            train_type = most_common(&type_counts);
        }
        if trip_no.is_empty() {
            trip_no = most_common(&trip_counts);
        }

        let admin_id = most_common(&admin_counts);
        let operator = operators::operator_name(&admin_id)
            .map(str::to_string)
            .unwrap_or(admin_id);

        let mut messages = Vec::new();
        for m in self.him_meldungen {
            messages.push(Message {
                kind: m.prioritaet,
                text: format!("{}: {}", m.ueberschrift, m.text),
            });
        }
        for m in self.priorisierte_meldungen {
            messages.push(Message {
                kind: m.kind,
                text: m.text,
            });
        }

        Journey {
            id: id.to_string(),
            name: self.zug_name,
            train_type,
            trip_no,
            operator,
            day,
            cancelled: self.cancelled,
            stops,
            messages,
        }
    }
}

fn decode_stop(halt: &Halt) -> Stop {
    let mut eva = halt.eva_number;
    if eva == 0 && !halt.ext_id.is_empty() {
        eva = parse_eva(&halt.ext_id);
    }

    let (lat, lon) = parse_coordinates(&halt.id).unwrap_or((0.0, 0.0));

    let sched_dep = parse_local_time(&halt.abfahrts_zeitpunkt);
    let rt_dep = parse_local_time(&halt.ez_abfahrts_zeitpunkt);
    let sched_arr = parse_local_time(&halt.ankunfts_zeitpunkt);
    let rt_arr = parse_local_time(&halt.ez_ankunfts_zeitpunkt);

    let dep = rt_dep.or(sched_dep);
    let arr = rt_arr.or(sched_arr);

    let dep_delay = match (sched_dep, rt_dep) {
        (Some(sched), Some(rt)) => (rt - sched).num_minutes(),
        _ => 0,
    };
    let arr_delay = match (sched_arr, rt_arr) {
        (Some(sched), Some(rt)) => (rt - sched).num_minutes(),
        _ => 0,
    };
    let delay = if arr_delay != 0 { arr_delay } else { dep_delay };

    let mut cancelled = halt.canceled;
    for m in &halt.priorisierte_meldungen {
        if m.kind == "HALT_AUSFALL" {
            cancelled = true;
        }
    }
    for m in &halt.ris_meldungen {
        if m.key == "text.realtime.stop.cancelled" {
            cancelled = true;
        }
    }

    Stop {
        eva,
        name: halt.name.clone(),
        lat,
        lon,
        platform: halt.gleis.clone(),
        rt_platform: halt.ez_gleis.clone(),
        sched_arr,
        rt_arr,
        arr,
        sched_dep,
        rt_dep,
        dep,
        arr_delay,
        dep_delay,
        delay,
        cancelled,
        additional: halt.additional,
    }
}

fn most_common(counts: &HashMap<String, usize>) -> String {
    counts
        .iter()
        .max_by_key(|(_, n)| **n)
        .map(|(k, _)| k.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, h, m, 0).unwrap()
    }

    fn stop_at(name: &str, sched_arr: Option<DateTime<Utc>>, delay: i64) -> Stop {
        Stop {
            eva: 0,
            name: name.to_string(),
            lat: 0.0,
            lon: 0.0,
            platform: String::new(),
            rt_platform: String::new(),
            sched_arr,
            rt_arr: None,
            arr: sched_arr,
            sched_dep: None,
            rt_dep: None,
            dep: None,
            arr_delay: delay,
            dep_delay: 0,
            delay,
            cancelled: false,
            additional: false,
        }
    }

    #[test]
    fn current_stop_accounts_for_delay() {
        // A train six minutes late at 19:01 is shown at its 18:55 stop.
        let stops = vec![
            stop_at("A", Some(utc(18, 30)), 6),
            stop_at("B", Some(utc(18, 55)), 6),
            stop_at("C", Some(utc(19, 10)), 6),
        ];
        assert_eq!(current_stop_index(&stops, utc(19, 1)), 1);
    }

    #[test]
    fn current_stop_on_time() {
        let stops = vec![
            stop_at("A", Some(utc(18, 30)), 0),
            stop_at("B", Some(utc(18, 55)), 0),
            stop_at("C", Some(utc(19, 10)), 0),
        ];
        assert_eq!(current_stop_index(&stops, utc(19, 1)), 1);
        assert_eq!(current_stop_index(&stops, utc(19, 12)), 2);
    }

    #[test]
    fn current_stop_before_first_arrival() {
        let stops = vec![
            stop_at("A", None, 0),
            stop_at("B", Some(utc(18, 55)), 0),
        ];
        assert_eq!(current_stop_index(&stops, utc(18, 0)), 0);
    }

    #[test]
    fn current_stop_empty_list() {
        assert_eq!(current_stop_index(&[], utc(12, 0)), 0);
    }

    #[test]
    fn decodes_journey_response() {
        let json = r#"{
            "reisetag": "2024-07-01",
            "zugName": "ICE 1537",
            "cancelled": false,
            "halte": [
                {
                    "name": "Frankfurt(Main)Hbf",
                    "extId": "8000105",
                    "evaNumber": 8000105,
                    "id": "A=1@O=Frankfurt(Main)Hbf@X=8663785@Y=50107149@L=8000105@",
                    "gleis": "7",
                    "abfahrtsZeitpunkt": "2024-07-01T18:30:00",
                    "adminID": "80",
                    "nummer": "1537",
                    "kategorie": "ICE"
                },
                {
                    "name": "Hanau Hbf",
                    "extId": "8000150",
                    "evaNumber": 0,
                    "id": "A=1@O=Hanau Hbf@X=8929003@Y=50120953@L=8000150@",
                    "gleis": "103",
                    "ankunftsZeitpunkt": "2024-07-01T18:45:00",
                    "ezAnkunftsZeitpunkt": "2024-07-01T18:51:00",
                    "abfahrtsZeitpunkt": "2024-07-01T18:47:00",
                    "adminID": "80",
                    "nummer": "1537",
                    "kategorie": "ICE"
                }
            ]
        }"#;
        let resp: JourneyResponse = serde_json::from_str(json).unwrap();
        let journey = resp.into_journey("test-journey-id");

        assert_eq!(journey.name, "ICE 1537");
        assert_eq!(journey.train_type, "ICE");
        assert_eq!(journey.trip_no, "1537");
        assert_eq!(journey.operator, "DB Fernverkehr AG");
        assert_eq!(journey.stops.len(), 2);

        // EVA recovered from the structured ext id when evaNumber is zero.
        assert_eq!(journey.stops[1].eva, 8000150);
        assert_eq!(journey.stops[1].arr_delay, 6);
        assert_eq!(journey.stops[1].delay, 6);
        assert!((journey.stops[1].lat - 50.120953).abs() < 1e-9);
    }

    #[test]
    fn ris_cancellation_marks_stop() {
        let halt = Halt {
            name: "Somewhere".into(),
            ris_meldungen: vec![RisMeldung {
                key: "text.realtime.stop.cancelled".into(),
                value: "Halt entfällt".into(),
            }],
            ..Default::default()
        };
        assert!(decode_stop(&halt).cancelled);
    }

    #[test]
    fn departure_delay_fills_in_for_origin() {
        let halt = Halt {
            name: "Origin".into(),
            abfahrts_zeitpunkt: "2024-07-01T10:00:00".into(),
            ez_abfahrts_zeitpunkt: "2024-07-01T10:04:00".into(),
            ..Default::default()
        };
        let stop = decode_stop(&halt);
        assert_eq!(stop.arr_delay, 0);
        assert_eq!(stop.dep_delay, 4);
        assert_eq!(stop.delay, 4);
    }
}
