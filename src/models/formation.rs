//! Train formation (Wagenreihung): the ordered carriage composition of a
//! train at a platform, with per-carriage class and amenity flags.

use serde::{Deserialize, Serialize};

/// Class marker for a carriage: 0 unknown, 1 first, 2 second, 12 mixed.
pub type ClassType = u8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Formation {
    pub platform: String,
    pub train_type: String,
    pub sectors: Vec<Sector>,
    pub groups: Vec<FormationGroup>,
    pub destinations: Vec<String>,
    pub train_numbers: Vec<String>,
}

/// A platform sector/zone ("A".."F") with its extent along the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sector {
    pub name: String,
    pub start_percent: f64,
    pub end_percent: f64,
}

/// A coupled unit of the train, usually one trainset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormationGroup {
    pub name: String,
    pub train_type: String,
    pub train_no: String,
    pub destination: String,
    /// Rolling-stock model ("ICE 4") derived from the UIC series digits.
    pub model: String,
    pub carriages: Vec<Carriage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Carriage {
    /// Wagon number as printed on the car, may be empty for locomotives.
    pub number: String,
    /// Construction type ("ARkimbz", "DBpza", …).
    pub construction_type: String,
    pub uic_id: String,
    /// Platform sector the carriage halts in.
    pub sector: String,
    pub class_type: ClassType,
    pub start_percent: f64,
    pub end_percent: f64,
    pub closed: bool,
    pub locomotive: bool,
    pub powercar: bool,
    pub has_bistro: bool,
    pub has_ac: bool,
    pub has_wheelchair_space: bool,
    pub has_family_zone: bool,
    pub has_quiet_zone: bool,
    pub has_bahn_comfort: bool,
}

// ═══════════════════════════════════════════════════════════════════
// WIRE DECODING
// ═══════════════════════════════════════════════════════════════════

/// Wire shape of `/reisebegleitung/wagenreihung/vehicle-sequence`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormationResponse {
    pub departure_platform: String,
    pub platform: PlatformResponse,
    pub groups: Vec<GroupResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlatformResponse {
    pub start: f64,
    pub end: f64,
    pub sectors: Vec<SectorResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SectorResponse {
    pub name: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupResponse {
    pub name: String,
    pub transport: TransportResponse,
    pub vehicles: Vec<VehicleResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransportResponse {
    pub category: String,
    /// Train number; the upstream emits either a string or an integer.
    pub number: serde_json::Value,
    pub destination: DestinationResponse,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DestinationResponse {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleResponse {
    pub wagon_identification_number: serde_json::Value,
    #[serde(rename = "vehicleID")]
    pub vehicle_id: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: VehicleTypeResponse,
    pub platform_position: PlatformPositionResponse,
    pub amenities: Vec<AmenityResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleTypeResponse {
    pub construction_type: String,
    pub category: String,
    pub has_first_class: bool,
    pub has_economy_class: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlatformPositionResponse {
    pub start: f64,
    pub end: f64,
    pub sector: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AmenityResponse {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Number fields arrive as string or integer depending on the endpoint era.
fn number_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// UIC series digits → rolling-stock model.
fn model_for_series(series: &str) -> &'static str {
    match series {
        "401" => "ICE 1",
        "402" => "ICE 2",
        "403" | "406" => "ICE 3",
        "407" => "ICE 3 Velaro",
        "408" => "ICE 3neo",
        "411" | "415" => "ICE T",
        "412" => "ICE 4",
        _ => "",
    }
}

impl FormationResponse {
    pub fn into_formation(self, train_type: &str) -> Formation {
        let platform_start = self.platform.start;
        let mut platform_len = self.platform.end - self.platform.start;
        if platform_len == 0.0 {
            platform_len = 1.0;
        }
        let pct = |m: f64| (m - platform_start) * 100.0 / platform_len;

        let sectors = self
            .platform
            .sectors
            .iter()
            .map(|s| Sector {
                name: s.name.clone(),
                start_percent: pct(s.start),
                end_percent: pct(s.end),
            })
            .collect();

        let mut destinations = Vec::new();
        let mut train_numbers = Vec::new();
        let mut groups = Vec::new();

        for g in &self.groups {
            let train_no = number_to_string(&g.transport.number);
            let destination = g.transport.destination.name.clone();
            if !destination.is_empty() && !destinations.contains(&destination) {
                destinations.push(destination.clone());
            }
            if !train_no.is_empty() && !train_numbers.contains(&train_no) {
                train_numbers.push(train_no.clone());
            }

            let mut carriages: Vec<Carriage> =
                g.vehicles.iter().map(|v| decode_carriage(v, pct)).collect();
            carriages.sort_by(|a, b| a.start_percent.total_cmp(&b.start_percent));

            // The most common UIC series across the unit names its model.
            let mut series_counts: std::collections::HashMap<&str, usize> =
                std::collections::HashMap::new();
            for c in &carriages {
                if c.uic_id.len() >= 12 {
                    *series_counts.entry(&c.uic_id[5..8]).or_insert(0) += 1;
                }
            }
            let model = series_counts
                .iter()
                .max_by_key(|(_, n)| **n)
                .map(|(series, _)| model_for_series(series))
                .unwrap_or("")
                .to_string();

            groups.push(FormationGroup {
                name: g.name.clone(),
                train_type: g.transport.category.clone(),
                train_no,
                destination,
                model,
                carriages,
            });
        }

        groups.sort_by(|a, b| {
            let a_start = a.carriages.first().map(|c| c.start_percent).unwrap_or(0.0);
            let b_start = b.carriages.first().map(|c| c.start_percent).unwrap_or(0.0);
            a_start.total_cmp(&b_start)
        });

        Formation {
            platform: self.departure_platform,
            train_type: train_type.to_string(),
            sectors,
            groups,
            destinations,
            train_numbers,
        }
    }
}

fn decode_carriage(v: &VehicleResponse, pct: impl Fn(f64) -> f64) -> Carriage {
    let construction_type = v.kind.construction_type.clone();

    let class_type: ClassType = if v.kind.has_first_class && v.kind.has_economy_class {
        12
    } else if v.kind.has_first_class {
        1
    } else if v.kind.has_economy_class {
        2
    } else {
        0
    };

    let mut carriage = Carriage {
        number: number_to_string(&v.wagon_identification_number),
        construction_type,
        uic_id: v.vehicle_id.clone(),
        sector: v.platform_position.sector.clone(),
        class_type,
        start_percent: pct(v.platform_position.start),
        end_percent: pct(v.platform_position.end),
        closed: v.status == "CLOSED",
        locomotive: v.kind.category == "LOCOMOTIVE",
        powercar: v.kind.category == "POWERCAR",
        has_bistro: v.kind.category.contains("DININGCAR"),
        has_ac: false,
        has_wheelchair_space: false,
        has_family_zone: false,
        has_quiet_zone: false,
        has_bahn_comfort: false,
    };

    for a in &v.amenities {
        match a.kind.as_str() {
            "AIR_CONDITION" => carriage.has_ac = true,
            "WHEELCHAIR_SPACE" => carriage.has_wheelchair_space = true,
            "ZONE_FAMILY" => carriage.has_family_zone = true,
            "ZONE_QUIET" => carriage.has_quiet_zone = true,
            "SEATS_BAHN_COMFORT" => carriage.has_bahn_comfort = true,
            _ => {}
        }
    }

    carriage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> FormationResponse {
        serde_json::from_str(
            r#"{
                "departurePlatform": "7",
                "platform": {
                    "start": 0.0,
                    "end": 400.0,
                    "sectors": [
                        {"name": "A", "start": 0.0, "end": 100.0},
                        {"name": "B", "start": 100.0, "end": 200.0}
                    ]
                },
                "groups": [
                    {
                        "name": "ICE0412",
                        "transport": {
                            "category": "ICE",
                            "number": 1537,
                            "destination": {"name": "Berlin Hbf"}
                        },
                        "vehicles": [
                            {
                                "wagonIdentificationNumber": "1",
                                "vehicleID": "938054120010123",
                                "status": "OPEN",
                                "type": {
                                    "constructionType": "Apmz",
                                    "category": "PASSENGERCARRIAGE_FIRSTCLASS",
                                    "hasFirstClass": true,
                                    "hasEconomyClass": false
                                },
                                "platformPosition": {"start": 40.0, "end": 66.0, "sector": "A"},
                                "amenities": [
                                    {"type": "AIR_CONDITION"},
                                    {"type": "ZONE_QUIET"}
                                ]
                            },
                            {
                                "wagonIdentificationNumber": 2,
                                "vehicleID": "938054120020122",
                                "status": "OPEN",
                                "type": {
                                    "constructionType": "Bpmz",
                                    "category": "PASSENGERCARRIAGE_ECONOMYCLASS",
                                    "hasFirstClass": false,
                                    "hasEconomyClass": true
                                },
                                "platformPosition": {"start": 14.0, "end": 40.0, "sector": "A"},
                                "amenities": [{"type": "WHEELCHAIR_SPACE"}]
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn decodes_formation() {
        let formation = sample_response().into_formation("ICE");
        assert_eq!(formation.platform, "7");
        assert_eq!(formation.sectors.len(), 2);
        assert_eq!(formation.groups.len(), 1);
        assert_eq!(formation.destinations, vec!["Berlin Hbf".to_string()]);
        assert_eq!(formation.train_numbers, vec!["1537".to_string()]);

        let group = &formation.groups[0];
        assert_eq!(group.train_no, "1537");
        assert_eq!(group.model, "ICE 4");

        // Carriages come back sorted by platform position.
        assert_eq!(group.carriages[0].number, "2");
        assert_eq!(group.carriages[0].class_type, 2);
        assert!(group.carriages[0].has_wheelchair_space);
        assert_eq!(group.carriages[1].number, "1");
        assert_eq!(group.carriages[1].class_type, 1);
        assert!(group.carriages[1].has_ac);
        assert!(group.carriages[1].has_quiet_zone);
    }

    #[test]
    fn sector_percentages_span_platform() {
        let formation = sample_response().into_formation("ICE");
        let a = &formation.sectors[0];
        assert!((a.start_percent - 0.0).abs() < 1e-9);
        assert!((a.end_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_platform_does_not_divide_by_zero() {
        let mut resp = sample_response();
        resp.platform.start = 0.0;
        resp.platform.end = 0.0;
        let formation = resp.into_formation("ICE");
        assert!(formation.groups[0].carriages[0].start_percent.is_finite());
    }
}
