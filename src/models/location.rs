//! Station locations from search results.

use serde::{Deserialize, Serialize};

use super::{parse_coordinates, parse_eva};

/// A station or stop. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    /// Numeric external identifier (EVA), e.g. 8000105 for Frankfurt Hbf.
    pub eva: i64,
    /// Opaque structured id used by follow-up queries.
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Upstream location type (ST, ADR, POI, …).
    #[serde(rename = "type")]
    pub kind: String,
    /// Transport products served at this location.
    pub products: Vec<String>,
}

/// Wire shape of one entry of `/reiseloesung/orte`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationResponse {
    pub ext_id: String,
    pub eva_number: i64,
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub products: Vec<String>,
}

impl LocationResponse {
    pub fn into_location(self) -> Location {
        let mut eva = parse_eva(&self.ext_id);
        if eva == 0 {
            eva = self.eva_number;
        }

        let (mut lat, mut lon) = (self.lat, self.lon);
        if lat == 0.0 && lon == 0.0 {
            if let Some((id_lat, id_lon)) = parse_coordinates(&self.id) {
                lat = id_lat;
                lon = id_lon;
            }
        }

        Location {
            eva,
            id: self.id,
            name: self.name,
            lat,
            lon,
            kind: self.kind,
            products: self.products,
        }
    }
}
