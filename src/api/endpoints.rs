//! Endpoint paths and shared constants for the bahn.de web API.
//!
//! Parameter names are wire-critical; the service matches them by name.

/// Base URL for the bahn.de web API.
pub const BASE_URL: &str = "https://www.bahn.de/web/api";

/// Departures at a station.
/// Required params: datum, zeit, ortExtId, ortId, mitVias, maxVias, verkehrsmittel[]
pub const ENDPOINT_DEPARTURES: &str = "/reiseloesung/abfahrten";

/// Arrivals at a station (same parameters as departures).
pub const ENDPOINT_ARRIVALS: &str = "/reiseloesung/ankuenfte";

/// Station search by name.
/// Required params: suchbegriff, typ, limit
pub const ENDPOINT_LOCATIONS: &str = "/reiseloesung/orte";

/// Station search by coordinates.
/// Required params: lat, long, radius, maxNo
pub const ENDPOINT_NEARBY: &str = "/reiseloesung/orte/nearby";

/// Journey/trip details.
/// Required params: journeyId, poly
pub const ENDPOINT_JOURNEY: &str = "/reiseloesung/fahrt";

/// Train carriage formation.
/// Required params: administrationId, category, date, evaNumber, number, time
pub const ENDPOINT_FORMATION: &str = "/reisebegleitung/wagenreihung/vehicle-sequence";

/// All supported transport modes, in the order the UI presents them.
pub const MODES_OF_TRANSIT: [&str; 10] = [
    "ICE",
    "EC_IC",
    "IR",
    "REGIONAL",
    "SBAHN",
    "BUS",
    "SCHIFF",
    "UBAHN",
    "TRAM",
    "ANRUFPFLICHTIG",
];
