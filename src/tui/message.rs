//! Messages consumed by the update engine.
//!
//! Everything the event loop feeds into [`Model::update`] is one of these:
//! terminal input, timer ticks, or a gateway result tagged with the
//! identity of the request that produced it (sequence number for searches,
//! station EVA for boards, journey id for journeys). The tags drive
//! stale-result rejection.
//!
//! [`Model::update`]: super::model::Model::update

use crossterm::event::KeyEvent;

use crate::error::ApiError;
use crate::models::{Departure, Journey, Location};

#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Reply to a SearchLocations call.
    SearchResult {
        seq: u64,
        result: Result<Vec<Location>, ApiError>,
    },
    /// Reply to a station board call.
    BoardResult {
        station_eva: i64,
        result: Result<Vec<Departure>, ApiError>,
    },
    /// Reply to a journey call.
    JourneyResult {
        journey_id: String,
        result: Result<Journey, ApiError>,
    },
    /// Fires every 30 s while auto-refresh is enabled.
    RefreshTick,
    /// Fires every second while auto-refresh is enabled; drives only the
    /// countdown display.
    CountdownTick,
}
