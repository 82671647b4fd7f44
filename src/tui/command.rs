//! Commands emitted by the update engine.
//!
//! A command is work for the event loop: spawn a gateway call, schedule a
//! timer, or quit. Gateway calls are never cancelled when superseded; the
//! update engine drops stale replies instead (identity tags in
//! [`Message`]).
//!
//! [`Message`]: super::message::Message

use std::time::Duration;

use crate::api::BoardSide;
use crate::models::Location;

/// Per-call deadline for gateway work.
pub const API_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between silent board/journey refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Interval of the countdown display tick.
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Leave the event loop and restore the terminal.
    Quit,
    /// Run SearchLocations; reply tagged with `seq`.
    SearchStations { query: String, seq: u64 },
    /// Fetch the board for `station`; reply tagged with its EVA.
    FetchBoard {
        station: Location,
        modes: Vec<String>,
        side: BoardSide,
    },
    /// Fetch journey details; reply tagged with the journey id.
    FetchJourney { journey_id: String },
    /// Arrange a [`Message::RefreshTick`] after [`REFRESH_INTERVAL`].
    ///
    /// [`Message::RefreshTick`]: super::message::Message::RefreshTick
    ScheduleRefreshTick,
    /// Arrange a [`Message::CountdownTick`] after [`COUNTDOWN_INTERVAL`].
    ///
    /// [`Message::CountdownTick`]: super::message::Message::CountdownTick
    ScheduleCountdownTick,
}
