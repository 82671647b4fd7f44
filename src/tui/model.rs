//! Central TUI state.
//!
//! The model is a plain snapshot of everything the renderer needs: focus,
//! cursors, data lists, per-panel loading/error state, refresh flags, and
//! the search sequence counter. All mutation happens inside
//! [`Model::update`]; gateway workers communicate only via messages.
//!
//! [`Model::update`]: Model::update

use chrono::{DateTime, Utc};

use crate::api::BoardSide;
use crate::error::ApiError;
use crate::models::{Departure, Journey, Location};

/// Transport mode chips: (upstream API name, chip label), in display order.
pub const MODE_LABELS: [(&str, &str); 10] = [
    ("ICE", "ICE"),
    ("EC_IC", "IC"),
    ("IR", "IR"),
    ("REGIONAL", "RE"),
    ("SBAHN", "S"),
    ("BUS", "Bus"),
    ("SCHIFF", "Ship"),
    ("UBAHN", "U"),
    ("TRAM", "Tram"),
    ("ANRUFPFLICHTIG", "On-call"),
];

/// The panel that currently receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Search,
    Filters,
    Board,
    AutoRefresh,
    Stations,
    Departures,
    Destinations,
    Journey,
}

impl Focus {
    /// Tab order. Panels whose backing data is empty are skipped when
    /// cycling.
    pub fn order() -> &'static [Focus] {
        &[
            Focus::Search,
            Focus::Filters,
            Focus::Board,
            Focus::AutoRefresh,
            Focus::Stations,
            Focus::Departures,
            Focus::Destinations,
            Focus::Journey,
        ]
    }
}

/// Single-line text input for the station search.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    value: String,
    /// Cursor position in characters.
    cursor: usize,
    focused: bool,
}

impl SearchInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index(self.cursor);
        self.value.remove(idx);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let idx = self.byte_index(self.cursor);
        self.value.remove(idx);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

/// The complete TUI state.
#[derive(Debug, Clone)]
pub struct Model {
    // ═══ Dimensions ═══
    pub width: u16,
    pub height: u16,

    // ═══ Focus and search ═══
    pub focus: Focus,
    pub search: SearchInput,

    // ═══ Filter bar ═══
    pub mode_filters: Vec<bool>,
    pub filter_cursor: usize,

    // ═══ Board mode ═══
    pub board_mode: BoardSide,
    pub board_cursor: usize,

    // ═══ Auto-refresh ═══
    pub auto_refresh: bool,
    pub last_update: Option<DateTime<Utc>>,

    // ═══ Left panel: stations ═══
    pub stations: Vec<Location>,
    pub station_cursor: usize,
    pub stations_loading: bool,
    pub stations_err: Option<ApiError>,
    pub search_seq: u64,

    // ═══ Right panel: departures ═══
    pub selected_station: Option<Location>,
    pub departures: Vec<Departure>,
    pub departure_cursor: usize,
    pub departures_loading: bool,
    pub departures_err: Option<ApiError>,

    // ═══ Right panel: destination filter ═══
    pub destination_list: Vec<String>,
    pub destination_filters: Vec<bool>,
    pub destination_cursor: usize,

    // ═══ Right panel: journey detail ═══
    pub selected_journey_id: String,
    pub journey: Option<Journey>,
    pub journey_loading: bool,
    pub journey_err: Option<ApiError>,
    pub show_journey: bool,
    pub journey_scroll: usize,
    /// Set when the user scrolls the journey list; a silent refresh then
    /// preserves the position instead of re-centering on the current stop.
    pub journey_manual_scroll: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        let mut search = SearchInput::default();
        search.focus();

        Self {
            width: 0,
            height: 0,
            focus: Focus::Search,
            search,
            mode_filters: vec![true; MODE_LABELS.len()],
            filter_cursor: 0,
            board_mode: BoardSide::Departures,
            board_cursor: 0,
            auto_refresh: false,
            last_update: None,
            stations: Vec::new(),
            station_cursor: 0,
            stations_loading: false,
            stations_err: None,
            search_seq: 0,
            selected_station: None,
            departures: Vec::new(),
            departure_cursor: 0,
            departures_loading: false,
            departures_err: None,
            destination_list: Vec::new(),
            destination_filters: Vec::new(),
            destination_cursor: 0,
            selected_journey_id: String::new(),
            journey: None,
            journey_loading: false,
            journey_err: None,
            show_journey: false,
            journey_scroll: 0,
            journey_manual_scroll: false,
        }
    }

    /// Upstream API names of the active transport mode filters.
    pub fn selected_modes(&self) -> Vec<String> {
        MODE_LABELS
            .iter()
            .zip(&self.mode_filters)
            .filter(|(_, active)| **active)
            .map(|((api_name, _), _)| (*api_name).to_string())
            .collect()
    }

    /// Departures narrowed by the destination chips. With every chip active
    /// (or no chips at all) this is the full board.
    pub fn filtered_departures(&self) -> Vec<&Departure> {
        if self.destination_list.is_empty() || self.destination_filters.iter().all(|f| *f) {
            return self.departures.iter().collect();
        }
        let active: Vec<&str> = self
            .destination_list
            .iter()
            .zip(&self.destination_filters)
            .filter(|(_, on)| **on)
            .map(|(dest, _)| dest.as_str())
            .collect();
        self.departures
            .iter()
            .filter(|d| active.contains(&d.destination.as_str()))
            .collect()
    }

    /// Recompute the destination chip list from the current departures,
    /// carrying over the toggle state of destinations that persist.
    pub fn rebuild_destinations(&mut self) {
        let mut new_list: Vec<String> = Vec::new();
        for dep in &self.departures {
            if !dep.destination.is_empty() && !new_list.contains(&dep.destination) {
                new_list.push(dep.destination.clone());
            }
        }
        new_list.sort();

        let new_filters = new_list
            .iter()
            .map(|dest| {
                self.destination_list
                    .iter()
                    .position(|d| d == dest)
                    .and_then(|i| self.destination_filters.get(i).copied())
                    .unwrap_or(true)
            })
            .collect();

        self.destination_list = new_list;
        self.destination_filters = new_filters;
        if self.destination_list.is_empty() {
            self.destination_cursor = 0;
        } else if self.destination_cursor >= self.destination_list.len() {
            self.destination_cursor = self.destination_list.len() - 1;
        }
    }

    /// Move focus, keeping the search input's focus flag in sync.
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if focus == Focus::Search {
            self.search.focus();
        } else {
            self.search.blur();
        }
    }

    /// Whether a panel can take focus right now.
    pub fn focus_available(&self, focus: Focus) -> bool {
        match focus {
            Focus::Search | Focus::Filters | Focus::Board | Focus::AutoRefresh => true,
            Focus::Stations => !self.stations.is_empty(),
            Focus::Departures => !self.departures.is_empty(),
            Focus::Destinations => !self.destination_list.is_empty(),
            Focus::Journey => self.show_journey,
        }
    }

    /// Cycle focus forward (Tab), skipping unavailable panels.
    pub fn focus_next(&mut self) {
        self.cycle_focus(1);
    }

    /// Cycle focus backward (Shift+Tab).
    pub fn focus_prev(&mut self) {
        self.cycle_focus(-1);
    }

    fn cycle_focus(&mut self, step: isize) {
        let order = Focus::order();
        let len = order.len() as isize;
        let Some(mut idx) = order.iter().position(|f| *f == self.focus).map(|i| i as isize) else {
            return;
        };
        for _ in 0..order.len() {
            idx = (idx + step).rem_euclid(len);
            let candidate = order[idx as usize];
            if self.focus_available(candidate) {
                self.set_focus(candidate);
                return;
            }
        }
    }
}
