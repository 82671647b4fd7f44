//! The update engine: `(Model, Message) → commands`.
//!
//! Every state transition lives here. Gateway replies are checked against
//! the current intent before they are applied (stale-result rejection),
//! and each focus handler clamps its backing cursor before processing a
//! key, which closes the invisible-scroll class of bug against shrinking
//! lists.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::BoardSide;
use crate::error::ApiError;
use crate::models::{current_stop_index, Departure, Journey, Location};

use super::command::Command;
use super::message::Message;
use super::model::{Focus, Model, MODE_LABELS};

impl Model {
    /// Apply one message, returning the commands it provokes.
    pub fn update(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            Message::Resize(w, h) => {
                self.width = w;
                self.height = h;
                Vec::new()
            }
            Message::SearchResult { seq, result } => self.on_search_result(seq, result),
            Message::BoardResult {
                station_eva,
                result,
            } => self.on_board_result(station_eva, result),
            Message::JourneyResult { journey_id, result } => {
                self.on_journey_result(&journey_id, result)
            }
            Message::RefreshTick => self.on_refresh_tick(),
            Message::CountdownTick => {
                if self.auto_refresh {
                    vec![Command::ScheduleCountdownTick]
                } else {
                    Vec::new()
                }
            }
            Message::Key(key) => self.on_key(key),
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // GATEWAY RESULTS
    // ═══════════════════════════════════════════════════════════════

    fn on_search_result(
        &mut self,
        seq: u64,
        result: Result<Vec<Location>, ApiError>,
    ) -> Vec<Command> {
        // A reply for a superseded query is dropped; the loading flag
        // stays set until the reply for the current sequence arrives.
        if seq != self.search_seq {
            return Vec::new();
        }

        self.stations_loading = false;
        let locations = match result {
            Err(err) => {
                self.stations_err = Some(err);
                return Vec::new();
            }
            Ok(locations) => {
                self.stations_err = None;
                locations
            }
        };

        self.stations = locations;
        self.station_cursor = 0;

        if self.stations.is_empty() {
            return Vec::new();
        }

        // Auto-select the first hit and fetch its board.
        self.set_focus(Focus::Stations);
        let station = self.stations[0].clone();
        self.selected_station = Some(station.clone());
        self.departures.clear();
        self.departure_cursor = 0;
        self.departures_loading = true;
        self.departures_err = None;
        self.show_journey = false;
        self.journey = None;

        vec![self.fetch_board_command(station)]
    }

    fn on_board_result(
        &mut self,
        station_eva: i64,
        result: Result<Vec<Departure>, ApiError>,
    ) -> Vec<Command> {
        // Drop replies for a station the user has already left.
        let Some(selected) = &self.selected_station else {
            return Vec::new();
        };
        if station_eva != selected.eva {
            return Vec::new();
        }

        self.departures_loading = false;
        let departures = match result {
            Err(err) => {
                self.departures_err = Some(err);
                return Vec::new();
            }
            Ok(departures) => {
                self.departures_err = None;
                departures
            }
        };

        let had_data = !self.departures.is_empty();
        self.departures = departures;
        self.rebuild_destinations();

        if had_data && !self.selected_journey_id.is_empty() {
            // Follow the selected journey across the refresh.
            match self
                .departures
                .iter()
                .position(|d| d.journey_id == self.selected_journey_id)
            {
                Some(i) => self.departure_cursor = i,
                None => {
                    // The train left the board; the journey panel
                    // disappearing is the signal to the user.
                    self.show_journey = false;
                    self.journey = None;
                    self.selected_journey_id.clear();
                }
            }
        } else if !had_data {
            self.departure_cursor = 0;
        }

        if self.departure_cursor >= self.departures.len() {
            self.departure_cursor = self.departures.len().saturating_sub(1);
        }

        self.last_update = Some(Utc::now());
        Vec::new()
    }

    fn on_journey_result(
        &mut self,
        journey_id: &str,
        result: Result<Journey, ApiError>,
    ) -> Vec<Command> {
        if journey_id != self.selected_journey_id {
            return Vec::new();
        }

        self.journey_loading = false;
        let journey = match result {
            Err(err) => {
                self.journey_err = Some(err);
                return Vec::new();
            }
            Ok(journey) => {
                self.journey_err = None;
                journey
            }
        };

        let was_showing = self.show_journey && self.journey.is_some();
        let stop_count = journey.stops.len();
        self.journey = Some(journey);
        self.show_journey = true;

        // Clamp unconditionally: the stop list may have shrunk.
        if stop_count > 0 && self.journey_scroll >= stop_count {
            self.journey_scroll = stop_count - 1;
        }

        if was_showing && self.journey_manual_scroll {
            // Preserve the user's position (already clamped above).
        } else {
            self.journey_manual_scroll = false;
            self.journey_scroll = self
                .journey
                .as_ref()
                .map(|j| current_stop_index(&j.stops, Utc::now()))
                .unwrap_or(0);
        }

        Vec::new()
    }

    fn on_refresh_tick(&mut self) -> Vec<Command> {
        // A tick arriving after auto-refresh was switched off is absorbed
        // without scheduling a successor.
        if !self.auto_refresh {
            return Vec::new();
        }

        let mut cmds = vec![Command::ScheduleRefreshTick];

        // Silent refresh: existing data stays visible until replaced.
        if let Some(station) = self.selected_station.clone() {
            cmds.push(self.fetch_board_command(station));
        }
        if self.show_journey && !self.selected_journey_id.is_empty() {
            cmds.push(Command::FetchJourney {
                journey_id: self.selected_journey_id.clone(),
            });
        }

        cmds
    }

    // ═══════════════════════════════════════════════════════════════
    // KEY DISPATCH
    // ═══════════════════════════════════════════════════════════════

    fn on_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Command::Quit];
        }

        match self.focus {
            Focus::Search => self.search_keys(key),
            Focus::Filters => self.filter_keys(key),
            Focus::Board => self.board_keys(key),
            Focus::AutoRefresh => self.auto_refresh_keys(key),
            Focus::Stations => self.station_keys(key),
            Focus::Departures => self.departure_keys(key),
            Focus::Destinations => self.destination_keys(key),
            Focus::Journey => self.journey_keys(key),
        }
    }

    fn search_keys(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Enter => {
                let query = self.search.value().trim().to_string();
                if query.is_empty() {
                    return Vec::new();
                }
                self.search_seq += 1;
                self.stations_loading = true;
                self.stations_err = None;
                vec![Command::SearchStations {
                    query,
                    seq: self.search_seq,
                }]
            }
            KeyCode::Esc => {
                self.search.clear();
                Vec::new()
            }
            KeyCode::Tab => {
                self.focus_next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Vec::new()
            }
            KeyCode::Char(c) => {
                self.search.insert_char(c);
                Vec::new()
            }
            KeyCode::Backspace => {
                self.search.backspace();
                Vec::new()
            }
            KeyCode::Delete => {
                self.search.delete();
                Vec::new()
            }
            KeyCode::Left => {
                self.search.move_left();
                Vec::new()
            }
            KeyCode::Right => {
                self.search.move_right();
                Vec::new()
            }
            KeyCode::Home => {
                self.search.move_home();
                Vec::new()
            }
            KeyCode::End => {
                self.search.move_end();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn filter_keys(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.filter_cursor = self.filter_cursor.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.filter_cursor + 1 < MODE_LABELS.len() {
                    self.filter_cursor += 1;
                }
                Vec::new()
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.mode_filters[self.filter_cursor] = !self.mode_filters[self.filter_cursor];
                self.refetch_board()
            }
            KeyCode::Char('a') => {
                let any_off = self.mode_filters.iter().any(|f| !*f);
                for f in &mut self.mode_filters {
                    *f = any_off;
                }
                self.refetch_board()
            }
            KeyCode::Tab => {
                self.focus_next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Vec::new()
            }
            KeyCode::Esc | KeyCode::Char('/') => {
                self.set_focus(Focus::Search);
                Vec::new()
            }
            KeyCode::Char('q') => vec![Command::Quit],
            _ => Vec::new(),
        }
    }

    fn board_keys(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.board_cursor = self.board_cursor.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.board_cursor < 1 {
                    self.board_cursor += 1;
                }
                Vec::new()
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.board_mode = if self.board_cursor == 0 {
                    BoardSide::Departures
                } else {
                    BoardSide::Arrivals
                };
                self.refetch_board()
            }
            KeyCode::Tab => {
                self.focus_next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Vec::new()
            }
            KeyCode::Esc | KeyCode::Char('/') => {
                self.set_focus(Focus::Search);
                Vec::new()
            }
            KeyCode::Char('q') => vec![Command::Quit],
            _ => Vec::new(),
        }
    }

    fn auto_refresh_keys(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.auto_refresh = !self.auto_refresh;
                if !self.auto_refresh {
                    return Vec::new();
                }

                // Refresh immediately on enable; the ticks keep it going.
                let mut cmds = vec![Command::ScheduleRefreshTick, Command::ScheduleCountdownTick];
                if let Some(station) = self.selected_station.clone() {
                    cmds.push(self.fetch_board_command(station));
                }
                if self.show_journey && !self.selected_journey_id.is_empty() {
                    cmds.push(Command::FetchJourney {
                        journey_id: self.selected_journey_id.clone(),
                    });
                }
                cmds
            }
            KeyCode::Tab => {
                self.focus_next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Vec::new()
            }
            KeyCode::Esc | KeyCode::Char('/') => {
                self.set_focus(Focus::Search);
                Vec::new()
            }
            KeyCode::Char('q') => vec![Command::Quit],
            _ => Vec::new(),
        }
    }

    fn station_keys(&mut self, key: KeyEvent) -> Vec<Command> {
        // Clamp before handling: the list may have shrunk under the cursor.
        if !self.stations.is_empty() && self.station_cursor >= self.stations.len() {
            self.station_cursor = self.stations.len() - 1;
        }

        let page = self.page_size();
        match key.code {
            KeyCode::Char('q') => vec![Command::Quit],
            KeyCode::Tab => {
                self.focus_next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Vec::new()
            }
            KeyCode::Esc | KeyCode::Char('/') => {
                self.set_focus(Focus::Search);
                Vec::new()
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.station_cursor + 1 < self.stations.len() {
                    self.station_cursor += 1;
                }
                Vec::new()
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.station_cursor = self.station_cursor.saturating_sub(1);
                Vec::new()
            }
            KeyCode::PageDown => {
                if !self.stations.is_empty() {
                    self.station_cursor =
                        (self.station_cursor + page).min(self.stations.len() - 1);
                }
                Vec::new()
            }
            KeyCode::PageUp => {
                self.station_cursor = self.station_cursor.saturating_sub(page);
                Vec::new()
            }
            KeyCode::Home => {
                self.station_cursor = 0;
                Vec::new()
            }
            KeyCode::End => {
                if !self.stations.is_empty() {
                    self.station_cursor = self.stations.len() - 1;
                }
                Vec::new()
            }
            KeyCode::Enter => {
                if self.stations.is_empty() {
                    return Vec::new();
                }
                let station = self.stations[self.station_cursor].clone();
                self.selected_station = Some(station.clone());
                self.departures_loading = true;
                self.departures_err = None;
                self.departures.clear();
                self.departure_cursor = 0;
                self.show_journey = false;
                self.journey = None;
                vec![self.fetch_board_command(station)]
            }
            _ => Vec::new(),
        }
    }

    fn departure_keys(&mut self, key: KeyEvent) -> Vec<Command> {
        if !self.departures.is_empty() && self.departure_cursor >= self.departures.len() {
            self.departure_cursor = self.departures.len() - 1;
        }

        let page = self.page_size();
        match key.code {
            KeyCode::Char('q') => vec![Command::Quit],
            KeyCode::Tab => {
                self.focus_next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Vec::new()
            }
            KeyCode::Esc => {
                if self.show_journey {
                    self.show_journey = false;
                    self.journey = None;
                    self.selected_journey_id.clear();
                } else {
                    self.set_focus(Focus::Stations);
                }
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.set_focus(Focus::Search);
                Vec::new()
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.departure_cursor + 1 < self.departures.len() {
                    self.departure_cursor += 1;
                }
                Vec::new()
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.departure_cursor = self.departure_cursor.saturating_sub(1);
                Vec::new()
            }
            KeyCode::PageDown => {
                if !self.departures.is_empty() {
                    self.departure_cursor =
                        (self.departure_cursor + page).min(self.departures.len() - 1);
                }
                Vec::new()
            }
            KeyCode::PageUp => {
                self.departure_cursor = self.departure_cursor.saturating_sub(page);
                Vec::new()
            }
            KeyCode::Home => {
                self.departure_cursor = 0;
                Vec::new()
            }
            KeyCode::End => {
                if !self.departures.is_empty() {
                    self.departure_cursor = self.departures.len() - 1;
                }
                Vec::new()
            }
            KeyCode::Enter => {
                if self.departures.is_empty() {
                    return Vec::new();
                }
                let journey_id = self.departures[self.departure_cursor].journey_id.clone();
                if journey_id.is_empty() {
                    return Vec::new();
                }
                self.selected_journey_id = journey_id.clone();
                self.journey_loading = true;
                self.journey_err = None;
                self.journey = None;
                vec![Command::FetchJourney { journey_id }]
            }
            _ => Vec::new(),
        }
    }

    fn destination_keys(&mut self, key: KeyEvent) -> Vec<Command> {
        if !self.destination_list.is_empty()
            && self.destination_cursor >= self.destination_list.len()
        {
            self.destination_cursor = self.destination_list.len() - 1;
        }

        let page = self.page_size();
        match key.code {
            KeyCode::Char('q') => vec![Command::Quit],
            KeyCode::Char('j') | KeyCode::Down => {
                if self.destination_cursor + 1 < self.destination_list.len() {
                    self.destination_cursor += 1;
                }
                Vec::new()
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.destination_cursor = self.destination_cursor.saturating_sub(1);
                Vec::new()
            }
            KeyCode::PageDown => {
                if !self.destination_list.is_empty() {
                    self.destination_cursor =
                        (self.destination_cursor + page).min(self.destination_list.len() - 1);
                }
                Vec::new()
            }
            KeyCode::PageUp => {
                self.destination_cursor = self.destination_cursor.saturating_sub(page);
                Vec::new()
            }
            KeyCode::Home => {
                self.destination_cursor = 0;
                Vec::new()
            }
            KeyCode::End => {
                if !self.destination_list.is_empty() {
                    self.destination_cursor = self.destination_list.len() - 1;
                }
                Vec::new()
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(f) = self.destination_filters.get_mut(self.destination_cursor) {
                    *f = !*f;
                }
                Vec::new()
            }
            KeyCode::Char('a') => {
                let any_off = self.destination_filters.iter().any(|f| !*f);
                for f in &mut self.destination_filters {
                    *f = any_off;
                }
                Vec::new()
            }
            KeyCode::Tab => {
                self.focus_next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Vec::new()
            }
            KeyCode::Esc | KeyCode::Char('/') => {
                self.set_focus(Focus::Search);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn journey_keys(&mut self, key: KeyEvent) -> Vec<Command> {
        let stop_count = self.journey.as_ref().map(|j| j.stops.len()).unwrap_or(0);
        if stop_count > 0 && self.journey_scroll >= stop_count {
            self.journey_scroll = stop_count - 1;
        }

        // Journey rows are denser; pages are smaller.
        let page = ((self.height as usize).saturating_sub(10) / 3).max(5);

        match key.code {
            KeyCode::Char('q') => vec![Command::Quit],
            KeyCode::Tab => {
                self.focus_next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.set_focus(Focus::Search);
                Vec::new()
            }
            KeyCode::Esc => {
                self.set_focus(Focus::Departures);
                Vec::new()
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if stop_count > 0 && self.journey_scroll + 1 < stop_count {
                    self.journey_scroll += 1;
                    self.journey_manual_scroll = true;
                }
                Vec::new()
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.journey_scroll > 0 {
                    self.journey_scroll -= 1;
                    self.journey_manual_scroll = true;
                }
                Vec::new()
            }
            KeyCode::PageDown => {
                if stop_count > 0 {
                    self.journey_scroll = (self.journey_scroll + page).min(stop_count - 1);
                    self.journey_manual_scroll = true;
                }
                Vec::new()
            }
            KeyCode::PageUp => {
                if stop_count > 0 {
                    self.journey_scroll = self.journey_scroll.saturating_sub(page);
                    self.journey_manual_scroll = true;
                }
                Vec::new()
            }
            KeyCode::Home => {
                self.journey_scroll = 0;
                self.journey_manual_scroll = true;
                Vec::new()
            }
            KeyCode::End => {
                if stop_count > 0 {
                    self.journey_scroll = stop_count - 1;
                    self.journey_manual_scroll = true;
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // SHARED HELPERS
    // ═══════════════════════════════════════════════════════════════

    fn page_size(&self) -> usize {
        (self.height as usize).saturating_sub(10).max(1)
    }

    fn fetch_board_command(&self, station: Location) -> Command {
        Command::FetchBoard {
            station,
            modes: self.selected_modes(),
            side: self.board_mode,
        }
    }

    /// Re-fetch the board after a filter or mode change.
    fn refetch_board(&mut self) -> Vec<Command> {
        let Some(station) = self.selected_station.clone() else {
            return Vec::new();
        };
        self.departures_loading = true;
        self.departures_err = None;
        self.departures.clear();
        self.departure_cursor = 0;
        self.show_journey = false;
        self.journey = None;
        vec![self.fetch_board_command(station)]
    }
}
