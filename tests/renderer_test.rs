//! Renderer tests against ratatui's TestBackend.
//!
//! The renderer is a pure function of (model, clock, viewport); these
//! tests assert on the character content of the produced buffer.

use chrono::{TimeZone, Utc};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use railboard::api::BoardSide;
use railboard::models::{Departure, Journey, Location, Stop};
use railboard::tui::message::Message;
use railboard::tui::model::{Focus, Model};
use railboard::tui::view;
use railboard::ApiError;

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                out.push_str(cell.symbol());
            }
        }
        out.push('\n');
    }
    out
}

fn draw(model: &Model, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 17, 0, 0).unwrap();
    terminal
        .draw(|frame| view::render(frame, model, now))
        .unwrap();
    buffer_text(&terminal)
}

fn sized_model(width: u16, height: u16) -> Model {
    let mut model = Model::new();
    model.update(Message::Resize(width, height));
    model
}

fn location(name: &str, eva: i64) -> Location {
    Location {
        eva,
        id: String::new(),
        name: name.to_string(),
        lat: 0.0,
        lon: 0.0,
        kind: "ST".to_string(),
        products: Vec::new(),
    }
}

fn departure(journey_id: &str, destination: &str, delay: i64) -> Departure {
    Departure {
        journey_id: journey_id.to_string(),
        train_type: "ICE".into(),
        line: "ICE 1537".into(),
        train_short: "ICE".into(),
        train_mid: String::new(),
        train_long: String::new(),
        stop_eva: String::new(),
        destination: destination.to_string(),
        platform: "7".into(),
        rt_platform: String::new(),
        via: Vec::new(),
        sched_time: Some(Utc.with_ymd_and_hms(2024, 7, 1, 16, 55, 0).unwrap()),
        rt_time: None,
        time: Some(Utc.with_ymd_and_hms(2024, 7, 1, 16, 55, 0).unwrap()),
        delay,
        cancelled: false,
        messages: Vec::new(),
    }
}

#[test]
fn zero_size_renders_placeholder() {
    let model = Model::new();
    let text = draw(&model, 40, 10);
    assert!(text.contains("Loading..."));
}

#[test]
fn initial_frame_shows_hints_everywhere() {
    let model = sized_model(120, 40);
    let text = draw(&model, 120, 40);

    assert!(text.contains("railboard"));
    assert!(text.contains("Search:"));
    assert!(text.contains("STATIONS"));
    assert!(text.contains("Type a station name and press Enter"));
    assert!(text.contains("DEPARTURES"));
    assert!(text.contains("Select a station to view departures"));
    assert!(text.contains("DESTINATIONS"));
    assert!(text.contains("No data"));
    // Filter chips.
    assert!(text.contains("[ICE]"));
    assert!(text.contains("[Departure]"));
    assert!(text.contains("Auto-refresh 30s"));
    // Status bar for the search focus.
    assert!(text.contains("Enter:search"));
}

#[test]
fn loading_and_error_states_render_inline() {
    let mut model = sized_model(120, 40);
    model.stations_loading = true;
    let text = draw(&model, 120, 40);
    assert!(text.contains("Searching..."));

    model.stations_loading = false;
    model.stations_err = Some(ApiError::Timeout);
    let text = draw(&model, 120, 40);
    assert!(text.contains("Error: request timed out"));
}

#[test]
fn station_list_marks_cursor() {
    let mut model = sized_model(120, 40);
    model.stations = vec![
        location("Frankfurt(Main)Hbf", 8000105),
        location("Frankfurt(Main)Süd", 8002041),
    ];
    model.station_cursor = 1;
    model.set_focus(Focus::Stations);

    let text = draw(&model, 120, 40);
    assert!(text.contains("▶ STATIONS"));
    assert!(text.contains("> Frankfurt(Main)Süd"));
    assert!(text.contains("   Frankfurt(Main)Hbf"));
    // Status bar shows the 1-indexed position.
    assert!(text.contains("2/2"));
}

#[test]
fn board_renders_rows_and_delays() {
    let mut model = sized_model(120, 40);
    model.selected_station = Some(location("Frankfurt(Main)Hbf", 8000105));
    model.departures = vec![
        departure("j1", "Berlin Hbf", 0),
        departure("j2", "Hamburg-Altona", 12),
    ];
    model.rebuild_destinations();
    model.set_focus(Focus::Departures);

    let text = draw(&model, 120, 40);
    assert!(text.contains("DEPARTURES for Frankfurt(Main)Hbf"));
    // 16:55 UTC is 18:55 in Berlin.
    assert!(text.contains("18:55"));
    assert!(text.contains("+12"));
    assert!(text.contains("Berlin Hbf"));
    assert!(text.contains("Pl.7"));
    // Destination chips from the board.
    assert!(text.contains("[Berlin Hbf]"));
    assert!(text.contains("[Hamburg-Altona]"));
}

#[test]
fn cancelled_entries_are_flagged() {
    let mut model = sized_model(120, 40);
    model.selected_station = Some(location("Frankfurt(Main)Hbf", 8000105));
    let mut dep = departure("j1", "Berlin Hbf", 0);
    dep.cancelled = true;
    model.departures = vec![dep];
    model.rebuild_destinations();

    let text = draw(&model, 120, 40);
    assert!(text.contains("Berlin Hbf [X]"));
}

#[test]
fn journey_panel_and_map_render_when_open() {
    let mut model = sized_model(140, 45);
    model.selected_station = Some(location("Frankfurt(Main)Hbf", 8000105));
    model.departures = vec![departure("j1", "Berlin Hbf", 0)];
    model.rebuild_destinations();
    model.selected_journey_id = "j1".to_string();
    model.show_journey = true;

    let mk_stop = |name: &str, h: u32, m: u32, lat: f64, lon: f64| Stop {
        eva: 0,
        name: name.to_string(),
        lat,
        lon,
        platform: "5".to_string(),
        rt_platform: String::new(),
        sched_arr: Some(Utc.with_ymd_and_hms(2024, 7, 1, h, m, 0).unwrap()),
        rt_arr: None,
        arr: Some(Utc.with_ymd_and_hms(2024, 7, 1, h, m, 0).unwrap()),
        sched_dep: Some(Utc.with_ymd_and_hms(2024, 7, 1, h, m + 2, 0).unwrap()),
        rt_dep: None,
        dep: Some(Utc.with_ymd_and_hms(2024, 7, 1, h, m + 2, 0).unwrap()),
        arr_delay: 0,
        dep_delay: 0,
        delay: 0,
        cancelled: false,
        additional: false,
    };

    model.journey = Some(Journey {
        id: "j1".to_string(),
        name: "ICE 1537".to_string(),
        train_type: "ICE".to_string(),
        trip_no: "1537".to_string(),
        operator: "DB Fernverkehr AG".to_string(),
        day: None,
        cancelled: false,
        stops: vec![
            mk_stop("Frankfurt(Main)Hbf", 16, 30, 50.107, 8.663),
            mk_stop("Hanau Hbf", 16, 45, 50.120, 8.929),
            mk_stop("Fulda", 17, 10, 50.554, 9.684),
        ],
        messages: Vec::new(),
    });

    let text = draw(&model, 140, 45);
    assert!(text.contains("JOURNEY: ICE 1537"));
    assert!(text.contains("Frankfurt(Main)Hbf"));
    assert!(text.contains("Fulda"));
    // Route glyphs and the legend.
    assert!(text.contains('┌'));
    assert!(text.contains('└'));
    assert!(text.contains("Current stop"));
    // The map projects at least one marker.
    assert!(text.contains('◉') || text.contains('●') || text.contains('○'));
}

#[test]
fn arrivals_mode_changes_title() {
    let mut model = sized_model(120, 40);
    model.board_mode = BoardSide::Arrivals;
    model.selected_station = Some(location("Frankfurt(Main)Hbf", 8000105));
    model.departures_loading = true;

    let text = draw(&model, 120, 40);
    assert!(text.contains("ARRIVALS for Frankfurt(Main)Hbf"));
    assert!(text.contains("Loading departures..."));
}

#[test]
fn last_update_line_shows_countdown() {
    let mut model = sized_model(120, 40);
    // Rendered "now" is 17:00:00 UTC; the last update 20 seconds earlier.
    model.last_update = Some(Utc.with_ymd_and_hms(2024, 7, 1, 16, 59, 40).unwrap());
    model.auto_refresh = true;

    let text = draw(&model, 120, 40);
    // 18:59:40 Berlin time, 10 seconds until the next 30 s refresh.
    assert!(text.contains("Last update: 18:59:40"));
    assert!(text.contains("(refresh in 10s)"));
}

#[test]
fn narrow_terminal_does_not_panic() {
    let mut model = sized_model(30, 8);
    model.stations = (0..50).map(|i| location(&format!("Station {i}"), i)).collect();
    model.selected_station = Some(location("Station 0", 0));
    model.departures = (0..50)
        .map(|i| departure(&format!("j{i}"), "Somewhere With A Long Name", i))
        .collect();
    model.rebuild_destinations();

    for (w, h) in [(30u16, 8u16), (10, 4), (4, 2), (80, 3)] {
        let mut m = model.clone();
        m.update(Message::Resize(w, h));
        let _ = draw(&m, w, h);
    }
}
