//! The renderer: a pure function from model (and clock) to a styled frame.
//!
//! Layout: header band, search bar, filter band (three bordered boxes),
//! main panels (stations left, board/destinations/journey/map right), and
//! a status bar with key hints. All geometry helpers are plain functions
//! so they can be tested without a terminal.

use chrono::{DateTime, Utc};
use chrono_tz::Europe::Berlin;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::api::BoardSide;
use crate::models::{current_stop_index, Departure, Stop};

use super::command::REFRESH_INTERVAL;
use super::model::{Focus, Model, MODE_LABELS};
use super::routemap::render_route_map;
use super::theme;

/// Render one frame.
pub fn render(frame: &mut Frame, model: &Model, now: DateTime<Utc>) {
    if model.width == 0 || model.height == 0 {
        frame.render_widget(Paragraph::new("Loading..."), frame.area());
        return;
    }

    let filter_height = if model.last_update.is_some() { 4 } else { 3 };
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(filter_height),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(frame.area());

    render_header(frame, chunks[0]);
    render_search_bar(frame, model, chunks[1]);
    render_filter_band(frame, model, chunks[2], now);
    render_panels(frame, model, chunks[3], now);
    render_status_bar(frame, model, chunks[4]);
}

// ═══════════════════════════════════════════════════════════════════
// GEOMETRY HELPERS
// ═══════════════════════════════════════════════════════════════════

/// Window of a list to draw so that the cursor stays visible and roughly
/// centered. Guarantees `start <= cursor < end <= total` and
/// `end - start <= max_visible`.
pub fn visible_range(cursor: usize, total: usize, max_visible: usize) -> (usize, usize) {
    if total <= max_visible {
        return (0, total);
    }
    let start = cursor
        .saturating_sub(max_visible / 2)
        .min(total - max_visible);
    (start, start + max_visible)
}

/// Cut a string to `width` characters with a `~` marker; widths of three
/// or fewer cut hard.
pub fn truncate(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width <= 3 {
        return s.chars().take(width).collect();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('~');
    out
}

/// One glyph per row of a vertical scrollbar: a prominent thumb over a
/// light track. A list that fits entirely gets a solid thumb.
pub fn scrollbar_glyphs(cursor: usize, total: usize, height: usize) -> Vec<Span<'static>> {
    if height == 0 {
        return Vec::new();
    }
    if total == 0 {
        return vec![Span::raw(" "); height];
    }
    if total <= height {
        return vec![Span::styled("█", theme::muted()); height];
    }

    let thumb_size = (((height * height) as f64 / total as f64).round() as usize).max(1);
    let ratio = cursor as f64 / (total - 1) as f64;
    let thumb_start =
        ((ratio * (height - thumb_size) as f64).round() as usize).min(height - thumb_size);

    (0..height)
        .map(|i| {
            if i >= thumb_start && i < thumb_start + thumb_size {
                Span::styled("█", theme::selected())
            } else {
                Span::styled("│", theme::muted())
            }
        })
        .collect()
}

/// Styled fixed-width delay field for a list row.
fn delay_span(delay: i64) -> Span<'static> {
    if delay == 0 {
        return Span::raw("    ");
    }
    if delay > 0 {
        let s = format!("{delay:+4}");
        if delay >= 10 {
            return Span::styled(s, theme::delay_high());
        }
        return Span::styled(s, theme::delay());
    }
    Span::styled(format!("{delay:4}"), theme::on_time())
}

fn line_width(line: &Line) -> usize {
    line.spans.iter().map(|s| s.content.chars().count()).sum()
}

/// Pad a line with spaces up to `width` characters.
fn pad_line(line: &mut Line<'static>, width: usize) {
    let current = line_width(line);
    if current < width {
        line.spans.push(Span::raw(" ".repeat(width - current)));
    }
}

/// Combine content rows with a scrollbar column into the final lines of a
/// list panel: title, then `max_visible` rows.
fn assemble_list(
    title: Line<'static>,
    mut rows: Vec<Line<'static>>,
    cursor: usize,
    total: usize,
    content_width: usize,
    max_visible: usize,
) -> Vec<Line<'static>> {
    while rows.len() < max_visible {
        rows.push(Line::default());
    }
    let glyphs = scrollbar_glyphs(cursor, total, max_visible);

    let mut lines = vec![title];
    for (i, mut row) in rows.into_iter().enumerate() {
        pad_line(&mut row, content_width);
        if let Some(glyph) = glyphs.get(i) {
            row.spans.push(Span::raw(" "));
            row.spans.push(glyph.clone());
        }
        lines.push(row);
    }
    lines
}

fn fmt_hm(t: Option<DateTime<Utc>>) -> String {
    match t {
        Some(t) => t.with_timezone(&Berlin).format("%H:%M").to_string(),
        None => "     ".to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════
// BANDS
// ═══════════════════════════════════════════════════════════════════

fn render_header(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" ▚▚ railboard ", theme::logo()),
        Span::styled("— Deutsche Bahn live boards", theme::muted()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_search_bar(frame: &mut Frame, model: &Model, area: Rect) {
    let focused = model.focus == Focus::Search;
    let block = panel_block(focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = vec![Span::styled("Search: ", theme::header())];
    let value = model.search.value();

    if value.is_empty() && !focused {
        spans.push(Span::styled("Search station...", theme::muted()));
    } else if focused {
        let cursor = model.search.cursor();
        let before: String = value.chars().take(cursor).collect();
        let at: String = value.chars().skip(cursor).take(1).collect();
        let after: String = value.chars().skip(cursor + 1).collect();
        spans.push(Span::raw(before));
        spans.push(Span::styled(
            if at.is_empty() { " ".to_string() } else { at },
            theme::time().add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::raw(after));
    } else {
        spans.push(Span::raw(value.to_string()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// A single filter chip. Active chips wear brackets; the cursor is drawn
/// in reverse video.
fn chip(label: &str, active: bool, focused: bool) -> Span<'static> {
    let text = if active {
        format!("[{label}]")
    } else {
        format!(" {label} ")
    };
    if focused {
        Span::styled(text, theme::chip_cursor())
    } else if active {
        Span::styled(text, theme::line())
    } else {
        Span::styled(text, theme::muted())
    }
}

fn render_filter_band(frame: &mut Frame, model: &Model, area: Rect, now: DateTime<Utc>) {
    let mut boxes_area = area;

    if let Some(last_update) = model.last_update {
        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).split(area);
        boxes_area = rows[1];

        let mut text = format!(
            "  Last update: {}",
            last_update.with_timezone(&Berlin).format("%H:%M:%S")
        );
        if model.auto_refresh {
            let elapsed = (now - last_update).num_seconds();
            let remaining = (REFRESH_INTERVAL.as_secs() as i64 - elapsed).max(0);
            text.push_str(&format!("  (refresh in {remaining}s)"));
        }
        frame.render_widget(
            Paragraph::new(Span::styled(text, theme::muted())),
            rows[0],
        );
    }

    let modes_width = MODE_LABELS
        .iter()
        .map(|(_, label)| label.chars().count() + 2)
        .sum::<usize>()
        + MODE_LABELS.len()
        + 1;
    let cols = Layout::horizontal([
        Constraint::Length(modes_width as u16),
        Constraint::Length(23),
        Constraint::Length(20),
        Constraint::Min(0),
    ])
    .split(boxes_area);

    // Transport modes.
    let mut mode_spans = Vec::new();
    for (i, (_, label)) in MODE_LABELS.iter().enumerate() {
        let focused = model.focus == Focus::Filters && model.filter_cursor == i;
        mode_spans.push(chip(label, model.mode_filters[i], focused));
        if i + 1 < MODE_LABELS.len() {
            mode_spans.push(Span::raw(" "));
        }
    }
    render_boxed_line(frame, cols[0], Line::from(mode_spans), model.focus == Focus::Filters);

    // Departure / arrival.
    let board_line = Line::from(vec![
        chip(
            "Departure",
            model.board_mode == BoardSide::Departures,
            model.focus == Focus::Board && model.board_cursor == 0,
        ),
        Span::raw(" "),
        chip(
            "Arrival",
            model.board_mode == BoardSide::Arrivals,
            model.focus == Focus::Board && model.board_cursor == 1,
        ),
    ]);
    render_boxed_line(frame, cols[1], board_line, model.focus == Focus::Board);

    // Auto-refresh.
    let refresh_line = Line::from(chip(
        "Auto-refresh 30s",
        model.auto_refresh,
        model.focus == Focus::AutoRefresh,
    ));
    render_boxed_line(frame, cols[2], refresh_line, model.focus == Focus::AutoRefresh);
}

fn render_boxed_line(frame: &mut Frame, area: Rect, line: Line, focused: bool) {
    let block = panel_block(focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(line), inner);
}

fn panel_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border()
        })
}

// ═══════════════════════════════════════════════════════════════════
// MAIN PANELS
// ═══════════════════════════════════════════════════════════════════

fn render_panels(frame: &mut Frame, model: &Model, area: Rect, now: DateTime<Utc>) {
    let cols =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).split(area);

    // Left: stations.
    let left_block = panel_block(model.focus == Focus::Stations);
    let left_inner = left_block.inner(cols[0]);
    frame.render_widget(left_block, cols[0]);
    let lines = station_lines(model, left_inner.width as usize, left_inner.height as usize);
    frame.render_widget(Paragraph::new(lines), left_inner);

    // Right: departures / destinations / journey / map.
    let right_focused = matches!(
        model.focus,
        Focus::Departures | Focus::Destinations | Focus::Journey
    );
    let right_block = panel_block(right_focused);
    let right_inner = right_block.inner(cols[1]);
    frame.render_widget(right_block, cols[1]);
    render_right_panel(frame, model, right_inner, now);
}

fn render_right_panel(frame: &mut Frame, model: &Model, area: Rect, now: DateTime<Utc>) {
    let dest_width = ((area.width as usize * 28 / 100).max(14)) as u16;

    let journey_open = model.show_journey && model.journey.is_some();
    if !journey_open {
        let cols = Layout::horizontal([
            Constraint::Min(20),
            Constraint::Length(1),
            Constraint::Length(dest_width),
        ])
        .split(area);
        render_departure_list(frame, model, cols[0]);
        render_vertical_separator(frame, cols[1]);
        render_destination_panel(frame, model, cols[2]);
        return;
    }

    let rows = Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    let top = Layout::horizontal([
        Constraint::Min(20),
        Constraint::Length(1),
        Constraint::Length(dest_width),
    ])
    .split(rows[0]);
    render_departure_list(frame, model, top[0]);
    render_vertical_separator(frame, top[1]);
    render_destination_panel(frame, model, top[2]);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "─".repeat(rows[1].width as usize),
            theme::muted(),
        )),
        rows[1],
    );

    let bottom = Layout::horizontal([
        Constraint::Percentage(55),
        Constraint::Length(1),
        Constraint::Min(10),
    ])
    .split(rows[2]);
    render_journey_detail(frame, model, bottom[0], now);
    render_vertical_separator(frame, bottom[1]);

    if let Some(journey) = &model.journey {
        let current = current_stop_index(&journey.stops, now);
        let map_lines = render_route_map(
            &journey.stops,
            current,
            bottom[2].width as usize,
            bottom[2].height as usize,
        );
        frame.render_widget(Paragraph::new(map_lines), bottom[2]);
    }

    let legend = Line::from(vec![
        Span::raw(" "),
        Span::styled(" ", theme::current_stop()),
        Span::styled(" Current stop   ", theme::muted()),
        Span::styled(" ", theme::scroll_position()),
        Span::styled(" Cursor", theme::muted()),
    ]);
    frame.render_widget(Paragraph::new(legend), rows[3]);
}

fn render_vertical_separator(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = (0..area.height)
        .map(|_| Line::from(Span::styled("│", theme::muted())))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

// ═══════════════════════════════════════════════════════════════════
// LIST PANELS
// ═══════════════════════════════════════════════════════════════════

fn panel_title(base: String, focused: bool) -> Line<'static> {
    let text = if focused { format!("▶ {base}") } else { base };
    Line::from(Span::styled(text, theme::header()))
}

fn station_lines(model: &Model, width: usize, height: usize) -> Vec<Line<'static>> {
    let title = panel_title("STATIONS".to_string(), model.focus == Focus::Stations);

    if model.stations_loading {
        return vec![title, Line::from(Span::styled(" Searching...", theme::loading()))];
    }
    if let Some(err) = &model.stations_err {
        return vec![
            title,
            Line::from(Span::styled(format!(" Error: {err}"), theme::error())),
        ];
    }
    if model.stations.is_empty() {
        return vec![
            title,
            Line::from(Span::styled(
                " Type a station name and press Enter",
                theme::muted(),
            )),
        ];
    }

    let content_width = width.saturating_sub(2);
    let max_visible = height.saturating_sub(2).max(1);
    let (start, end) = visible_range(model.station_cursor, model.stations.len(), max_visible);

    let rows: Vec<Line<'static>> = (start..end)
        .map(|i| {
            let name = truncate(&model.stations[i].name, content_width.saturating_sub(4));
            if i == model.station_cursor {
                Line::from(Span::styled(format!(" > {name}"), theme::selected()))
            } else {
                Line::from(Span::raw(format!("   {name}")))
            }
        })
        .collect();

    assemble_list(
        title,
        rows,
        model.station_cursor,
        model.stations.len(),
        content_width,
        max_visible,
    )
}

fn render_departure_list(frame: &mut Frame, model: &Model, area: Rect) {
    let lines = departure_lines(model, area.width as usize, area.height as usize);
    frame.render_widget(Paragraph::new(lines), area);
}

fn departure_lines(model: &Model, width: usize, height: usize) -> Vec<Line<'static>> {
    let mut base = match model.board_mode {
        BoardSide::Departures => "DEPARTURES".to_string(),
        BoardSide::Arrivals => "ARRIVALS".to_string(),
    };
    if let Some(station) = &model.selected_station {
        base.push_str(" for ");
        base.push_str(&truncate(&station.name, width.saturating_sub(20)));
    }
    if !model.destination_filters.is_empty() {
        let active = model.destination_filters.iter().filter(|f| **f).count();
        if active < model.destination_filters.len() {
            base.push_str(&format!(" ({active}/{} dest)", model.destination_filters.len()));
        }
    }
    let title = panel_title(base, model.focus == Focus::Departures);

    if model.departures_loading {
        return vec![
            title,
            Line::from(Span::styled(" Loading departures...", theme::loading())),
        ];
    }
    if let Some(err) = &model.departures_err {
        return vec![
            title,
            Line::from(Span::styled(format!(" Error: {err}"), theme::error())),
        ];
    }
    if model.selected_station.is_none() {
        return vec![
            title,
            Line::from(Span::styled(
                " Select a station to view departures",
                theme::muted(),
            )),
        ];
    }

    let deps = model.filtered_departures();
    if deps.is_empty() {
        return vec![
            title,
            Line::from(Span::styled(" No departures found", theme::muted())),
        ];
    }

    let content_width = width.saturating_sub(2);
    let max_visible = height.saturating_sub(2).max(1);
    let (start, end) = visible_range(model.departure_cursor.min(deps.len() - 1), deps.len(), max_visible);

    let rows: Vec<Line<'static>> = (start..end)
        .map(|i| {
            let selected = i == model.departure_cursor && model.focus == Focus::Departures;
            departure_line(deps[i], content_width, selected)
        })
        .collect();

    assemble_list(
        title,
        rows,
        model.departure_cursor.min(deps.len() - 1),
        deps.len(),
        content_width,
        max_visible,
    )
}

fn departure_line(dep: &Departure, width: usize, selected: bool) -> Line<'static> {
    let time_str = if dep.time.is_some() {
        fmt_hm(dep.time)
    } else {
        "??:??".to_string()
    };

    let line_label = if dep.line.is_empty() {
        &dep.train_short
    } else {
        &dep.line
    };
    let line_str = format!("{:<10}", truncate(line_label, 10));

    let platform = dep.effective_platform();
    let platform_str = if platform.is_empty() {
        "       ".to_string()
    } else {
        format!("Pl.{:<3} ", truncate(platform, 3))
    };

    // time + delay + line + platform + separators.
    let fixed = 5 + 1 + 4 + 2 + 10 + 2 + 7;
    let max_dest = width.saturating_sub(fixed + 4);
    let dest = truncate(&dep.destination, max_dest);

    let mut spans = vec![if selected {
        Span::styled(">", theme::selected())
    } else {
        Span::raw(" ")
    }];

    if dep.cancelled {
        spans.extend([
            Span::styled(time_str, theme::time()),
            Span::raw(" "),
            delay_span(dep.delay),
            Span::raw("  "),
            Span::styled(line_str, theme::cancelled()),
            Span::raw("  "),
            Span::styled(platform_str, theme::platform()),
            Span::raw(" "),
            Span::styled(format!("{dest} [X]"), theme::cancelled()),
        ]);
    } else {
        spans.extend([
            Span::styled(time_str, theme::time()),
            Span::raw(" "),
            delay_span(dep.delay),
            Span::raw("  "),
            Span::styled(line_str, theme::line()),
            Span::raw("  "),
            Span::styled(platform_str, theme::platform()),
            Span::raw(" "),
            Span::raw(dest),
        ]);
    }

    Line::from(spans)
}

fn render_destination_panel(frame: &mut Frame, model: &Model, area: Rect) {
    let lines = destination_lines(model, area.width as usize, area.height as usize);
    frame.render_widget(Paragraph::new(lines), area);
}

fn destination_lines(model: &Model, width: usize, height: usize) -> Vec<Line<'static>> {
    let title = panel_title("DESTINATIONS".to_string(), model.focus == Focus::Destinations);

    if model.destination_list.is_empty() {
        return vec![title, Line::from(Span::styled(" No data", theme::muted()))];
    }

    let content_width = width.saturating_sub(2);
    let max_visible = height.saturating_sub(2).max(1);
    let (start, end) = visible_range(
        model.destination_cursor,
        model.destination_list.len(),
        max_visible,
    );

    let rows: Vec<Line<'static>> = (start..end)
        .map(|i| {
            let focused = model.focus == Focus::Destinations && model.destination_cursor == i;
            let active = model.destination_filters.get(i).copied().unwrap_or(false);
            let label = truncate(&model.destination_list[i], content_width.saturating_sub(3));
            Line::from(chip(&label, active, focused))
        })
        .collect();

    assemble_list(
        title,
        rows,
        model.destination_cursor,
        model.destination_list.len(),
        content_width,
        max_visible,
    )
}

fn render_journey_detail(frame: &mut Frame, model: &Model, area: Rect, now: DateTime<Utc>) {
    let lines = journey_lines(model, area.width as usize, area.height as usize, now);
    frame.render_widget(Paragraph::new(lines), area);
}

fn journey_lines(
    model: &Model,
    width: usize,
    height: usize,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let mut base = "JOURNEY".to_string();
    if let Some(journey) = &model.journey {
        base.push_str(": ");
        base.push_str(&journey.name);
    }
    let title = panel_title(base, model.focus == Focus::Journey);

    if model.journey_loading {
        return vec![
            title,
            Line::from(Span::styled(" Loading journey...", theme::loading())),
        ];
    }
    if let Some(err) = &model.journey_err {
        return vec![
            title,
            Line::from(Span::styled(format!(" Error: {err}"), theme::error())),
        ];
    }
    let Some(journey) = &model.journey else {
        return vec![
            title,
            Line::from(Span::styled(
                " Select a departure to view journey",
                theme::muted(),
            )),
        ];
    };

    let stops = &journey.stops;
    if stops.is_empty() {
        return vec![title, Line::from(Span::styled(" No stops", theme::muted()))];
    }

    let content_width = width.saturating_sub(2);
    let max_visible = height.saturating_sub(2).max(1);
    let current = current_stop_index(stops, now);
    let (start, end) = visible_range(model.journey_scroll, stops.len(), max_visible);

    let rows: Vec<Line<'static>> = (start..end)
        .map(|i| {
            journey_stop_line(
                &stops[i],
                i,
                stops.len(),
                current,
                model.journey_scroll,
                model.show_journey,
                content_width,
            )
        })
        .collect();

    assemble_list(
        title,
        rows,
        model.journey_scroll,
        stops.len(),
        content_width,
        max_visible,
    )
}

fn journey_stop_line(
    stop: &Stop,
    index: usize,
    stop_count: usize,
    current: usize,
    scroll: usize,
    show_journey: bool,
    content_width: usize,
) -> Line<'static> {
    let is_first = index == 0;
    let is_last = index + 1 == stop_count;
    let is_current = index == current;
    let is_scrolled_to = index == scroll;

    let symbol = if is_first {
        "┌"
    } else if is_last {
        "└"
    } else {
        "├"
    };

    let indicator = if is_scrolled_to && show_journey {
        "►"
    } else if is_current && !is_scrolled_to {
        "●"
    } else {
        " "
    };

    let time_str = if is_first {
        fmt_hm(stop.dep)
    } else {
        fmt_hm(stop.arr)
    };

    let delay_plain = if stop.delay == 0 {
        "    ".to_string()
    } else if stop.delay > 0 {
        format!("{:+4}", stop.delay)
    } else {
        format!("{:4}", stop.delay)
    };

    let platform = stop.effective_platform();
    let platform_str = if platform.is_empty() {
        "       ".to_string()
    } else {
        format!("Pl.{:<3} ", truncate(platform, 3))
    };

    // indicator + symbol + time + delay + platform + separators.
    let fixed = 1 + 1 + 1 + 1 + 5 + 1 + 4 + 2 + 7;
    let mut max_name = content_width.saturating_sub(fixed + 2);
    if stop.cancelled {
        max_name = max_name.saturating_sub(4);
    }
    let mut name = truncate(&stop.name, max_name);
    if name.chars().count() < max_name {
        name.push_str(&" ".repeat(max_name - name.chars().count()));
    }

    if is_scrolled_to && show_journey && !is_current {
        let content =
            format!("{indicator} {symbol} {time_str} {delay_plain}  {platform_str} {name}");
        return Line::from(Span::styled(content, theme::scroll_position()));
    }
    if is_current && !stop.cancelled {
        let content =
            format!("{indicator} {symbol} {time_str} {delay_plain}  {platform_str} {name}");
        return Line::from(Span::styled(content, theme::current_stop()));
    }

    if stop.cancelled {
        return Line::from(vec![
            Span::raw(indicator.to_string()),
            Span::raw(" "),
            Span::styled(symbol.to_string(), theme::muted()),
            Span::raw(" "),
            Span::styled(time_str, theme::cancelled()),
            Span::raw(" "),
            delay_span(stop.delay),
            Span::raw("  "),
            Span::styled(platform_str, theme::cancelled()),
            Span::raw(" "),
            Span::styled(format!("{name} [X]"), theme::cancelled()),
        ]);
    }

    Line::from(vec![
        Span::raw(indicator.to_string()),
        Span::raw(" "),
        Span::styled(symbol.to_string(), theme::muted()),
        Span::raw(" "),
        Span::styled(time_str, theme::time()),
        Span::raw(" "),
        delay_span(stop.delay),
        Span::raw("  "),
        Span::styled(platform_str, theme::platform()),
        Span::raw(" "),
        Span::raw(name),
    ])
}

// ═══════════════════════════════════════════════════════════════════
// STATUS BAR
// ═══════════════════════════════════════════════════════════════════

fn render_status_bar(frame: &mut Frame, model: &Model, area: Rect) {
    let hints = match model.focus {
        Focus::Search => "Enter:search  Tab:next  Shift+Tab:back  Esc:clear  Ctrl+C:quit",
        Focus::Filters => "h/l:move  Space:toggle  a:all  Tab:next  Shift+Tab:back  Esc:search  q:quit",
        Focus::Board => "h/l:move  Space:select  Tab:next  Shift+Tab:back  Esc:search  q:quit",
        Focus::AutoRefresh => "Space:toggle  Tab:next  Shift+Tab:back  Esc:search  q:quit",
        Focus::Stations => {
            "j/k:nav  PgUp/PgDn:page  Home/End:jump  Enter:select  Tab/Shift+Tab:nav  /:search  q:quit"
        }
        Focus::Departures => {
            "j/k:nav  PgUp/PgDn:page  Home/End:jump  Enter:journey  Tab/Shift+Tab:nav  Esc:back  q:quit"
        }
        Focus::Destinations => {
            "j/k:nav  Space:toggle  a:all  Tab:next  Shift+Tab:back  Esc:search  q:quit"
        }
        Focus::Journey => {
            "j/k:scroll  PgUp/PgDn:page  Home/End:jump  Tab/Shift+Tab:nav  Esc:back  q:quit"
        }
    };

    let indicator = match model.focus {
        Focus::Stations => scroll_indicator(model.station_cursor, model.stations.len()),
        Focus::Departures => {
            scroll_indicator(model.departure_cursor, model.filtered_departures().len())
        }
        Focus::Destinations => {
            scroll_indicator(model.destination_cursor, model.destination_list.len())
        }
        Focus::Journey => model
            .journey
            .as_ref()
            .map(|j| scroll_indicator(model.journey_scroll, j.stops.len()))
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut text = format!(" {hints}");
    if !indicator.is_empty() {
        text.push_str("  │  ");
        text.push_str(&indicator);
    }

    frame.render_widget(
        Paragraph::new(Span::raw(text)).style(theme::status_bar()),
        area,
    );
}

/// 1-indexed "cursor/total" position indicator.
fn scroll_indicator(cursor: usize, total: usize) -> String {
    if total == 0 {
        String::new()
    } else {
        format!("{}/{}", cursor + 1, total)
    }
}
