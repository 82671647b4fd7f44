//! Dots-only geographic projection of a journey's route.
//!
//! Stops with known coordinates are projected onto the character grid with
//! uniform scale (the terminal cell aspect is corrected by a factor of
//! two on the vertical axis), connected with Bresenham dot lines, and
//! marked by their position relative to the current stop.

use ratatui::text::{Line, Span};

use crate::models::Stop;

use super::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Empty,
    Path,
    Past,
    Current,
    Future,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    kind: CellKind,
}

const EMPTY: Cell = Cell {
    ch: ' ',
    kind: CellKind::Empty,
};

/// Render the route map into styled lines for a `width` × `height` area.
/// Returns an empty vec when there is nothing to draw.
pub fn render_route_map(stops: &[Stop], current_idx: usize, width: usize, height: usize) -> Vec<Line<'static>> {
    if width < 3 || height < 3 {
        return Vec::new();
    }

    // Only stops with known coordinates take part.
    let valid: Vec<(usize, &Stop)> = stops
        .iter()
        .enumerate()
        .filter(|(_, s)| s.lat != 0.0 || s.lon != 0.0)
        .collect();
    if valid.is_empty() {
        return Vec::new();
    }

    // Bounding box, widened to a minimum span and padded by 10%.
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    for (_, s) in &valid {
        min_lat = min_lat.min(s.lat);
        max_lat = max_lat.max(s.lat);
        min_lon = min_lon.min(s.lon);
        max_lon = max_lon.max(s.lon);
    }

    if max_lat - min_lat < 0.01 {
        let mid = (min_lat + max_lat) / 2.0;
        min_lat = mid - 0.005;
        max_lat = mid + 0.005;
    }
    if max_lon - min_lon < 0.01 {
        let mid = (min_lon + max_lon) / 2.0;
        min_lon = mid - 0.005;
        max_lon = mid + 0.005;
    }

    let lat_pad = (max_lat - min_lat) * 0.1;
    let lon_pad = (max_lon - min_lon) * 0.1;
    min_lat -= lat_pad;
    max_lat += lat_pad;
    min_lon -= lon_pad;
    max_lon += lon_pad;
    let lat_span = max_lat - min_lat;
    let lon_span = max_lon - min_lon;

    // Uniform scale; vertical doubled to correct the cell aspect.
    let x_scale = (width - 1) as f64 / lon_span;
    let y_scale = (height - 1) as f64 / lat_span * 2.0;
    let scale = x_scale.min(y_scale);

    let used_width = scale * lon_span;
    let used_height = scale * lat_span / 2.0;
    let x_off = ((width - 1) as f64 - used_width) / 2.0;
    let y_off = ((height - 1) as f64 - used_height) / 2.0;

    let points: Vec<(usize, usize)> = valid
        .iter()
        .map(|(_, s)| {
            let col = ((s.lon - min_lon) * scale + x_off).round() as isize;
            let row = ((max_lat - s.lat) * scale / 2.0 + y_off).round() as isize;
            (
                col.clamp(0, width as isize - 1) as usize,
                row.clamp(0, height as isize - 1) as usize,
            )
        })
        .collect();

    let mut grid = vec![vec![EMPTY; width]; height];

    for pair in points.windows(2) {
        bresenham_dots(&mut grid, pair[0], pair[1]);
    }

    // Stop markers overdraw the path.
    for ((stop_idx, _), (col, row)) in valid.iter().zip(&points) {
        let (ch, kind) = if *stop_idx < current_idx {
            ('○', CellKind::Past)
        } else if *stop_idx == current_idx {
            ('◉', CellKind::Current)
        } else {
            ('●', CellKind::Future)
        };
        grid[*row][*col] = Cell { ch, kind };
    }

    grid.into_iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .map(|cell| {
                    let s = cell.ch.to_string();
                    match cell.kind {
                        CellKind::Path | CellKind::Past => Span::styled(s, theme::map_past()),
                        CellKind::Current => Span::styled(s, theme::map_current()),
                        CellKind::Future => Span::styled(s, theme::map_future()),
                        CellKind::Empty => Span::raw(s),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Integer Bresenham between two grid points, drawing light dots on empty
/// cells only.
fn bresenham_dots(grid: &mut [Vec<Cell>], from: (usize, usize), to: (usize, usize)) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 > x1 { -1 } else { 1 };
    let sy = if y0 > y1 { -1 } else { 1 };
    let mut err = dx - dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[y0 as usize].len()
        {
            let cell = &mut grid[y0 as usize][x0 as usize];
            if cell.kind == CellKind::Empty {
                *cell = Cell {
                    ch: '·',
                    kind: CellKind::Path,
                };
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(name: &str, lat: f64, lon: f64) -> Stop {
        Stop {
            eva: 0,
            name: name.to_string(),
            lat,
            lon,
            platform: String::new(),
            rt_platform: String::new(),
            sched_arr: None,
            rt_arr: None,
            arr: None,
            sched_dep: None,
            rt_dep: None,
            dep: None,
            arr_delay: 0,
            dep_delay: 0,
            delay: 0,
            cancelled: false,
            additional: false,
        }
    }

    fn map_text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_without_coordinates() {
        let stops = vec![stop("A", 0.0, 0.0), stop("B", 0.0, 0.0)];
        assert!(render_route_map(&stops, 0, 20, 10).is_empty());
    }

    #[test]
    fn too_small_viewport_is_empty() {
        let stops = vec![stop("A", 50.1, 8.6)];
        assert!(render_route_map(&stops, 0, 2, 10).is_empty());
        assert!(render_route_map(&stops, 0, 10, 2).is_empty());
    }

    #[test]
    fn renders_markers_for_each_stop_state() {
        let stops = vec![
            stop("A", 50.10, 8.60),
            stop("B", 50.40, 8.90),
            stop("C", 50.70, 9.20),
        ];
        let lines = render_route_map(&stops, 1, 24, 12);
        assert_eq!(lines.len(), 12);

        let text = map_text(&lines);
        assert!(text.contains('○'), "past marker missing:\n{text}");
        assert!(text.contains('◉'), "current marker missing:\n{text}");
        assert!(text.contains('●'), "future marker missing:\n{text}");
        assert!(text.contains('·'), "path dots missing:\n{text}");
    }

    #[test]
    fn degenerate_span_is_widened() {
        // Two stops at (nearly) the same place must not collapse the scale.
        let stops = vec![stop("A", 50.1000, 8.6000), stop("B", 50.1001, 8.6001)];
        let lines = render_route_map(&stops, 0, 20, 10);
        assert_eq!(lines.len(), 10);
        let text = map_text(&lines);
        assert!(text.contains('◉') || text.contains('●'));
    }

    #[test]
    fn every_line_spans_full_width() {
        let stops = vec![stop("A", 50.1, 8.6), stop("B", 51.0, 9.5)];
        let lines = render_route_map(&stops, 1, 30, 10);
        for line in &lines {
            let width: usize = line.spans.iter().map(|s| s.content.chars().count()).sum();
            assert_eq!(width, 30);
        }
    }
}
