//! Tables for station search results, boards, and journey detail.

use chrono::Utc;
use colored::Colorize;

use crate::api::BoardSide;
use crate::models::{current_stop_index, Departure, Journey, Location};

use super::{fmt_hm, format_delay, truncate};

/// Print station search results, one line per location.
pub fn print_locations(locations: &[Location]) {
    if locations.is_empty() {
        println!("No stations found.");
        return;
    }

    for loc in locations {
        let products = if loc.products.is_empty() {
            String::new()
        } else {
            format!("  [{}]", loc.products.join(", "))
        };
        println!(
            "{:>8}  {}{}",
            loc.eva.to_string().cyan(),
            loc.name.bold(),
            products.dimmed()
        );
    }
}

/// Display options for a board listing.
#[derive(Debug, Clone, Default)]
pub struct BoardOptions {
    /// Print intermediate stops under each entry.
    pub show_via: bool,
    /// Print the journey id under each entry.
    pub show_journey_id: bool,
    /// Keep only entries whose line matches exactly.
    pub line: Option<String>,
    /// Keep only entries whose destination contains this substring.
    pub direction: Option<String>,
}

impl BoardOptions {
    fn keep(&self, dep: &Departure) -> bool {
        if let Some(line) = &self.line {
            if dep.line != *line {
                return false;
            }
        }
        if let Some(direction) = &self.direction {
            if !dep.destination.contains(direction.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Print a departure or arrival board.
pub fn print_board(station: &str, departures: &[Departure], side: BoardSide, opts: &BoardOptions) {
    let heading = match side {
        BoardSide::Departures => "Departures",
        BoardSide::Arrivals => "Arrivals",
    };
    println!("{} {}", format!("{heading} for").bold(), station.bold());
    println!();

    let mut shown = 0usize;
    for dep in departures.iter().filter(|d| opts.keep(d)) {
        shown += 1;

        let line = if dep.line.is_empty() {
            &dep.train_short
        } else {
            &dep.line
        };
        let platform = dep.effective_platform();
        let platform_str = if platform.is_empty() {
            "       ".to_string()
        } else {
            format!("Pl.{:<4}", truncate(platform, 3))
        };

        let destination = if dep.cancelled {
            format!("{} [X]", dep.destination).red().bold().to_string()
        } else {
            dep.destination.clone()
        };

        println!(
            "{} {}  {:<10}  {} {}",
            fmt_hm(dep.time).white().bold(),
            format_delay(dep.delay),
            line.cyan().bold(),
            platform_str.magenta(),
            destination
        );

        if opts.show_via && !dep.via.is_empty() {
            println!("         {} {}", "via".dimmed(), dep.via.join(" · ").dimmed());
        }
        if opts.show_journey_id && !dep.journey_id.is_empty() {
            println!("         {}", dep.journey_id.dimmed());
        }
    }

    if shown == 0 {
        println!("No entries found.");
    }
}

/// Print a journey with all stops; the current stop is marked.
pub fn print_journey(journey: &Journey) {
    println!("{} {}", "Journey:".bold(), journey.name.cyan().bold());
    if !journey.operator.is_empty() {
        println!("{} {}", "Operator:".dimmed(), journey.operator);
    }
    if let Some(day) = journey.day {
        println!("{} {}", "Day:".dimmed(), day.format("%Y-%m-%d"));
    }
    if journey.cancelled {
        println!("{}", "This journey is cancelled.".red().bold());
    }
    println!();

    let current = current_stop_index(&journey.stops, Utc::now());
    let last = journey.stops.len().saturating_sub(1);

    for (i, stop) in journey.stops.iter().enumerate() {
        let symbol = if i == 0 {
            "┌"
        } else if i == last {
            "└"
        } else {
            "├"
        };

        let arr = if i == 0 { None } else { stop.arr };
        let dep = if i == last { None } else { stop.dep };

        let marker = if i == current { ">" } else { " " };

        let platform = stop.effective_platform();
        let platform_str = if platform.is_empty() {
            "       ".to_string()
        } else {
            format!("Pl.{:<4}", truncate(platform, 3))
        };

        let name = if stop.cancelled {
            format!("{} [X]", stop.name).red().bold().to_string()
        } else if i == current {
            stop.name.bold().to_string()
        } else {
            stop.name.clone()
        };

        println!(
            "{marker} {} {} {} {}  {} {}",
            symbol.dimmed(),
            fmt_hm(arr).white().bold(),
            fmt_hm(dep).white().bold(),
            format_delay(stop.delay),
            platform_str.magenta(),
            name
        );
    }

    for msg in &journey.messages {
        println!("{} {}", "!".yellow().bold(), msg.text);
    }
}
