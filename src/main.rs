//! railboard CLI — live boards, journeys, and formations from bahn.de.
//!
//! Without a subcommand the interactive TUI starts; the subcommands are
//! linear programs over the same API gateway, suitable for scripting.

use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Europe::Berlin;
use clap::{Parser, Subcommand};
use colored::Colorize;

use railboard::api::{
    BoardSide, Client, FormationRequest, NearbyRequest, StationBoardRequest, MODES_OF_TRANSIT,
};
use railboard::cache::{FileCache, DEFAULT_TTL};
use railboard::models::Location;
use railboard::output::{self, BoardOptions};

#[derive(Parser)]
#[command(name = "railboard")]
#[command(about = "Terminal client for Deutsche Bahn real-time transit information")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Date (DD.MM.YYYY or YYYY-MM-DD)
    #[arg(short = 'd', long, global = true)]
    date: Option<String>,

    /// Time (HH:MM)
    #[arg(short = 't', long, global = true)]
    time: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Color output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    /// Disable response caching
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI (default)
    Tui,

    /// Search stations by name
    Search {
        /// Station name or fragment
        query: String,
    },

    /// Search stations near coordinates
    Nearby {
        /// Coordinates as <lat>:<lon>
        position: String,

        /// Search radius in meters
        #[arg(long, default_value_t = 9999)]
        radius: u32,
    },

    /// Show the departure board of a station
    Departures {
        /// Station: EVA number, <eva>:<station-id>, or a name to search
        station: String,

        #[command(flatten)]
        board: BoardArgs,
    },

    /// Show the arrival board of a station
    Arrivals {
        /// Station: EVA number, <eva>:<station-id>, or a name to search
        station: String,

        #[command(flatten)]
        board: BoardArgs,
    },

    /// Show journey details for a journey id
    Journey {
        /// Opaque journey id (from a board entry)
        journey_id: String,
    },

    /// Show the carriage formation of a train
    Formation {
        /// Station EVA number
        eva: i64,
        /// Train type (e.g. ICE)
        train_type: String,
        /// Train number (e.g. 623)
        train_number: String,
    },
}

#[derive(clap::Args)]
struct BoardArgs {
    /// Number of intermediate stops to request
    #[arg(long, default_value_t = 5)]
    vias: u32,

    /// Filter by transport modes (ICE,EC_IC,REGIONAL,SBAHN,BUS,UBAHN,TRAM)
    #[arg(short = 'm', long, value_delimiter = ',')]
    modes: Vec<String>,

    /// Show intermediate stops
    #[arg(short = 'v', long)]
    via: bool,

    /// Filter by line label (exact match)
    #[arg(short = 'l', long)]
    line: Option<String>,

    /// Filter by destination (substring match)
    #[arg(long)]
    direction: Option<String>,

    /// Show the journey id of each entry
    #[arg(short = 'j', long)]
    journey: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => {}
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(cli.no_cache)?;

    let date_time = parse_date_time(cli.date.as_deref(), cli.time.as_deref())?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            railboard::tui::run_tui(client).await?;
        }

        Commands::Search { query } => {
            let locations = client.search_locations(&query).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&locations)?);
            } else {
                output::print_locations(&locations);
            }
        }

        Commands::Nearby { position, radius } => {
            let (lat, lon) = parse_position(&position)?;
            let locations = client
                .search_nearby(NearbyRequest {
                    lat,
                    lon,
                    radius,
                    ..Default::default()
                })
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&locations)?);
            } else {
                output::print_locations(&locations);
            }
        }

        Commands::Departures { station, board } => {
            run_board(&client, &station, board, BoardSide::Departures, date_time, cli.json).await?;
        }

        Commands::Arrivals { station, board } => {
            run_board(&client, &station, board, BoardSide::Arrivals, date_time, cli.json).await?;
        }

        Commands::Journey { journey_id } => {
            let journey = client.journey(&journey_id, false).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&journey)?);
            } else {
                output::print_journey(&journey);
            }
        }

        Commands::Formation {
            eva,
            train_type,
            train_number,
        } => {
            let formation = client
                .formation(FormationRequest {
                    eva,
                    train_type,
                    train_number,
                    departure: date_time,
                })
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&formation)?);
            } else {
                output::print_formation(&formation);
            }
        }
    }

    Ok(())
}

fn build_client(no_cache: bool) -> railboard::Result<Client> {
    let mut builder = Client::builder();
    if !no_cache {
        match FileCache::new(FileCache::default_dir(), DEFAULT_TTL) {
            Ok(cache) => builder = builder.cache(Arc::new(cache)),
            Err(err) => tracing::warn!(error = %err, "response cache disabled"),
        }
    }
    builder.build()
}

async fn run_board(
    client: &Client,
    station: &str,
    args: BoardArgs,
    side: BoardSide,
    date_time: Option<DateTime<Utc>>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for mode in &args.modes {
        if !MODES_OF_TRANSIT.contains(&mode.as_str()) {
            return Err(format!("unknown transport mode: {mode}").into());
        }
    }

    let location = resolve_station(client, station).await?;
    let departures = client
        .station_board(
            StationBoardRequest {
                eva: location.eva,
                station_id: location.id.clone(),
                date_time,
                num_vias: args.vias,
                modes: args.modes,
            },
            side,
        )
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&departures)?);
        return Ok(());
    }

    let opts = BoardOptions {
        show_via: args.via,
        show_journey_id: args.journey,
        line: args.line,
        direction: args.direction,
    };
    output::print_board(&location.name, &departures, side, &opts);
    Ok(())
}

/// Accepts an EVA number, an `<eva>:<station-id>` pair, or a free-text
/// name that is resolved through the location search.
async fn resolve_station(
    client: &Client,
    arg: &str,
) -> Result<Location, Box<dyn std::error::Error>> {
    if let Some((eva, id)) = arg.split_once(':') {
        if let Ok(eva) = eva.parse::<i64>() {
            return Ok(Location {
                eva,
                id: id.to_string(),
                name: arg.to_string(),
                lat: 0.0,
                lon: 0.0,
                kind: String::new(),
                products: Vec::new(),
            });
        }
    }

    if let Ok(eva) = arg.parse::<i64>() {
        return Ok(Location {
            eva,
            id: String::new(),
            name: arg.to_string(),
            lat: 0.0,
            lon: 0.0,
            kind: String::new(),
            products: Vec::new(),
        });
    }

    let hits = client.search_locations(arg).await?;
    hits.into_iter()
        .next()
        .ok_or_else(|| format!("no station found for \"{arg}\"").into())
}

fn parse_position(s: &str) -> Result<(f64, f64), Box<dyn std::error::Error>> {
    let (lat, lon) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <lat>:<lon>, got \"{s}\""))?;
    Ok((lat.trim().parse()?, lon.trim().parse()?))
}

/// Combine `--date` and `--time` into an instant, interpreted in the
/// transit system's timezone. Returns `None` when neither is given.
fn parse_date_time(
    date: Option<&str>,
    time: Option<&str>,
) -> Result<Option<DateTime<Utc>>, Box<dyn std::error::Error>> {
    if date.is_none() && time.is_none() {
        return Ok(None);
    }

    let now = Utc::now().with_timezone(&Berlin);

    let day = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%d.%m.%Y")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .map_err(|_| format!("invalid date: {s}"))?,
        None => now.date_naive(),
    };

    let tod = match time {
        Some(s) => {
            NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| format!("invalid time: {s}"))?
        }
        None => now.time(),
    };

    let local = Berlin
        .from_local_datetime(&day.and_time(tod))
        .earliest()
        .ok_or("date/time does not exist in Europe/Berlin")?;
    Ok(Some(local.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positions() {
        assert_eq!(parse_position("50.107:8.663").unwrap(), (50.107, 8.663));
        assert!(parse_position("50.107").is_err());
    }

    #[test]
    fn parses_both_date_formats() {
        let a = parse_date_time(Some("24.12.2024"), Some("18:30")).unwrap().unwrap();
        let b = parse_date_time(Some("2024-12-24"), Some("18:30")).unwrap().unwrap();
        assert_eq!(a, b);
        // 18:30 CET is 17:30 UTC.
        assert_eq!(a.format("%H:%M").to_string(), "17:30");
    }

    #[test]
    fn missing_date_and_time_is_none() {
        assert!(parse_date_time(None, None).unwrap().is_none());
    }
}
