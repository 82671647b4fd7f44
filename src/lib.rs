//! railboard — terminal client for Deutsche Bahn real-time transit
//! information.
//!
//! ## Module map
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`api`] | Typed gateway to the bahn.de web API (headers, identity, classification) |
//! | [`cache`] | Content-addressed file cache with TTL for API responses |
//! | [`models`] | Domain entities and wire decoding (locations, boards, journeys, formations) |
//! | [`operators`] | Administration-id → operator lookup |
//! | [`output`] | Linear CLI rendering for the non-interactive subcommands |
//! | [`tui`] | Interactive engine: model, update, renderer, event loop |
//! | [`error`] | Classified gateway errors |

pub mod api;
pub mod cache;
pub mod error;
pub mod models;
pub mod operators;
pub mod output;
pub mod tui;

pub use api::{BoardSide, Client, ClientBuilder};
pub use error::{ApiError, Result};
