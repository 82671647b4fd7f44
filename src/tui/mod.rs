//! Interactive terminal UI.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ header · search bar · filter band (modes │ dep/arr │ auto)   │
//! ├───────────────┬──────────────────────────────────────────────┤
//! │ STATIONS      │ DEPARTURES                  │ DESTINATIONS   │
//! │               ├─────────────────────────────┴────────────────┤
//! │               │ JOURNEY                     │ ROUTE MAP      │
//! ├───────────────┴──────────────────────────────────────────────┤
//! │ status bar: key hints · scroll position                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Message flow: key/tick → event loop → [`Model::update`] → commands →
//! worker tasks → result messages → update → [`view::render`]. The model
//! is only ever mutated inside the loop; replies that no longer match the
//! user's intent are rejected by identity tags rather than cancelled.
//!
//! [`Model::update`]: model::Model::update

mod app;
pub mod command;
pub mod message;
pub mod model;
pub mod routemap;
pub mod theme;
mod update;
pub mod view;

pub use app::App;
pub use model::{Focus, Model};

use std::io;
use std::sync::Arc;

use crate::api::Client;

/// Run the interactive UI until the user quits.
pub async fn run_tui(client: Client) -> io::Result<()> {
    App::new(Arc::new(client)).run().await
}
