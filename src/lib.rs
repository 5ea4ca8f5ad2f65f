//! Coinmotion tax report wizard
//!
//! Walks a user through a disclaimer, export instructions and a CSV upload,
//! sends the file to the report service and hands back the generated PDF
//! archive. The `wizard` module holds the session logic; `ui` and `app` are
//! the terminal front end used by the binary.

pub mod api;
pub mod app;
pub mod config;
pub mod headless;
pub mod logging;
pub mod ui;
pub mod wizard;
