//! Field forecast view.
//!
//! Client side of a small agricultural field tool: pick a point on a map,
//! save it as a named field through the agriculture API, and show the
//! field's disease-risk forecast as one table card per disease.
//!
//! - `model`:      forecast rows, fields and the error types.
//! - `ingest`:     the `FieldApi` trait and its HTTP client.
//! - `analysis`:   per-disease grouping of a flat forecast.
//! - `risk`:       risk tokens and tiers.
//! - `render`:     cards, unit formatting, HTML and text output.
//! - `view`:       explicit view state and the controller driving it.
//! - `dev_mode`:   replay saved responses without a server.
//! - `verify`:     check every field's forecast endpoint.
//! - `config`, `logging`: ambient setup.

pub mod analysis;
pub mod config;
pub mod dev_mode;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod render;
pub mod risk;
pub mod verify;
pub mod view;

pub use ingest::field_api::{FieldApi, HttpFieldApi};
pub use model::{ApiError, Coordinates, DiseaseGroup, Field, ForecastEntry, NewField, ValidationError, ViewError};
pub use view::ViewController;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
