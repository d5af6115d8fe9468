/// Core data types for the field forecast view.
///
/// This module defines the shared domain model imported by all other modules:
/// forecast rows as received from the API, field locations, and the error
/// types that flow between the fetcher and the view controller.
/// It contains no I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Forecast types
// ---------------------------------------------------------------------------

/// One row of disease-risk assessment for a field on a date.
///
/// Corresponds to one element of the `GET /api/forecast/{field}` array.
/// Measurements are plain numbers; JSON integers are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub disease: String,
    pub date: String, // opaque, e.g. "2024-01-01"
    pub risk: String, // "Low" / "MODERATE" / ...; casing preserved for display
    pub temperature: f64,  // °C
    pub humidity: f64,     // %
    pub rainfall: f64,     // mm
    pub cloud_cover: f64,  // %
    pub leaf_wetness: f64, // hours
}

/// All entries for one disease, in their original relative order.
///
/// Produced by `analysis::groupings::group_by_disease`. Borrows from the
/// caller's entry slice and lives only for a single render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseGroup<'a> {
    pub disease: &'a str,
    pub entries: Vec<&'a ForecastEntry>,
}

// ---------------------------------------------------------------------------
// Field types
// ---------------------------------------------------------------------------

/// A WGS84 position picked on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A saved field: a name attached to a map location.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub location: Coordinates,
}

/// Request body for `POST /api/fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewField {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl NewField {
    pub fn new(name: &str, location: Coordinates) -> Self {
        Self {
            name: name.to_string(),
            lat: location.lat,
            lon: location.lon,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when talking to the field/forecast API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Non-2xx HTTP response.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// The request never produced a response (connect failure, timeout).
    #[error("Transport error: {0}")]
    Transport(String),
    /// The response body could not be deserialized.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A user action was rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a field name")]
    MissingFieldName,
    #[error("Please select a location on the map")]
    MissingLocation,
    #[error("Please select a field")]
    MissingFieldSelection,
}

/// Anything a view controller action can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
