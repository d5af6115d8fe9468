/// Field and forecast API client
///
/// Talks to the agriculture API that stores named fields and predicts
/// per-disease risk for them:
///
/// - `GET  /api/fields`              → `{ "<name>": {"lat": .., "lon": ..}, .. }`
/// - `POST /api/fields`              ← `{"name": .., "lat": .., "lon": ..}`
/// - `GET  /api/forecast/{field}`    → `[ForecastEntry, ..]`
///
/// The view controller only sees the `FieldApi` trait so it can be driven
/// by the HTTP client, the dev-mode replay source, or a test double.

use std::time::Duration;

use serde::Deserialize;

use crate::config::ApiConfig;
use crate::model::{ApiError, Coordinates, Field, ForecastEntry, NewField};

pub const FIELDS_PATH: &str = "/api/fields";
pub const FORECAST_PATH: &str = "/api/forecast";

// ============================================================================
// API Response Structures
// ============================================================================

/// Value half of one `/api/fields` entry.
#[derive(Debug, Deserialize)]
struct FieldLocation {
    lat: f64,
    lon: f64,
}

// ============================================================================
// Client seam
// ============================================================================

/// The three calls the view makes against the API.
pub trait FieldApi {
    /// All saved fields, in the order the server lists them.
    fn list_fields(&self) -> Result<Vec<Field>, ApiError>;

    /// Creates (or replaces) a field. Any 2xx status is success.
    fn save_field(&self, field: &NewField) -> Result<(), ApiError>;

    /// The forecast for one field. An empty vector is a valid answer.
    fn fetch_forecast(&self, field_name: &str) -> Result<Vec<ForecastEntry>, ApiError>;
}

impl<T: FieldApi + ?Sized> FieldApi for &T {
    fn list_fields(&self) -> Result<Vec<Field>, ApiError> {
        (**self).list_fields()
    }

    fn save_field(&self, field: &NewField) -> Result<(), ApiError> {
        (**self).save_field(field)
    }

    fn fetch_forecast(&self, field_name: &str) -> Result<Vec<ForecastEntry>, ApiError> {
        (**self).fetch_forecast(field_name)
    }
}

// ============================================================================
// URL construction
// ============================================================================

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// `GET`/`POST` target for the field list.
pub fn build_fields_url(base_url: &str) -> String {
    format!("{}{}", trim_base(base_url), FIELDS_PATH)
}

/// Forecast URL for a field. The name is percent-encoded as a single path
/// segment, so names containing `/`, spaces or `?` stay intact.
pub fn build_forecast_url(base_url: &str, field_name: &str) -> String {
    format!(
        "{}{}/{}",
        trim_base(base_url),
        FORECAST_PATH,
        urlencoding::encode(field_name)
    )
}

// ============================================================================
// Response parsing
// ============================================================================

/// Parses the `/api/fields` object, keeping the server's key order.
pub fn parse_fields_response(body: &str) -> Result<Vec<Field>, ApiError> {
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;

    object
        .into_iter()
        .map(|(name, value)| {
            let location: FieldLocation = serde_json::from_value(value)
                .map_err(|e| ApiError::Parse(format!("field '{}': {}", name, e)))?;
            Ok(Field {
                name,
                location: Coordinates { lat: location.lat, lon: location.lon },
            })
        })
        .collect()
}

/// Parses a forecast array. Any malformed entry fails the whole response.
pub fn parse_forecast_response(body: &str) -> Result<Vec<ForecastEntry>, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

// ============================================================================
// HTTP client
// ============================================================================

/// Blocking HTTP implementation of `FieldApi`.
pub struct HttpFieldApi {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpFieldApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_text(&self, url: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(ApiError::Http(response.status().as_u16()));
        }

        response.text().map_err(transport_error)
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

impl FieldApi for HttpFieldApi {
    fn list_fields(&self) -> Result<Vec<Field>, ApiError> {
        let body = self.get_text(&build_fields_url(&self.base_url))?;
        parse_fields_response(&body)
    }

    fn save_field(&self, field: &NewField) -> Result<(), ApiError> {
        let response = self
            .client
            .post(build_fields_url(&self.base_url))
            .json(field)
            .send()
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(ApiError::Http(response.status().as_u16()));
        }
        Ok(())
    }

    fn fetch_forecast(&self, field_name: &str) -> Result<Vec<ForecastEntry>, ApiError> {
        let body = self.get_text(&build_forecast_url(&self.base_url, field_name))?;
        parse_forecast_response(&body)
    }
}

// ============================================================================
// Tests
// ============================================================================
