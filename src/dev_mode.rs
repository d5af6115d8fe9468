/// Development mode utilities for working without a live API
///
/// When the agriculture API is unavailable, use this module to replay
/// saved responses for testing and development. A replay directory looks
/// like:
///
/// ```text
/// replay/
///   fields.json            # body of GET /api/fields
///   forecast/North.json    # body of GET /api/forecast/North
/// ```

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::field_api::{FieldApi, parse_fields_response, parse_forecast_response};
use crate::model::{ApiError, Coordinates, Field, ForecastEntry, NewField};

/// Serves saved API responses from a directory
pub struct ReplayApi {
    root: PathBuf,
    /// Fields saved during this session; never written back to disk.
    saved: RefCell<Vec<Field>>,
}

impl ReplayApi {
    /// Create a replay source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            saved: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the saved forecast for a field. The name is percent-encoded
    /// so it is always a single safe file name.
    pub fn forecast_path(&self, field_name: &str) -> PathBuf {
        self.root
            .join("forecast")
            .join(format!("{}.json", urlencoding::encode(field_name)))
    }

    /// A missing file behaves like a 404 from the live API.
    fn read(&self, path: &Path) -> Result<String, ApiError> {
        fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ApiError::Http(404),
            _ => ApiError::Transport(format!("{}: {}", path.display(), e)),
        })
    }
}

/// Reads a saved forecast body from any file, e.g. for one-off rendering.
pub fn load_forecast_file(path: &Path) -> Result<Vec<ForecastEntry>, ApiError> {
    let body = fs::read_to_string(path)
        .map_err(|e| ApiError::Transport(format!("{}: {}", path.display(), e)))?;
    parse_forecast_response(&body)
}

impl FieldApi for ReplayApi {
    fn list_fields(&self) -> Result<Vec<Field>, ApiError> {
        let path = self.root.join("fields.json");
        let mut fields = if path.exists() {
            parse_fields_response(&self.read(&path)?)?
        } else {
            Vec::new()
        };

        // Saving an existing name replaces its location in place, like the API does.
        for saved in self.saved.borrow().iter() {
            match fields.iter_mut().find(|f| f.name == saved.name) {
                Some(existing) => existing.location = saved.location,
                None => fields.push(saved.clone()),
            }
        }
        Ok(fields)
    }

    fn save_field(&self, field: &NewField) -> Result<(), ApiError> {
        let mut saved = self.saved.borrow_mut();
        let location = Coordinates { lat: field.lat, lon: field.lon };
        match saved.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => existing.location = location,
            None => saved.push(Field { name: field.name.clone(), location }),
        }
        Ok(())
    }

    fn fetch_forecast(&self, field_name: &str) -> Result<Vec<ForecastEntry>, ApiError> {
        let body = self.read(&self.forecast_path(field_name))?;
        parse_forecast_response(&body)
    }
}
