//! Session state for the field forecast view.
//!
//! Everything the user can see or has typed lives in `ViewState`, which the
//! controller owns and mutates through `&mut self`. Nothing here performs
//! I/O.

use crate::config::MapConfig;
use crate::model::{Coordinates, Field};
use crate::render::html::render_field_options;

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// What the map is showing: where it is centred, at what zoom, and the
/// single marker if one is placed.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub marker: Option<Coordinates>,
}

impl MapView {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            center: config.center(),
            zoom: config.default_zoom,
            marker: None,
        }
    }

    /// Replaces any existing marker.
    pub fn place_marker(&mut self, at: Coordinates) {
        self.marker = Some(at);
    }

    /// Centres the map on `at` at the given zoom.
    pub fn focus(&mut self, at: Coordinates, zoom: u8) {
        self.center = at;
        self.zoom = zoom;
    }
}

// ---------------------------------------------------------------------------
// Display region
// ---------------------------------------------------------------------------

/// The area the forecast cards are rendered into. Writes always replace the
/// whole content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayRegion {
    content: String,
    renders: u64,
}

impl DisplayRegion {
    pub fn replace(&mut self, content: String) {
        self.content = content;
        self.renders += 1;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// How many times the region has been written.
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub map: MapView,
    /// Set by a map click; absent until the first one.
    pub selected_location: Option<Coordinates>,
    /// Contents of the field-name input box.
    pub field_name_input: String,
    /// Current value of the field selector.
    pub selected_field: Option<String>,
    /// Last field list received from the API.
    pub fields: Vec<Field>,
    /// Rendered `<option>` list for the field selector.
    pub field_options: String,
    pub forecast_region: DisplayRegion,
    pub notices: Vec<Notice>,
}

impl ViewState {
    pub fn new(map_config: &MapConfig) -> Self {
        Self {
            map: MapView::new(map_config),
            selected_location: None,
            field_name_input: String::new(),
            selected_field: None,
            fields: Vec::new(),
            field_options: render_field_options(&[], None),
            forecast_region: DisplayRegion::default(),
            notices: Vec::new(),
        }
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Removes and returns all pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice { level, message: message.into() });
    }
}
