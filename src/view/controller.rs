//! The view controller: user actions in, view state out.
//!
//! Each action validates against the current `ViewState` before touching the
//! network; a validation failure leaves a notice and returns an error without
//! any request being made.
//!
//! # Latest request wins
//! Field list loads, show-on-map lookups and forecast fetches are split into
//! `begin_*` and `complete_*`. `begin_*` issues a `RequestToken`; a completion
//! carrying a token that is no longer the newest for its kind is discarded
//! and reported as `Applied::Superseded`, whatever order responses arrive in.
//! The one-call helpers (`load_fields`, `show_field_on_map`, `get_forecast`)
//! run begin, fetch and complete back to back. Saves are never superseded.

use std::collections::HashMap;

use crate::config::MapConfig;
use crate::ingest::field_api::FieldApi;
use crate::logging::{self, DataSource};
use crate::model::{
    ApiError, Coordinates, Field, ForecastEntry, NewField, ValidationError, ViewError,
};
use crate::render::html::{render_cards_html, render_field_options};
use crate::render::{ForecastCard, forecast_cards};
use crate::view::state::{Notice, NoticeLevel, ViewState};

pub const MSG_FIELD_SAVED: &str = "Field saved successfully!";
pub const MSG_LOAD_FAILED: &str = "Failed to load fields";
pub const MSG_SAVE_FAILED: &str = "Failed to save field";
pub const MSG_SHOW_FAILED: &str = "Failed to show field on map";
pub const MSG_FORECAST_FAILED: &str = "Failed to get forecast";

// ---------------------------------------------------------------------------
// Request bookkeeping
// ---------------------------------------------------------------------------

/// Actions whose responses can be superseded by a newer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    LoadFields,
    ShowField,
    Forecast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    kind: RequestKind,
    seq: u64,
}

impl RequestToken {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[derive(Debug, Default)]
struct RequestTracker {
    next_seq: u64,
    latest: HashMap<RequestKind, u64>,
    in_flight: HashMap<RequestKind, u64>,
}

impl RequestTracker {
    fn issue(&mut self, kind: RequestKind) -> RequestToken {
        self.next_seq += 1;
        self.latest.insert(kind, self.next_seq);
        self.in_flight.insert(kind, self.next_seq);
        RequestToken { kind, seq: self.next_seq }
    }

    /// Marks `token` as resolved; true if it is still the newest of its kind.
    fn settle(&mut self, token: RequestToken) -> bool {
        let current = self.latest.get(&token.kind) == Some(&token.seq);
        if current {
            self.in_flight.remove(&token.kind);
        }
        current
    }

    fn is_in_flight(&self, kind: RequestKind) -> bool {
        self.in_flight.contains_key(&kind)
    }
}

/// Outcome of completing a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied<T> {
    /// The result was the newest of its kind and has been applied.
    Current(T),
    /// A newer request of the same kind was issued; the result was dropped.
    Superseded,
}

impl<T> Applied<T> {
    pub fn current(self) -> Option<T> {
        match self {
            Applied::Current(value) => Some(value),
            Applied::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Applied::Superseded)
    }
}

#[derive(Debug)]
pub struct PendingLoad {
    token: RequestToken,
}

#[derive(Debug)]
pub struct PendingShow {
    token: RequestToken,
    field_name: String,
}

impl PendingShow {
    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

#[derive(Debug)]
pub struct PendingForecast {
    token: RequestToken,
    field_name: String,
}

impl PendingForecast {
    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct ViewController<A: FieldApi> {
    api: A,
    state: ViewState,
    focus_zoom: u8,
    requests: RequestTracker,
}

impl<A: FieldApi> ViewController<A> {
    pub fn new(api: A, map_config: &MapConfig) -> Self {
        Self {
            api,
            state: ViewState::new(map_config),
            focus_zoom: map_config.focus_zoom,
            requests: RequestTracker::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn into_state(self) -> ViewState {
        self.state
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.state.take_notices()
    }

    pub fn in_flight(&self, kind: RequestKind) -> bool {
        self.requests.is_in_flight(kind)
    }

    fn reject(&mut self, err: ValidationError) -> ViewError {
        logging::debug(DataSource::View, None, &format!("rejected: {}", err));
        self.state.notify(NoticeLevel::Error, err.to_string());
        ViewError::Validation(err)
    }

    fn selected_field_name(&mut self) -> Result<String, ViewError> {
        match self.state.selected_field.clone() {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(self.reject(ValidationError::MissingFieldSelection)),
        }
    }

    // -- Local input ---------------------------------------------------------

    /// A click on the map: moves the marker and records the location for the
    /// next save.
    pub fn handle_map_click(&mut self, at: Coordinates) {
        self.state.map.place_marker(at);
        self.state.selected_location = Some(at);
    }

    pub fn set_field_name(&mut self, name: &str) {
        self.state.field_name_input = name.to_string();
    }

    /// Sets the field selector. An empty name clears the selection.
    pub fn select_field(&mut self, name: &str) {
        self.state.selected_field = if name.is_empty() { None } else { Some(name.to_string()) };
        self.state.field_options =
            render_field_options(&self.state.fields, self.state.selected_field.as_deref());
    }

    // -- Field list ----------------------------------------------------------

    pub fn begin_load_fields(&mut self) -> PendingLoad {
        PendingLoad { token: self.requests.issue(RequestKind::LoadFields) }
    }

    /// Applies a field list response. Returns the number of fields listed.
    pub fn complete_load_fields(
        &mut self,
        pending: PendingLoad,
        result: Result<Vec<Field>, ApiError>,
    ) -> Result<Applied<usize>, ViewError> {
        if !self.requests.settle(pending.token) {
            logging::debug(DataSource::Fields, None, "stale field list discarded");
            return Ok(Applied::Superseded);
        }

        match result {
            Ok(fields) => {
                let count = fields.len();
                self.state.fields = fields;
                self.state.field_options =
                    render_field_options(&self.state.fields, self.state.selected_field.as_deref());
                logging::debug(DataSource::Fields, None, &format!("{} fields loaded", count));
                Ok(Applied::Current(count))
            }
            Err(err) => {
                logging::log_api_failure(DataSource::Fields, None, "Field list load", &err);
                self.state.notify(NoticeLevel::Error, MSG_LOAD_FAILED);
                Err(err.into())
            }
        }
    }

    pub fn load_fields(&mut self) -> Result<Applied<usize>, ViewError> {
        let pending = self.begin_load_fields();
        let result = self.api.list_fields();
        self.complete_load_fields(pending, result)
    }

    /// Saves the named location, then reloads the field list.
    ///
    /// Requires a non-blank name and a map selection. A failed reload after a
    /// successful save is reported as a notice but does not fail the save.
    pub fn save_field(&mut self) -> Result<(), ViewError> {
        let name = self.state.field_name_input.trim().to_string();
        if name.is_empty() {
            return Err(self.reject(ValidationError::MissingFieldName));
        }
        let Some(location) = self.state.selected_location else {
            return Err(self.reject(ValidationError::MissingLocation));
        };

        if let Err(err) = self.api.save_field(&NewField::new(&name, location)) {
            logging::log_api_failure(DataSource::Fields, Some(name.as_str()), "Field save", &err);
            self.state.notify(NoticeLevel::Error, MSG_SAVE_FAILED);
            return Err(err.into());
        }

        logging::info(
            DataSource::Fields,
            Some(name.as_str()),
            &format!("saved at {:.5}, {:.5}", location.lat, location.lon),
        );
        self.state.notify(NoticeLevel::Info, MSG_FIELD_SAVED);
        self.state.field_name_input.clear();

        // A failed reload has already raised its own notice; the save stands.
        if let Err(err) = self.load_fields() {
            logging::debug(
                DataSource::Fields,
                Some(name.as_str()),
                &format!("field list reload after save failed: {}", err),
            );
        }
        Ok(())
    }

    // -- Show on map ---------------------------------------------------------

    pub fn begin_show_field(&mut self) -> Result<PendingShow, ViewError> {
        let field_name = self.selected_field_name()?;
        Ok(PendingShow {
            token: self.requests.issue(RequestKind::ShowField),
            field_name,
        })
    }

    /// Moves the marker to the selected field and zooms in on it. Yields the
    /// field's position, or `None` if the server no longer lists it (the map
    /// is then left untouched).
    pub fn complete_show_field(
        &mut self,
        pending: PendingShow,
        result: Result<Vec<Field>, ApiError>,
    ) -> Result<Applied<Option<Coordinates>>, ViewError> {
        if !self.requests.settle(pending.token) {
            logging::debug(DataSource::Fields, Some(pending.field_name.as_str()), "stale map lookup discarded");
            return Ok(Applied::Superseded);
        }

        let fields = match result {
            Ok(fields) => fields,
            Err(err) => {
                logging::log_api_failure(DataSource::Fields, Some(pending.field_name.as_str()), "Field lookup", &err);
                self.state.notify(NoticeLevel::Error, MSG_SHOW_FAILED);
                return Err(err.into());
            }
        };

        let Some(field) = fields.iter().find(|f| f.name == pending.field_name) else {
            logging::debug(DataSource::Fields, Some(pending.field_name.as_str()), "not in field list");
            return Ok(Applied::Current(None));
        };

        let at = field.location;
        self.state.map.place_marker(at);
        self.state.map.focus(at, self.focus_zoom);
        Ok(Applied::Current(Some(at)))
    }

    pub fn show_field_on_map(&mut self) -> Result<Applied<Option<Coordinates>>, ViewError> {
        let pending = self.begin_show_field()?;
        let result = self.api.list_fields();
        self.complete_show_field(pending, result)
    }

    // -- Forecast ------------------------------------------------------------

    pub fn begin_forecast(&mut self) -> Result<PendingForecast, ViewError> {
        let field_name = self.selected_field_name()?;
        Ok(PendingForecast {
            token: self.requests.issue(RequestKind::Forecast),
            field_name,
        })
    }

    /// Groups and renders a forecast response into the display region,
    /// replacing whatever was there. On failure the region keeps its
    /// previous content.
    pub fn complete_forecast(
        &mut self,
        pending: PendingForecast,
        result: Result<Vec<ForecastEntry>, ApiError>,
    ) -> Result<Applied<Vec<ForecastCard>>, ViewError> {
        if !self.requests.settle(pending.token) {
            logging::debug(DataSource::Forecast, Some(pending.field_name.as_str()), "stale forecast discarded");
            return Ok(Applied::Superseded);
        }

        let entries = match result {
            Ok(entries) => entries,
            Err(err) => {
                logging::log_api_failure(DataSource::Forecast, Some(pending.field_name.as_str()), "Forecast fetch", &err);
                self.state.notify(NoticeLevel::Error, MSG_FORECAST_FAILED);
                return Err(err.into());
            }
        };

        let cards = forecast_cards(&entries);
        self.state.forecast_region.replace(render_cards_html(&cards));
        logging::info(
            DataSource::Forecast,
            Some(pending.field_name.as_str()),
            &format!("rendered {} entries in {} cards", entries.len(), cards.len()),
        );
        Ok(Applied::Current(cards))
    }

    pub fn get_forecast(&mut self) -> Result<Applied<Vec<ForecastCard>>, ViewError> {
        let pending = self.begin_forecast()?;
        let result = self.api.fetch_forecast(&pending.field_name);
        self.complete_forecast(pending, result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Scripted API double that records every call.
    #[derive(Default)]
    struct ScriptedApi {
        fields: Vec<Field>,
        forecast: Vec<ForecastEntry>,
        fail_with: Option<ApiError>,
        /// Fails only the field list.
        fail_list_with: Option<ApiError>,
        calls: RefCell<Vec<String>>,
    }

    impl FieldApi for ScriptedApi {
        fn list_fields(&self) -> Result<Vec<Field>, ApiError> {
            self.calls.borrow_mut().push("list".to_string());
            match self.fail_list_with.as_ref().or(self.fail_with.as_ref()) {
                Some(err) => Err(err.clone()),
                None => Ok(self.fields.clone()),
            }
        }

        fn save_field(&self, field: &NewField) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(format!("save:{}", field.name));
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn fetch_forecast(&self, field_name: &str) -> Result<Vec<ForecastEntry>, ApiError> {
            self.calls.borrow_mut().push(format!("forecast:{}", field_name));
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(self.forecast.clone()),
            }
        }
    }

    fn field(name: &str, lat: f64, lon: f64) -> Field {
        Field { name: name.to_string(), location: Coordinates { lat, lon } }
    }

    fn entry(disease: &str, date: &str) -> ForecastEntry {
        ForecastEntry {
            disease: disease.to_string(),
            date: date.to_string(),
            risk: "Moderate".to_string(),
            temperature: 21.0,
            humidity: 70.0,
            rainfall: 1.0,
            cloud_cover: 30.0,
            leaf_wetness: 3.0,
        }
    }

    fn controller(api: ScriptedApi) -> ViewController<ScriptedApi> {
        ViewController::new(api, &MapConfig::default())
    }

    // --- Validation ----------------------------------------------------------

    #[test]
    fn test_save_without_name_makes_no_request() {
        let mut view = controller(ScriptedApi::default());
        view.handle_map_click(Coordinates { lat: 15.0, lon: 75.0 });
        view.set_field_name("   ");
        let result = view.save_field();
        assert_eq!(result, Err(ViewError::Validation(ValidationError::MissingFieldName)));
        assert!(view.api().calls.borrow().is_empty(), "validation must not hit the network");
        assert_eq!(view.state().last_notice().unwrap().message, "Please enter a field name");
    }

    #[test]
    fn test_save_without_map_selection_makes_no_request() {
        let mut view = controller(ScriptedApi::default());
        view.set_field_name("North");
        let result = view.save_field();
        assert_eq!(result, Err(ViewError::Validation(ValidationError::MissingLocation)));
        assert!(view.api().calls.borrow().is_empty());
    }

    #[test]
    fn test_forecast_and_show_require_selection() {
        let mut view = controller(ScriptedApi::default());
        assert_eq!(
            view.get_forecast().unwrap_err(),
            ViewError::Validation(ValidationError::MissingFieldSelection)
        );
        view.select_field("");
        assert_eq!(
            view.show_field_on_map().unwrap_err(),
            ViewError::Validation(ValidationError::MissingFieldSelection)
        );
        assert!(view.api().calls.borrow().is_empty());
        assert_eq!(view.take_notices().len(), 2);
    }

    // --- Save ----------------------------------------------------------------

    #[test]
    fn test_save_posts_trimmed_name_then_reloads() {
        let api = ScriptedApi { fields: vec![field("North", 15.0, 75.0)], ..Default::default() };
        let mut view = controller(api);
        view.handle_map_click(Coordinates { lat: 15.0, lon: 75.0 });
        view.set_field_name("  North ");
        view.save_field().expect("save should succeed");

        assert_eq!(*view.api().calls.borrow(), vec!["save:North".to_string(), "list".to_string()]);
        assert_eq!(view.state().field_name_input, "", "name input is cleared after save");
        assert_eq!(view.state().fields.len(), 1);
        assert!(view.state().field_options.contains("<option value=\"North\">North</option>"));
        assert_eq!(view.state().last_notice().unwrap().message, MSG_FIELD_SAVED);
    }

    #[test]
    fn test_failed_save_keeps_input_and_reports() {
        let api = ScriptedApi { fail_with: Some(ApiError::Http(500)), ..Default::default() };
        let mut view = controller(api);
        view.handle_map_click(Coordinates { lat: 15.0, lon: 75.0 });
        view.set_field_name("North");
        assert_eq!(view.save_field(), Err(ViewError::Api(ApiError::Http(500))));
        assert_eq!(view.state().field_name_input, "North");
        assert_eq!(view.state().last_notice().unwrap().message, MSG_SAVE_FAILED);
        assert_eq!(*view.api().calls.borrow(), vec!["save:North".to_string()], "no reload after failure");
    }

    #[test]
    fn test_failed_reload_after_save_still_succeeds() {
        let api = ScriptedApi { fail_list_with: Some(ApiError::Http(503)), ..Default::default() };
        let mut view = controller(api);
        view.handle_map_click(Coordinates { lat: 15.0, lon: 75.0 });
        view.set_field_name("North");

        assert_eq!(view.save_field(), Ok(()), "the save itself went through");
        assert_eq!(*view.api().calls.borrow(), vec!["save:North".to_string(), "list".to_string()]);

        let notices = view.take_notices();
        let messages: Vec<&str> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec![MSG_FIELD_SAVED, MSG_LOAD_FAILED]);
        assert_eq!(notices[1].level, NoticeLevel::Error);
        assert_eq!(view.state().field_name_input, "");
    }

    // --- Show on map ---------------------------------------------------------

    #[test]
    fn test_show_field_moves_marker_and_zooms() {
        let api = ScriptedApi { fields: vec![field("North", 16.25, 76.5)], ..Default::default() };
        let mut view = controller(api);
        view.select_field("North");
        let at = view.show_field_on_map().unwrap().current().flatten();
        let expected = Coordinates { lat: 16.25, lon: 76.5 };
        assert_eq!(at, Some(expected));
        assert_eq!(view.state().map.marker, Some(expected));
        assert_eq!(view.state().map.center, expected);
        assert_eq!(view.state().map.zoom, 13);
    }

    #[test]
    fn test_show_unknown_field_leaves_map_alone() {
        let api = ScriptedApi { fields: vec![field("North", 16.25, 76.5)], ..Default::default() };
        let mut view = controller(api);
        view.select_field("Gone");
        let before = view.state().map.clone();
        assert_eq!(view.show_field_on_map(), Ok(Applied::Current(None)));
        assert_eq!(view.state().map, before);
        assert!(view.state().notices.is_empty());
    }

    // --- Forecast ------------------------------------------------------------

    #[test]
    fn test_forecast_failure_keeps_previous_region() {
        let mut view = controller(ScriptedApi {
            forecast: vec![entry("Rust", "2024-01-01")],
            ..Default::default()
        });
        view.select_field("North");
        view.get_forecast().unwrap();
        let rendered = view.state().forecast_region.content().to_string();

        view.api.fail_with = Some(ApiError::Transport("timed out".into()));
        assert!(view.get_forecast().is_err());
        assert_eq!(view.state().forecast_region.content(), rendered);
        assert_eq!(view.state().last_notice().unwrap().message, MSG_FORECAST_FAILED);
    }

    #[test]
    fn test_stale_forecast_is_discarded_when_it_resolves_last() {
        let mut view = controller(ScriptedApi::default());
        view.select_field("North");
        let first = view.begin_forecast().unwrap();
        view.select_field("South");
        let second = view.begin_forecast().unwrap();
        assert!(view.in_flight(RequestKind::Forecast));

        let applied = view.complete_forecast(second, Ok(vec![entry("Blight", "2024-01-01")])).unwrap();
        assert!(!applied.is_superseded());
        assert!(!view.in_flight(RequestKind::Forecast));
        let shown = view.state().forecast_region.content().to_string();

        let stale = view.complete_forecast(first, Ok(vec![entry("Rust", "2024-01-01")])).unwrap();
        assert!(stale.is_superseded(), "older request must not overwrite newer result");
        assert_eq!(view.state().forecast_region.content(), shown);
        assert!(shown.contains("Blight"));
    }

    #[test]
    fn test_stale_forecast_is_discarded_when_it_resolves_first() {
        let mut view = controller(ScriptedApi::default());
        view.select_field("North");
        let first = view.begin_forecast().unwrap();
        let second = view.begin_forecast().unwrap();

        let stale = view.complete_forecast(first, Err(ApiError::Http(500))).unwrap();
        assert!(stale.is_superseded(), "stale failures are dropped silently");
        assert!(view.state().notices.is_empty());
        assert!(view.in_flight(RequestKind::Forecast), "newer request is still outstanding");

        let cards = view.complete_forecast(second, Ok(vec![entry("Rust", "1")])).unwrap().current();
        assert_eq!(cards.map(|c| c.len()), Some(1));
        assert_eq!(view.state().forecast_region.renders(), 1);
    }

    #[test]
    fn test_request_kinds_do_not_supersede_each_other() {
        let mut view = controller(ScriptedApi::default());
        view.select_field("North");
        let load = view.begin_load_fields();
        let forecast = view.begin_forecast().unwrap();
        assert_eq!(view.complete_load_fields(load, Ok(vec![field("North", 1.0, 2.0)])), Ok(Applied::Current(1)));
        assert!(!view.complete_forecast(forecast, Ok(vec![])).unwrap().is_superseded());
    }

    #[test]
    fn test_stale_field_list_is_discarded() {
        let mut view = controller(ScriptedApi::default());
        let first = view.begin_load_fields();
        let second = view.begin_load_fields();
        view.complete_load_fields(second, Ok(vec![field("New", 1.0, 1.0)])).unwrap();
        let stale = view.complete_load_fields(first, Ok(vec![field("Old", 2.0, 2.0)])).unwrap();
        assert!(stale.is_superseded());
        assert_eq!(view.state().fields[0].name, "New");
    }

    #[test]
    fn test_load_failure_reports_notice() {
        let mut view = controller(ScriptedApi {
            fail_with: Some(ApiError::Parse("expected object".into())),
            ..Default::default()
        });
        assert!(view.load_fields().is_err());
        assert_eq!(view.state().last_notice().unwrap().message, MSG_LOAD_FAILED);
    }

    #[test]
    fn test_selection_is_marked_in_options() {
        let mut view = controller(ScriptedApi {
            fields: vec![field("North", 1.0, 2.0), field("South", 3.0, 4.0)],
            ..Default::default()
        });
        view.load_fields().unwrap();
        view.select_field("South");
        assert!(view.state().field_options.contains("<option value=\"South\" selected>South</option>"));
    }
}
