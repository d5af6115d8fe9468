/// Integration tests for dev-mode replay
///
/// Tests verify:
/// 1. Saved API responses drive the view controller like the live API
/// 2. A malformed saved forecast fails without rendering anything
/// 3. The verification runner works against replay data
///
/// Run with: cargo test --test replay_integration

use std::fs;
use std::path::Path;

use agrimon_view::config::MapConfig;
use agrimon_view::dev_mode::{ReplayApi, load_forecast_file};
use agrimon_view::render::forecast_cards;
use agrimon_view::verify::{VerificationStatus, run_full_verification};
use agrimon_view::{ApiError, ViewController, ViewError};

const FIELDS_JSON: &str = r#"{
  "North Plot": {"lat": 15.31, "lon": 75.71},
  "River Bend": {"lat": 15.9, "lon": 76.2}
}"#;

const NORTH_FORECAST: &str = r#"[
  {"date": "2024-06-01", "disease": "Late Blight", "risk": "High Risk", "temperature": 19.4,
   "humidity": 93.1, "rainfall": 4.2, "cloud_cover": 88.0, "leaf_wetness": 15.2},
  {"date": "2024-06-01", "disease": "Early Blight", "risk": "Low Risk", "temperature": 19.4,
   "humidity": 93.1, "rainfall": 4.2, "cloud_cover": 88.0, "leaf_wetness": 15.2},
  {"date": "2024-06-02", "disease": "Late Blight", "risk": "Medium Risk", "temperature": 21.0,
   "humidity": 85.0, "rainfall": 0.0, "cloud_cover": 40.5, "leaf_wetness": 8}
]"#;

fn write_replay_dir(root: &Path) {
    fs::create_dir_all(root.join("forecast")).unwrap();
    fs::write(root.join("fields.json"), FIELDS_JSON).unwrap();
    fs::write(root.join("forecast").join("North%20Plot.json"), NORTH_FORECAST).unwrap();
    fs::write(root.join("forecast").join("River%20Bend.json"), r#"[{"disease": "Rust"}]"#).unwrap();
}

#[test]
fn test_replay_forecast_renders_through_controller() {
    let dir = tempfile::tempdir().unwrap();
    write_replay_dir(dir.path());

    let mut view = ViewController::new(ReplayApi::new(dir.path()), &MapConfig::default());
    view.load_fields().expect("fields.json loads");
    assert_eq!(view.state().fields[0].name, "North Plot");

    view.select_field("North Plot");
    let cards = view.get_forecast().unwrap().current().unwrap();
    let names: Vec<&str> = cards.iter().map(|c| c.disease.as_str()).collect();
    assert_eq!(names, vec!["Late Blight", "Early Blight"]);

    let html = view.state().forecast_region.content();
    assert!(html.contains("<td class=\"risk-high-risk\">High Risk</td>"));
    assert!(html.contains("<td>8.0hrs</td>"));
}

#[test]
fn test_malformed_replay_forecast_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    write_replay_dir(dir.path());

    let mut view = ViewController::new(ReplayApi::new(dir.path()), &MapConfig::default());
    view.select_field("River Bend");
    match view.get_forecast() {
        Err(ViewError::Api(ApiError::Parse(_))) => {}
        other => panic!("expected parse failure, got {:?}", other),
    }
    assert_eq!(view.state().forecast_region.content(), "", "nothing is rendered");
    assert_eq!(view.state().forecast_region.renders(), 0);
}

#[test]
fn test_saved_field_visible_in_replay_list() {
    let dir = tempfile::tempdir().unwrap();
    write_replay_dir(dir.path());

    let mut view = ViewController::new(ReplayApi::new(dir.path()), &MapConfig::default());
    view.handle_map_click(agrimon_view::Coordinates { lat: 14.0, lon: 74.0 });
    view.set_field_name("Hill Top");
    view.save_field().unwrap();

    let names: Vec<&str> = view.state().fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["North Plot", "River Bend", "Hill Top"]);
}

#[test]
fn test_verification_against_replay_data() {
    let dir = tempfile::tempdir().unwrap();
    write_replay_dir(dir.path());

    let report = run_full_verification(&ReplayApi::new(dir.path())).unwrap();
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.field_results[0].status, VerificationStatus::Success);
    assert_eq!(report.field_results[0].diseases, vec!["Late Blight", "Early Blight"]);
    assert_eq!(report.field_results[1].status, VerificationStatus::Failed);
}

#[test]
fn test_load_forecast_file_for_one_off_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.json");
    fs::write(&path, NORTH_FORECAST).unwrap();

    let entries = load_forecast_file(&path).unwrap();
    let cards = forecast_cards(&entries);
    assert_eq!(cards[0].rows.len(), 2);
    assert_eq!(cards[0].rows[1].risk, "Medium Risk");
}
