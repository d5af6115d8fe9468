/// Forecast rendering.
///
/// Turns grouped forecast data into display cards. Building the cards is a
/// pure transform (`build_cards`); serialising them is left to `html` and
/// `text`, and placing them on screen is the view controller's job.
///
/// Submodules:
/// - `units`: measurement units and the fixed one-decimal format.
/// - `html`:  cards, field options and a standalone page as HTML.
/// - `text`:  plain-text tables for terminal output.

pub mod html;
pub mod text;
pub mod units;

use serde::Serialize;

use crate::analysis::groupings::group_by_disease;
use crate::model::{DiseaseGroup, ForecastEntry};
use crate::risk::risk_class;
use units::{Measurement, format_measurement};

// ---------------------------------------------------------------------------
// Card view model
// ---------------------------------------------------------------------------

/// One display card: a disease and its table rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    pub disease: String,
    pub rows: Vec<ForecastRow>,
}

/// One formatted table row. All values are ready to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub date: String,
    /// Risk text exactly as received.
    pub risk: String,
    /// Style class derived from `risk`, e.g. `risk-high`.
    pub risk_class: String,
    /// Formatted measurements in `Measurement::ALL` order.
    pub measurements: [String; 5],
}

impl ForecastRow {
    pub fn from_entry(entry: &ForecastEntry) -> Self {
        let values = [
            entry.temperature,
            entry.humidity,
            entry.rainfall,
            entry.cloud_cover,
            entry.leaf_wetness,
        ];
        let measurements = std::array::from_fn(|i| format_measurement(values[i], Measurement::ALL[i]));

        ForecastRow {
            date: entry.date.clone(),
            risk: entry.risk.clone(),
            risk_class: risk_class(&entry.risk),
            measurements,
        }
    }

    /// Formatted value for one column.
    pub fn measurement(&self, kind: Measurement) -> &str {
        let column = Measurement::ALL
            .iter()
            .position(|m| *m == kind)
            .unwrap_or_default();
        &self.measurements[column]
    }
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// Builds one card per group, in group order.
pub fn build_cards(groups: &[DiseaseGroup<'_>]) -> Vec<ForecastCard> {
    groups
        .iter()
        .map(|group| ForecastCard {
            disease: group.disease.to_string(),
            rows: group.entries.iter().map(|e| ForecastRow::from_entry(e)).collect(),
        })
        .collect()
}

/// Groups a flat forecast and builds its cards in one step.
pub fn forecast_cards(entries: &[ForecastEntry]) -> Vec<ForecastCard> {
    build_cards(&group_by_disease(entries))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
