/// Plain-text rendering of forecast cards for terminal output.

use crate::render::ForecastCard;
use crate::render::units::Measurement;
use crate::risk::RiskTier;

const DATE_WIDTH: usize = 12;
const RISK_WIDTH: usize = 14;
const VALUE_WIDTH: usize = 13;

/// Marker printed in front of the risk text so severity stands out
/// without colour.
fn tier_marker(risk: &str) -> &'static str {
    match RiskTier::classify(risk) {
        Some(RiskTier::High) => "!! ",
        Some(RiskTier::Moderate) => "!  ",
        Some(RiskTier::Low) | None => "   ",
    }
}

fn pad(text: &str, width: usize) -> String {
    // Width in characters, not bytes: units contain '°'.
    let len = text.chars().count();
    if len >= width {
        format!("{} ", text)
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Renders one card as a heading followed by an aligned table.
pub fn render_card_text(card: &ForecastCard) -> String {
    let mut out = String::new();
    out.push_str(&format!("🔬 {}\n", card.disease));

    let mut header = pad("Date", DATE_WIDTH);
    header.push_str(&pad("Risk Level", RISK_WIDTH));
    for kind in Measurement::ALL {
        header.push_str(&pad(kind.label(), VALUE_WIDTH));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(&"─".repeat(header.trim_end().chars().count()));
    out.push('\n');

    for row in &card.rows {
        let mut line = pad(&row.date, DATE_WIDTH);
        line.push_str(&pad(&format!("{}{}", tier_marker(&row.risk), row.risk), RISK_WIDTH));
        for value in &row.measurements {
            line.push_str(&pad(value, VALUE_WIDTH));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Renders all cards separated by blank lines.
pub fn render_cards_text(cards: &[ForecastCard]) -> String {
    cards
        .iter()
        .map(render_card_text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForecastEntry;
    use crate::render::forecast_cards;

    fn entry(disease: &str, risk: &str) -> ForecastEntry {
        ForecastEntry {
            disease: disease.to_string(),
            date: "2024-01-01".to_string(),
            risk: risk.to_string(),
            temperature: 18.0,
            humidity: 55.0,
            rainfall: 2.1,
            cloud_cover: 10.0,
            leaf_wetness: 1.0,
        }
    }

    #[test]
    fn test_text_card_lists_formatted_values() {
        let cards = forecast_cards(&[entry("Rust", "Low")]);
        let text = render_cards_text(&cards);
        assert!(text.starts_with("🔬 Rust\n"));
        assert!(text.contains("18.0°C"));
        assert!(text.contains("2.1mm"));
        assert!(text.contains("1.0hrs"));
    }

    #[test]
    fn test_high_risk_is_marked() {
        let cards = forecast_cards(&[entry("Blight", "High")]);
        let text = render_cards_text(&cards);
        assert!(text.contains("!! High"));
    }

    #[test]
    fn test_columns_align_across_rows() {
        let cards = forecast_cards(&[entry("Rust", "Low"), entry("Rust", "Moderate")]);
        let text = render_card_text(&cards[0]);
        let rows: Vec<&str> = text.lines().skip(3).collect();
        let offsets: Vec<usize> = rows
            .iter()
            .map(|line| line.chars().position(|c| c == '°').expect("temperature column"))
            .collect();
        assert_eq!(offsets[0], offsets[1], "temperature column should line up");
    }

    #[test]
    fn test_empty_forecast_renders_nothing() {
        assert_eq!(render_cards_text(&[]), "");
    }
}
