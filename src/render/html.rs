/// HTML output for the forecast view.
///
/// Builds the markup the page shows: one `disease-card` table per disease,
/// the field selector's `<option>` list, and a standalone page with the risk
/// stylesheet inlined. All text taken from the API is escaped; measurement
/// values come pre-formatted from `units`.

use crate::model::Field;
use crate::render::ForecastCard;
use crate::render::units::Measurement;

/// Placeholder shown first in the field selector.
pub const FIELD_PLACEHOLDER: &str = "Select a field...";

/// Style rules keyed by risk class. Classes with no entry here render
/// unstyled.
pub const RISK_STYLES: &[(&str, &str)] = &[
    ("risk-low", "color: #1e7e34; background: #d4edda;"),
    ("risk-low-risk", "color: #1e7e34; background: #d4edda;"),
    ("risk-moderate", "color: #856404; background: #fff3cd;"),
    ("risk-medium-risk", "color: #856404; background: #fff3cd;"),
    ("risk-high", "color: #721c24; background: #f8d7da; font-weight: bold;"),
    ("risk-high-risk", "color: #721c24; background: #f8d7da; font-weight: bold;"),
];

/// Looks up the style rule for a risk class.
pub fn risk_style(class: &str) -> Option<&'static str> {
    RISK_STYLES
        .iter()
        .find(|(name, _)| *name == class)
        .map(|(_, rule)| *rule)
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Forecast cards
// ============================================================================

/// Renders a single disease card with its table.
pub fn render_card(card: &ForecastCard) -> String {
    let mut html = String::with_capacity(1024);

    html.push_str("<div class=\"disease-card\">\n");
    html.push_str(&format!("<h4>🔬 {}</h4>\n", escape_html(&card.disease)));
    html.push_str("<table class=\"forecast-table\">\n<thead><tr><th>Date</th><th>Risk Level</th>");
    for kind in Measurement::ALL {
        html.push_str(&format!("<th>{}</th>", kind.label()));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in &card.rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"{}\">{}</td>",
            escape_html(&row.date),
            escape_html(&row.risk_class),
            escape_html(&row.risk)
        ));
        for value in &row.measurements {
            html.push_str(&format!("<td>{}</td>", value));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
    html
}

/// Renders all cards in order. No cards renders as an empty string.
pub fn render_cards_html(cards: &[ForecastCard]) -> String {
    cards.iter().map(render_card).collect()
}

// ============================================================================
// Field selector
// ============================================================================

/// Renders the `<option>` list for the field selector, placeholder first.
pub fn render_field_options(fields: &[Field], selected: Option<&str>) -> String {
    let mut html = format!("<option value=\"\">{}</option>\n", FIELD_PLACEHOLDER);
    for field in fields {
        let name = escape_html(&field.name);
        let marker = if selected == Some(field.name.as_str()) { " selected" } else { "" };
        html.push_str(&format!("<option value=\"{}\"{}>{}</option>\n", name, marker, name));
    }
    html
}

// ============================================================================
// Standalone page
// ============================================================================

/// Renders a complete HTML document for a field's forecast, with the risk
/// stylesheet embedded.
pub fn render_page(field_name: &str, cards: &[ForecastCard]) -> String {
    let mut html = String::with_capacity(4096);
    let title = escape_html(field_name);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(&format!("<title>Disease Forecast: {}</title>\n", title));
    html.push_str("<style>\n");
    html.push_str("body { font-family: system-ui, sans-serif; max-width: 960px; margin: 40px auto; padding: 20px; }\n");
    html.push_str(".disease-card { border: 1px solid #dee2e6; border-radius: 6px; padding: 16px; margin: 16px 0; }\n");
    html.push_str(".disease-card h4 { margin-top: 0; color: #2c3e50; }\n");
    html.push_str(".forecast-table { width: 100%; border-collapse: collapse; }\n");
    html.push_str(".forecast-table th { background: #34495e; color: white; text-align: left; padding: 8px; }\n");
    html.push_str(".forecast-table td { padding: 8px; border-bottom: 1px solid #ecf0f1; }\n");
    for (class, rule) in RISK_STYLES {
        html.push_str(&format!(".{} {{ {} }}\n", class, rule));
    }
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str(&format!("<h2>Disease Forecast: {}</h2>\n", title));
    html.push_str("<div id=\"forecast-results\">\n");
    if cards.is_empty() {
        html.push_str("<p>No forecast entries.</p>\n");
    } else {
        html.push_str(&render_cards_html(cards));
    }
    html.push_str("</div>\n</body>\n</html>\n");

    html
}

// ============================================================================
// Tests
// ============================================================================
