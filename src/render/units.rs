/// Measurement kinds and their fixed display format.
///
/// Every measurement is shown with exactly one digit after the decimal
/// point followed by its unit suffix. Rounding follows the exact binary
/// value; exact ties round away from zero, so `61.25` shows as `61.3`
/// rather than the round-half-even `61.2`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Temperature,
    Humidity,
    Rainfall,
    CloudCover,
    LeafWetness,
}

impl Measurement {
    /// Table column order.
    pub const ALL: [Measurement; 5] = [
        Measurement::Temperature,
        Measurement::Humidity,
        Measurement::Rainfall,
        Measurement::CloudCover,
        Measurement::LeafWetness,
    ];

    pub fn unit(self) -> &'static str {
        match self {
            Measurement::Temperature => "°C",
            Measurement::Humidity => "%",
            Measurement::Rainfall => "mm",
            Measurement::CloudCover => "%",
            Measurement::LeafWetness => "hrs",
        }
    }

    /// Column heading.
    pub fn label(self) -> &'static str {
        match self {
            Measurement::Temperature => "Temperature",
            Measurement::Humidity => "Humidity",
            Measurement::Rainfall => "Rainfall",
            Measurement::CloudCover => "Cloud Cover",
            Measurement::LeafWetness => "Leaf Wetness",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// True when `value` lies exactly halfway between two one-decimal values.
///
/// Such values are odd multiples of 0.05, and the only ones representable
/// in binary are odd multiples of 0.25. Scaling by 4 is exact, so the check
/// never sees a product that was rounded onto a tie.
fn is_exact_tie(value: f64) -> bool {
    let quarters = value * 4.0;
    quarters.fract() == 0.0 && quarters % 2.0 != 0.0
}

/// Rounds to one decimal place. The exact binary value decides the
/// direction, and only exact ties go away from zero, so `0.15` (stored just
/// below the half) gives `0.1` while `5.25` gives `5.3`.
pub fn round_one_decimal(value: f64) -> String {
    let text = if is_exact_tie(value) {
        format!("{:.1}", (value * 10.0).round() / 10.0)
    } else {
        format!("{:.1}", value)
    };
    match text.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => text,
    }
}

/// Formats a value for display, e.g. `23.0°C`.
pub fn format_measurement(value: f64, kind: Measurement) -> String {
    format!("{}{}", round_one_decimal(value), kind.unit())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
