//! Risk tier classification for display.
//!
//! The API reports risk as free text ("Low", "MODERATE", "High", ...). The
//! view keeps that text verbatim for display and derives a lower-case token
//! from it to pick a style bucket. Unknown tokens are not an error; they
//! simply select a style with no matching rule.

use std::fmt;

/// Known risk tiers, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    /// Looks up a tier from a classification token (see `risk_token`).
    ///
    /// The predictor labels tiers as "Low Risk" / "Medium Risk" / "High Risk",
    /// so a trailing `-risk` is accepted and `medium` means moderate. The
    /// style class keeps the full token, so class and tier can differ:
    ///
    /// ```
    /// use agrimon_view::risk::{RiskTier, risk_class, risk_token};
    ///
    /// assert_eq!(risk_class("Medium Risk"), "risk-medium-risk");
    /// assert_eq!(RiskTier::from_token(&risk_token("Medium Risk")), Some(RiskTier::Moderate));
    /// assert_eq!(RiskTier::from_token("high"), Some(RiskTier::High));
    /// assert_eq!(RiskTier::from_token("severe"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<RiskTier> {
        match token.strip_suffix("-risk").unwrap_or(token) {
            "low" => Some(RiskTier::Low),
            "moderate" | "medium" => Some(RiskTier::Moderate),
            "high" => Some(RiskTier::High),
            _ => None,
        }
    }

    /// Classifies raw risk text, ignoring case.
    pub fn classify(risk: &str) -> Option<RiskTier> {
        Self::from_token(&risk_token(risk))
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Moderate => write!(f, "moderate"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

/// Derives the classification token for a risk value.
///
/// The text is trimmed and lower-cased; inner whitespace runs become a
/// single `-` so the token is always usable as one CSS class name.
pub fn risk_token(risk: &str) -> String {
    risk.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// The style class attached to a risk cell, e.g. `risk-high`.
pub fn risk_class(risk: &str) -> String {
    format!("risk-{}", risk_token(risk))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
