use crate::consumption::{ConsumptionEntry, extract_consumption_history};
use crate::tariff::Tariff;
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::{Serialize, Serializer};

/// The recommendation attached to every analysis.
///
/// Nothing here is computed from the bill yet: the defaults are the fixed
/// values the tool has always shown, and callers may inject their own. Replace
/// with a real comparison once per-modality rates are available.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub tariff: Tariff,
    pub estimated_savings: BigDecimal,
}

impl Default for Recommendation {
    fn default() -> Self {
        Self {
            tariff: Tariff::White,
            // 134.75
            estimated_savings: BigDecimal::new(13475.into(), 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillAnalysis {
    pub current_tariff: Tariff,
    pub recommended_tariff: Tariff,
    #[serde(serialize_with = "serialize_currency")]
    pub estimated_savings: BigDecimal,
    pub consumption_history: Vec<ConsumptionEntry>,
}

impl BillAnalysis {
    /// Analyzes recognized bill text with the default recommendation.
    pub fn from_text(text: &str) -> Self {
        Self::with_recommendation(text, &Recommendation::default())
    }

    pub fn with_recommendation(text: &str, recommendation: &Recommendation) -> Self {
        Self {
            current_tariff: Tariff::classify(text),
            recommended_tariff: recommendation.tariff,
            estimated_savings: recommendation.estimated_savings.clone(),
            consumption_history: extract_consumption_history(text),
        }
    }

    pub fn has_history(&self) -> bool {
        !self.consumption_history.is_empty()
    }

    /// Savings as shown to the user, always with two decimal places.
    pub fn formatted_savings(&self) -> String {
        format_currency(&self.estimated_savings)
    }
}

pub fn format_currency(amount: &BigDecimal) -> String {
    amount.with_scale_round(2, RoundingMode::HalfUp).to_string()
}

/// Writes the amount as a number rounded to cents, like the displayed value.
fn serialize_currency<S: Serializer>(
    amount: &BigDecimal,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let cents = amount.with_scale_round(2, RoundingMode::HalfUp);
    match cents.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => serializer.serialize_str(&cents.to_string()),
    }
}
