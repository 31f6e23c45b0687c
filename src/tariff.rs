use clap::ValueEnum;
use serde::{Serialize, Serializer};
use std::fmt;

/// Tariff modalities the analyzer knows how to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tariff {
    /// Flat, single-rate residential tariff.
    ConventionalMonomial,
    /// Time-of-use tariff with off-peak, intermediate and peak rates.
    White,
    /// The bill named no modality we recognize.
    #[value(skip)]
    Unknown,
}

/// Substring that marks a bill as billed under the flat tariff. Case-sensitive,
/// accented exactly as the distributor prints it.
const MONOMIAL_MARKER: &str = "Monômia";

impl Tariff {
    /// Classifies the modality printed on a bill.
    ///
    /// Only the flat tariff is detected; every other text is `Unknown`.
    pub fn classify(text: &str) -> Self {
        if text.contains(MONOMIAL_MARKER) {
            Tariff::ConventionalMonomial
        } else {
            Tariff::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tariff::ConventionalMonomial => "Convencional Monômia",
            Tariff::White => "Branca",
            Tariff::Unknown => "Desconhecida",
        }
    }
}

/// Serialized as its display label.
impl Serialize for Tariff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl fmt::Display for Tariff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
