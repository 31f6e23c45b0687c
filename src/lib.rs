//! Reads the consumption history and tariff modality off recognized
//! electricity bill text.
//!
//! [`BillAnalysis::from_text`] is the whole analysis: it never fails, and text
//! without anything recognizable still yields a complete record with an empty
//! history and an unknown tariff.

pub mod analysis;
pub mod consumption;
pub mod error;
pub mod ocr;
pub mod report;
pub mod tariff;

pub use analysis::{BillAnalysis, Recommendation};
pub use consumption::{ConsumptionEntry, extract_consumption_history};
pub use tariff::Tariff;
