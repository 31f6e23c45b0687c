use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// One billing period's usage, as printed on the bill's history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumptionEntry {
    /// Month abbreviation plus two-digit year, e.g. `JAN23`. Kept as printed.
    #[serde(rename = "month")]
    pub period: String,
    #[serde(rename = "kwh")]
    pub usage_kwh: u32,
}

// The usage run is captured greedily and length-checked afterwards, so a
// 5-digit reading is rejected instead of being truncated to its first 4 digits.
static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]{3}[0-9]{2})\s+([0-9]+)").expect("consumption entry pattern is valid")
});

const USAGE_DIGITS: std::ops::RangeInclusive<usize> = 3..=4;

/// Scans recognized bill text for `<MMMYY> <kWh>` tokens, line by line.
///
/// Entries come back in the order they appear: line order first, then left to
/// right within a line. Nothing is deduplicated or sorted, and OCR noise that
/// happens to fit the pattern is kept. Text without any match yields an empty
/// history.
pub fn extract_consumption_history(text: &str) -> Vec<ConsumptionEntry> {
    text.lines().flat_map(extract_line).collect()
}

fn extract_line(line: &str) -> impl Iterator<Item = ConsumptionEntry> + '_ {
    ENTRY_PATTERN.captures_iter(line).filter_map(|caps| {
        let usage = &caps[2];
        if !USAGE_DIGITS.contains(&usage.len()) {
            return None;
        }
        Some(ConsumptionEntry {
            period: caps[1].to_string(),
            usage_kwh: usage.parse().ok()?,
        })
    })
}

/// Sum of the usage across a history, in kWh.
pub fn total_kwh<'a>(history: impl IntoIterator<Item = &'a ConsumptionEntry>) -> u64 {
    history
        .into_iter()
        .map(|entry| u64::from(entry.usage_kwh))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(period: &str, usage_kwh: u32) -> ConsumptionEntry {
        ConsumptionEntry {
            period: period.to_string(),
            usage_kwh,
        }
    }

    #[test]
    fn extracts_one_entry_per_line() {
        let history = extract_consumption_history("JAN23 450\nFEB23 430");
        assert_eq!(history, vec![entry("JAN23", 450), entry("FEB23", 430)]);
    }

    #[test]
    fn keeps_every_match_within_a_line_in_order() {
        let history = extract_consumption_history("MAR23 312  ABR23 298\tMAI23  1020");
        assert_eq!(
            history,
            vec![entry("MAR23", 312), entry("ABR23", 298), entry("MAI23", 1020)]
        );
    }

    #[test]
    fn keeps_duplicates_and_source_order() {
        let history = extract_consumption_history("FEB23 430\nJAN23 450\nFEB23 430");
        assert_eq!(
            history,
            vec![entry("FEB23", 430), entry("JAN23", 450), entry("FEB23", 430)]
        );
    }

    #[test]
    fn empty_text_has_no_history() {
        assert!(extract_consumption_history("").is_empty());
        assert!(extract_consumption_history("no relevant data here").is_empty());
    }

    #[test]
    fn requires_three_uppercase_letters() {
        assert!(extract_consumption_history("AB12 500").is_empty());
        assert!(extract_consumption_history("jan23 500").is_empty());
    }

    #[test]
    fn usage_must_have_three_or_four_digits() {
        assert!(extract_consumption_history("JAN23 12345").is_empty());
        assert!(extract_consumption_history("JAN23 45").is_empty());
        assert_eq!(extract_consumption_history("JAN23 0450"), vec![entry("JAN23", 450)]);
    }

    #[test]
    fn period_and_usage_must_share_a_line() {
        assert!(extract_consumption_history("JAN23\n450").is_empty());
        assert_eq!(
            extract_consumption_history("JAN23 450\r\nFEB23 430\r\n"),
            vec![entry("JAN23", 450), entry("FEB23", 430)]
        );
    }

    #[test]
    fn tolerates_surrounding_ocr_noise() {
        let history = extract_consumption_history("|XJAN23 450kWh ~~ FEV23 4.30");
        assert_eq!(history, vec![entry("JAN23", 450)]);
    }

    #[test]
    fn sums_usage() {
        let history = extract_consumption_history("JAN23 450\nFEB23 430\nMAR23 9999");
        assert_eq!(total_kwh(&history), 10879);
        assert_eq!(total_kwh(&Vec::<ConsumptionEntry>::new()), 0);
    }
}
