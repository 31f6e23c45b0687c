use tarifa_ideal::{BillAnalysis, ConsumptionEntry, Recommendation, Tariff};

fn history(analysis: &BillAnalysis) -> Vec<(&str, u32)> {
    analysis
        .consumption_history
        .iter()
        .map(|ConsumptionEntry { period, usage_kwh }| (period.as_str(), *usage_kwh))
        .collect()
}

#[test]
fn two_months_on_separate_lines() {
    let analysis = BillAnalysis::from_text("JAN23 450\nFEB23 430");
    assert_eq!(history(&analysis), vec![("JAN23", 450), ("FEB23", 430)]);
}

#[test]
fn irrelevant_text() {
    let analysis = BillAnalysis::from_text("no relevant data here");
    assert!(history(&analysis).is_empty());
    assert_eq!(analysis.current_tariff, Tariff::Unknown);
}

#[test]
fn flat_tariff_bill() {
    let analysis =
        BillAnalysis::from_text("Classificação: B1 Residencial Convencional Monômia\nMAR24 1000");
    assert_eq!(analysis.current_tariff, Tariff::ConventionalMonomial);
    assert_eq!(analysis.current_tariff.label(), "Convencional Monômia");
    assert_eq!(history(&analysis), vec![("MAR24", 1000)]);
}

#[test]
fn two_letter_period_is_ignored() {
    assert!(history(&BillAnalysis::from_text("AB12 500")).is_empty());
}

#[test]
fn five_digit_usage_is_ignored() {
    assert!(history(&BillAnalysis::from_text("JAN23 12345")).is_empty());
}

#[test]
fn empty_text() {
    let analysis = BillAnalysis::from_text("");
    let defaults = Recommendation::default();
    assert!(history(&analysis).is_empty());
    assert_eq!(analysis.current_tariff, Tariff::Unknown);
    assert_eq!(analysis.recommended_tariff, defaults.tariff);
    assert_eq!(analysis.estimated_savings, defaults.estimated_savings);
    assert_eq!(analysis.formatted_savings(), "134.75");
}

#[test]
fn realistic_bill_history_table() {
    let text = "\
ENERGISA SUL-SUDESTE
Modalidade Tarifária: Convencional Monômia
HISTÓRICO DE CONSUMO
MÊS/ANO CONSUMO kWh  MÊS/ANO CONSUMO kWh
DEZ23 512  JUN23 388
NOV23 470  MAI23 401
OUT23 455  ABR23 3979
";
    let analysis = BillAnalysis::from_text(text);
    assert_eq!(analysis.current_tariff, Tariff::ConventionalMonomial);
    assert_eq!(
        history(&analysis),
        vec![
            ("DEZ23", 512),
            ("JUN23", 388),
            ("NOV23", 470),
            ("MAI23", 401),
            ("OUT23", 455),
            ("ABR23", 3979),
        ]
    );
}

#[test]
fn analysis_is_repeatable() {
    let text = "Convencional Monômia\nJAN23 450 FEB23 430\nJAN23 450";
    assert_eq!(BillAnalysis::from_text(text), BillAnalysis::from_text(text));
}
