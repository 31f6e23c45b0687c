use crate::analysis::BillAnalysis;
use crate::consumption::total_kwh;
use crate::error::CliError;
use clap::ValueEnum;
use std::io::Write;

#[derive(ValueEnum, Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable summary with a bar chart of the consumption history.
    #[default]
    Text,
    /// The full analysis as JSON.
    Json,
    /// Only the chart series: one `month,kwh` row per entry.
    Csv,
}

const BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '█';

pub fn write_report(
    analysis: &BillAnalysis,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => write_text(analysis, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, analysis)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(analysis, out)?,
    }
    Ok(())
}

fn write_text(analysis: &BillAnalysis, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Resultado da Análise")?;
    writeln!(out, "Modalidade Atual: {}", analysis.current_tariff)?;
    writeln!(out, "Melhor Modalidade: {}", analysis.recommended_tariff)?;
    writeln!(out, "Economia Estimada: R$ {}", analysis.formatted_savings())?;
    writeln!(out)?;
    writeln!(out, "Histórico de Consumo (kWh)")?;
    if !analysis.has_history() {
        return writeln!(out, "Nenhum histórico de consumo encontrado.");
    }
    for line in bar_chart(analysis) {
        writeln!(out, "{}", line)?;
    }
    writeln!(
        out,
        "Total: {} kWh em {} meses",
        total_kwh(&analysis.consumption_history),
        analysis.consumption_history.len()
    )
}

/// One horizontal bar per entry, scaled so the largest reading fills
/// `BAR_WIDTH`. The axis starts at zero.
fn bar_chart(analysis: &BillAnalysis) -> Vec<String> {
    let history = &analysis.consumption_history;
    let max = history.iter().map(|e| e.usage_kwh).max().unwrap_or(0);
    let label_width = history.iter().map(|e| e.period.len()).max().unwrap_or(0);
    history
        .iter()
        .map(|entry| {
            let len = if max == 0 {
                0
            } else {
                (entry.usage_kwh as usize * BAR_WIDTH).div_ceil(max as usize)
            };
            let bar: String = std::iter::repeat_n(BAR_CHAR, len).collect();
            format!(
                "{:<width$} | {} {}",
                entry.period,
                bar,
                entry.usage_kwh,
                width = label_width
            )
        })
        .collect()
}

fn write_csv(analysis: &BillAnalysis, out: &mut impl Write) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(out);
    for entry in &analysis.consumption_history {
        writer.serialize(entry)?;
    }
    if analysis.consumption_history.is_empty() {
        writer.write_record(["month", "kwh"])?;
    }
    writer.flush()?;
    Ok(())
}
