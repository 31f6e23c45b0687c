use bigdecimal::BigDecimal;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tarifa_ideal::error::CliError;
use tarifa_ideal::ocr::{
    DEFAULT_LANGUAGE, DocumentRecognizer, LogProgress, PdfText, TesseractCli, TextRecognizer,
};
use tarifa_ideal::report::{OutputFormat, write_report};
use tarifa_ideal::{BillAnalysis, Recommendation, Tariff};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Tarifa Ideal: find the best tariff for your electricity bill.
/// Give it a photo, scan or PDF of your bill and it reads the consumption history
/// and your current tariff modality off the page.
#[derive(Parser, Debug)]
#[command(version, long_about)]
struct TarifaIdeal {
    /// The bill: a PDF, an image (png, jpg, tiff, ...), or a .txt file that was
    /// already run through OCR.
    #[arg(long_help)]
    document: PathBuf,
    /// OCR language, as understood by tesseract.
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    language: String,
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
    #[arg(long, value_enum, default_value = "white", long_help = placeholder_help("tariff"))]
    recommended_tariff: Tariff,
    #[arg(long, default_value = "134.75", long_help = placeholder_help("savings, in reais,"))]
    estimated_savings: BigDecimal,
    /// Program used to recognize images.
    #[arg(long, default_value = "tesseract")]
    tesseract: String,
    /// Program used to extract text from PDFs.
    #[arg(long, default_value = "pdftotext")]
    pdftotext: String,
    /// Program used to render scanned PDF pages to images for OCR.
    #[arg(long, default_value = "pdftoppm")]
    pdftoppm: String,
    /// Log recognition progress. `RUST_LOG` takes precedence.
    #[arg(short, long)]
    verbose: bool,
}

fn placeholder_help(what: &str) -> String {
    format!(
        "The recommended {} shown with every analysis. \
         This is not computed from the bill: the tool has no per-modality rates yet, so it \
         shows a fixed recommendation that you can override here.",
        what
    )
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = TarifaIdeal::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Recognition(e)) => {
            error!(document = %args.document.display(), "could not recognize the bill: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &TarifaIdeal) -> Result<(), CliError> {
    let tesseract = TesseractCli {
        program: args.tesseract.clone(),
        language: args.language.clone(),
    };
    let recognizer = DocumentRecognizer {
        pdf: PdfText {
            program: args.pdftotext.clone(),
            rasterizer: args.pdftoppm.clone(),
            ocr: tesseract.clone(),
        },
        image: tesseract,
    };
    let text = recognizer.recognize(&args.document, Some(&LogProgress))?;
    info!("Recognized {} characters", text.chars().count());

    let recommendation = Recommendation {
        tariff: args.recommended_tariff,
        estimated_savings: args.estimated_savings.clone(),
    };
    let analysis = BillAnalysis::with_recommendation(&text, &recommendation);
    if analysis.has_history() {
        info!(
            "Found {} consumption entries",
            analysis.consumption_history.len()
        );
    } else {
        warn!("Bill was recognized but no consumption history was found");
    }

    let stdout = io::stdout();
    write_report(&analysis, args.format, &mut stdout.lock())
}
