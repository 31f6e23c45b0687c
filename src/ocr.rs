//! The OCR boundary: turns an uploaded bill (image, PDF or already-recognized
//! text) into plain text for the analyzer.
//!
//! Recognition itself is delegated to external programs. The analyzer never
//! depends on anything in this module.

use crate::error::RecognitionError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{self, Command};
use std::sync::atomic::{AtomicU32, Ordering};
use std::{env, fs};
use tracing::{debug, info, warn};

/// Recognition language used when none is given (Portuguese).
pub const DEFAULT_LANGUAGE: &str = "por";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Image,
    Pdf,
    /// Text that was recognized elsewhere.
    Text,
}

impl DocumentKind {
    /// Accepts PDFs and images by extension, plus `.txt` for pre-recognized text.
    pub fn from_path(path: &Path) -> Result<Self, RecognitionError> {
        let ext = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "gif" | "webp" | "pbm" | "pgm"
            | "ppm" => Ok(DocumentKind::Image),
            "txt" => Ok(DocumentKind::Text),
            _ => Err(RecognitionError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A progress report from a recognition engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionProgress {
    pub status: String,
    /// Fraction complete, `0.0..=1.0`.
    pub progress: f32,
}

impl RecognitionProgress {
    fn new(status: impl Into<String>, progress: f32) -> Self {
        Self {
            status: status.into(),
            progress,
        }
    }
}

pub trait ProgressObserver {
    fn on_progress(&self, event: &RecognitionProgress);
}

/// Forwards every progress event to the log at debug level.
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, event: &RecognitionProgress) {
        debug!(status = %event.status, progress = event.progress, "recognition progress");
    }
}

pub trait TextRecognizer {
    fn recognize(
        &self,
        path: &Path,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<String, RecognitionError>;
}

fn report(progress: Option<&dyn ProgressObserver>, status: &str, fraction: f32) {
    if let Some(observer) = progress {
        observer.on_progress(&RecognitionProgress::new(status, fraction));
    }
}

/// Reads a file that already holds recognized text.
pub struct PlainText;

impl TextRecognizer for PlainText {
    fn recognize(
        &self,
        path: &Path,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<String, RecognitionError> {
        report(progress, "reading text", 0.0);
        let text = fs::read_to_string(path).map_err(|source| RecognitionError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        report(progress, "reading text", 1.0);
        Ok(text)
    }
}

/// Runs the `tesseract` command-line engine over an image.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    pub program: String,
    pub language: String,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            program: "tesseract".to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(
        &self,
        path: &Path,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<String, RecognitionError> {
        let mut command = Command::new(&self.program);
        command
            .arg(path)
            .arg("stdout")
            .args(["-l", self.language.as_str()]);
        report(progress, "recognizing text", 0.0);
        let text = run_engine(&self.program, path, command)?;
        report(progress, "recognizing text", 1.0);
        Ok(text)
    }
}

/// Reads a PDF's embedded text layer with `pdftotext`.
///
/// Scanned bills have no text layer, so when it comes back blank the pages are
/// rasterized with `pdftoppm` and recognized one by one with `ocr`.
pub struct PdfText {
    pub program: String,
    pub rasterizer: String,
    pub ocr: TesseractCli,
}

impl Default for PdfText {
    fn default() -> Self {
        Self {
            program: "pdftotext".to_string(),
            rasterizer: "pdftoppm".to_string(),
            ocr: TesseractCli::default(),
        }
    }
}

/// Resolution pages are rendered at before OCR.
const RASTER_DPI: &str = "300";

impl TextRecognizer for PdfText {
    fn recognize(
        &self,
        path: &Path,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<String, RecognitionError> {
        let mut command = Command::new(&self.program);
        command.arg("-layout").arg(path).arg("-");
        report(progress, "extracting pdf text", 0.0);
        let text = run_engine(&self.program, path, command)?;
        if !text.trim().is_empty() {
            report(progress, "extracting pdf text", 1.0);
            return Ok(text);
        }

        info!(path = %path.display(), "pdf has no text layer, falling back to OCR");
        self.recognize_scanned(path, progress)
    }
}

impl PdfText {
    fn recognize_scanned(
        &self,
        path: &Path,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<String, RecognitionError> {
        let scratch = ScratchDir::create()?;
        let mut command = Command::new(&self.rasterizer);
        command
            .args(["-r", RASTER_DPI, "-png"])
            .arg(path)
            .arg(scratch.path.join("page"));
        report(progress, "rasterizing pdf", 0.0);
        run_engine(&self.rasterizer, path, command)?;

        let pages = scratch.pages()?;
        if pages.is_empty() {
            return Err(RecognitionError::NoPages {
                path: path.to_path_buf(),
            });
        }
        debug!(pages = pages.len(), "rasterized pdf");

        let mut text = String::new();
        for (i, page) in pages.iter().enumerate() {
            report(progress, "recognizing text", i as f32 / pages.len() as f32);
            text.push_str(&self.ocr.recognize(page, None)?);
            text.push('\n');
        }
        report(progress, "recognizing text", 1.0);
        Ok(text)
    }
}

/// A private directory under the system temp dir, removed on drop.
struct ScratchDir {
    path: PathBuf,
}

static SCRATCH_COUNTER: AtomicU32 = AtomicU32::new(0);

impl ScratchDir {
    fn create() -> Result<Self, RecognitionError> {
        let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = env::temp_dir().join(format!("tarifa-ideal-{}-{}", process::id(), n));
        fs::create_dir_all(&path).map_err(|source| RecognitionError::Unreadable {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    /// Rendered pages in page order; `pdftoppm` zero-pads page numbers.
    fn pages(&self) -> Result<Vec<PathBuf>, RecognitionError> {
        let unreadable = |source| RecognitionError::Unreadable {
            path: self.path.clone(),
            source,
        };
        let mut pages = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(unreadable)? {
            let page = entry.map_err(unreadable)?.path();
            if page.extension().is_some_and(|ext| ext == "png") {
                pages.push(page);
            }
        }
        pages.sort();
        Ok(pages)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            warn!(path = %self.path.display(), "could not remove scratch dir: {}", e);
        }
    }
}

fn run_engine(
    engine: &str,
    path: &Path,
    mut command: Command,
) -> Result<String, RecognitionError> {
    // Surface a missing document as unreadable rather than as an engine failure.
    fs::metadata(path).map_err(|source| RecognitionError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(?command, "spawning recognition engine");
    let output = command
        .output()
        .map_err(|source| RecognitionError::EngineUnavailable {
            engine: engine.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(RecognitionError::EngineFailed {
            engine: engine.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    String::from_utf8(output.stdout).map_err(|source| RecognitionError::InvalidOutput {
        engine: engine.to_string(),
        source,
    })
}

/// Picks an engine by document kind.
#[derive(Default)]
pub struct DocumentRecognizer {
    pub image: TesseractCli,
    pub pdf: PdfText,
}

impl TextRecognizer for DocumentRecognizer {
    fn recognize(
        &self,
        path: &Path,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<String, RecognitionError> {
        let kind = DocumentKind::from_path(path)?;
        info!(path = %path.display(), ?kind, "recognizing document");
        match kind {
            DocumentKind::Image => self.image.recognize(path, progress),
            DocumentKind::Pdf => self.pdf.recognize(path, progress),
            DocumentKind::Text => PlainText.recognize(path, progress),
        }
    }
}
