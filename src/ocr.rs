use std::{path::Path, process::Command};

use crate::error::{Error, Result};

/// Source of raw recognized text for an image.
///
/// Each returned string becomes one phrase after normalization. A failure
/// specific to one image is reported as [`Error::Ocr`]; anything else means
/// the extractor itself is unusable.
pub trait TextExtractor {
    fn extract(&self, image: &Path) -> Result<Vec<String>>;
}

/// Page segmentation modes tried on every image: a single uniform block of
/// text, then sparse text with orientation detection.
const PAGE_SEG_MODES: [u8; 2] = [6, 12];

/// Runs the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct Tesseract {
    program: String,
    lang: String,
}

impl Tesseract {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            program: "tesseract".to_string(),
            lang: lang.into(),
        }
    }

    /// Use a specific executable instead of `tesseract` from `PATH`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, image: &Path, psm: u8) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg(psm.to_string())
            .output()
            .map_err(|e| {
                Error::Config(format!(
                    "failed to run {} (is tesseract installed?): {e}",
                    self.program
                ))
            })?;

        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "{} exited with {} on {}: {}",
                self.program,
                output.status,
                image.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TextExtractor for Tesseract {
    fn extract(&self, image: &Path) -> Result<Vec<String>> {
        PAGE_SEG_MODES
            .iter()
            .map(|&psm| {
                tracing::debug!(image = %image.display(), psm, "running OCR");
                self.run(image, psm)
            })
            .collect()
    }
}
