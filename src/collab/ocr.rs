//! Receipt image text extraction
//!
//! OCR itself is delegated to the `tesseract` command-line tool. Batches
//! report per-file outcomes so one unreadable image never sinks the rest.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{TallyError, TallyResult};

/// Environment variable naming the tesseract binary
pub const TESSERACT_CMD_ENV: &str = "TESSERACT_CMD";

/// Image extensions picked up when walking a folder
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Turns an image into text
pub trait TextExtractor {
    fn extract_text(&self, path: &Path) -> TallyResult<String>;

    /// Non-empty trimmed lines of the extracted text
    fn extract_lines(&self, path: &Path) -> TallyResult<Vec<String>> {
        Ok(self
            .extract_text(path)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

/// [`TextExtractor`] backed by the `tesseract` binary
#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: OsString,
    lang: String,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl TesseractCli {
    /// Use `$TESSERACT_CMD`, or `tesseract` from `PATH`
    pub fn new() -> Self {
        let command = std::env::var_os(TESSERACT_CMD_ENV)
            .filter(|cmd| !cmd.is_empty())
            .unwrap_or_else(|| OsString::from("tesseract"));
        Self {
            command,
            lang: "eng".to_string(),
        }
    }

    pub fn with_command(mut self, command: impl Into<OsString>) -> Self {
        self.command = command.into();
        self
    }

    /// Tesseract language code
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

impl TextExtractor for TesseractCli {
    fn extract_text(&self, path: &Path) -> TallyResult<String> {
        if !path.is_file() {
            return Err(TallyError::Ocr(format!("No such image: {}", path.display())));
        }

        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|e| {
                TallyError::Ocr(format!(
                    "Could not run {} (set {} to the tesseract binary): {}",
                    self.command.to_string_lossy(),
                    TESSERACT_CMD_ENV,
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(TallyError::Ocr(format!(
                "tesseract failed on {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        debug!(path = %path.display(), bytes = output.stdout.len(), "extracted text");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Outcome for one file in a batch
#[derive(Debug)]
pub struct FileExtraction {
    pub path: PathBuf,
    pub lines: TallyResult<Vec<String>>,
}

/// Extract every path, continuing past individual failures
pub fn bulk_extract(extractor: &dyn TextExtractor, paths: &[PathBuf]) -> Vec<FileExtraction> {
    paths
        .iter()
        .map(|path| {
            let lines = extractor.extract_lines(path);
            if let Err(e) = &lines {
                warn!(path = %path.display(), error = %e, "text extraction failed");
            }
            FileExtraction {
                path: path.clone(),
                lines,
            }
        })
        .collect()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand folders into the images directly inside them (sorted by name);
/// plain file arguments are kept as given
pub fn collect_images(inputs: &[PathBuf]) -> TallyResult<Vec<PathBuf>> {
    let mut images = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)
                .map_err(|e| {
                    TallyError::Io(format!("Failed to read {}: {}", input.display(), e))
                })?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_image(path))
                .collect();
            found.sort();
            images.extend(found);
        } else {
            images.push(input.clone());
        }
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct FakeExtractor {
        texts: HashMap<PathBuf, String>,
    }

    impl TextExtractor for FakeExtractor {
        fn extract_text(&self, path: &Path) -> TallyResult<String> {
            self.texts
                .get(path)
                .cloned()
                .ok_or_else(|| TallyError::Ocr(format!("unreadable: {}", path.display())))
        }
    }

    #[test]
    fn test_extract_lines_trims_and_drops_blanks() {
        let path = PathBuf::from("a.png");
        let fake = FakeExtractor {
            texts: HashMap::from([(path.clone(), "  Milk 2.50 \n\n Bread 1.20\n".to_string())]),
        };
        assert_eq!(
            fake.extract_lines(&path).unwrap(),
            vec!["Milk 2.50", "Bread 1.20"]
        );
    }

    #[test]
    fn test_bulk_extract_continues_past_failures() {
        let good = PathBuf::from("good.png");
        let bad = PathBuf::from("bad.png");
        let fake = FakeExtractor {
            texts: HashMap::from([(good.clone(), "Coffee 3.00".to_string())]),
        };

        let results = bulk_extract(&fake, &[bad.clone(), good.clone()]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].path, bad);
        assert!(matches!(results[0].lines, Err(TallyError::Ocr(_))));
        assert_eq!(results[1].lines.as_ref().unwrap(), &vec!["Coffee 3.00"]);
    }

    #[test]
    fn test_collect_images() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.JPG", "a.png", "notes.txt", "c.jpeg"] {
            fs::write(temp_dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(temp_dir.path().join("nested.png")).unwrap();
        let explicit = PathBuf::from("elsewhere/receipt.tif");

        let images = collect_images(&[temp_dir.path().to_path_buf(), explicit.clone()]).unwrap();
        assert_eq!(
            images,
            vec![
                temp_dir.path().join("a.png"),
                temp_dir.path().join("b.JPG"),
                temp_dir.path().join("c.jpeg"),
                explicit,
            ]
        );
    }

    #[test]
    fn test_tesseract_missing_image() {
        let err = TesseractCli::new()
            .extract_text(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, TallyError::Ocr(_)));
    }

    #[test]
    fn test_tesseract_missing_binary() {
        let temp_dir = TempDir::new().unwrap();
        let image = temp_dir.path().join("r.png");
        fs::write(&image, b"not really a png").unwrap();

        let err = TesseractCli::new()
            .with_command(temp_dir.path().join("no-such-tesseract"))
            .extract_text(&image)
            .unwrap_err();
        assert!(err.to_string().contains("TESSERACT_CMD"));
    }
}
