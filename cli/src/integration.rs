//! High-level conversion API
//!
//! Converts USX files or whole directories into the asset tree:
//! `html/<BOOK>.html`, `html_verses/<BOOK>/<chapter>.json` and
//! `txt/<BOOK>/<chapter>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use walkdir::WalkDir;

use scripture_backend::app_settings::{AppSettings, OutputFormat};
use scripture_backend::error::ConversionError;
use scripture_backend::formats::convert_book;
use scripture_backend::logger;
use scripture_backend::types::BookOutputs;
use scripture_backend::verse_table::CanonicalVerseTable;
use scripture_backend::USX_EXTENSION;

/// Statistics from processing operations
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Number of USX files read
    pub files_processed: usize,
    /// Number of books converted and written
    pub books_converted: usize,
    /// Number of files that failed
    pub errors: usize,
    /// Failures caused by corrupt chapter or verse numbering
    pub sequence_errors: usize,
    pub failed_files: Vec<PathBuf>,
}

/// USX files under `dir`, sorted by path.
pub fn find_usx_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(USX_EXTENSION))
        })
        .collect();
    files.sort();
    files
}

pub struct BookConverter {
    settings: AppSettings,
    table: CanonicalVerseTable,
    verbose: bool,
}

impl BookConverter {
    pub fn new(settings: AppSettings, verbose: bool) -> Result<Self> {
        let table = settings
            .verse_table()
            .context("Failed to load the verse count table")?
            .into_owned();

        Ok(Self {
            settings,
            table,
            verbose,
        })
    }

    /// Read and convert one USX file.
    pub fn convert_file(&self, usx_path: &Path) -> Result<BookOutputs> {
        let content = fs::read_to_string(usx_path)
            .with_context(|| format!("Failed to read {}", usx_path.display()))?;

        convert_book(&content, &self.table, &self.settings.convert_options())
            .with_context(|| format!("Failed to convert {}", usx_path.display()))
    }

    /// Write the configured formats of a converted book. Returns the written paths.
    pub fn write_outputs(&self, outputs: &BookOutputs, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if self.settings.writes(OutputFormat::Html) {
            let dir = output_dir.join(OutputFormat::Html.dir_name());
            create_dir(&dir)?;
            let path = dir.join(format!("{}.html", outputs.book));
            fs::write(&path, &outputs.html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }

        if self.settings.writes(OutputFormat::HtmlVerses) {
            let dir = output_dir.join(OutputFormat::HtmlVerses.dir_name()).join(&outputs.book);
            written.extend(write_chapters(&dir, &outputs.html_verses)?);
        }

        if self.settings.writes(OutputFormat::Txt) {
            let dir = output_dir.join(OutputFormat::Txt.dir_name()).join(&outputs.book);
            written.extend(write_chapters(&dir, &outputs.txt)?);
        }

        Ok(written)
    }

    /// Convert one file and write its assets.
    pub fn process_file(&self, usx_path: &Path, output_dir: &Path) -> Result<BookOutputs> {
        if self.verbose {
            logger::info(&format!("  → Converting {}", usx_path.display()));
        }

        let outputs = self.convert_file(usx_path)?;
        let written = self.write_outputs(&outputs, output_dir)?;

        if self.verbose {
            logger::info(&format!("  ✓ {}: {} files written", outputs.book, written.len()));
        }

        Ok(outputs)
    }

    /// Convert every USX file under `input_dir`. A failing book is logged and
    /// counted, the remaining books are still converted.
    pub fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> Result<ProcessingStats> {
        if !input_dir.is_dir() {
            anyhow::bail!("Input directory does not exist: {}", input_dir.display());
        }
        create_dir(output_dir)?;

        let files = find_usx_files(input_dir);
        logger::info(&format!("Found {} USX files in {}", files.len(), input_dir.display()));

        let mut stats = ProcessingStats::default();

        for path in files {
            stats.files_processed += 1;

            match self.process_file(&path, output_dir) {
                Ok(_) => stats.books_converted += 1,
                Err(e) => {
                    logger::error(&format!("{:#}", e));
                    if e.downcast_ref::<ConversionError>().is_some_and(|ce| ce.is_sequence_error()) {
                        stats.sequence_errors += 1;
                    }
                    stats.errors += 1;
                    stats.failed_files.push(path);
                }
            }
        }

        Ok(stats)
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))
}

/// One JSON file per chapter, named by chapter number from 1.
fn write_chapters<T: Serialize>(dir: &Path, chapters: &[T]) -> Result<Vec<PathBuf>> {
    create_dir(dir)?;

    let mut written = Vec::with_capacity(chapters.len());
    for (i, chapter) in chapters.iter().enumerate() {
        let path = dir.join(format!("{}.json", i + 1));
        let json = serde_json::to_string(chapter).context("Failed to serialize chapter")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}
