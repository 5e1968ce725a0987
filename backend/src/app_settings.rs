use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::formats::ConvertOptions;
use crate::verse_table::CanonicalVerseTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Keep word-alignment spans in the output
    pub alignment: bool,
    pub formats: Vec<OutputFormat>,
    /// HTML appended to extracted passages
    pub attribution: Option<String>,
    /// Replacement for the embedded verse-count table
    pub verse_counts_path: Option<PathBuf>,
    pub language: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            alignment: false,
            formats: vec![OutputFormat::Html, OutputFormat::HtmlVerses, OutputFormat::Txt],
            attribution: None,
            verse_counts_path: None,
            language: "en".to_string(),
        }
    }
}

impl AppSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse settings")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        Self::from_json(&content)
    }

    /// Override fields from `SCRIPTURE_ALIGNMENT`, `SCRIPTURE_ATTRIBUTION`,
    /// `SCRIPTURE_LANGUAGE` and `SCRIPTURE_VERSE_COUNTS`.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    pub fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("SCRIPTURE_ALIGNMENT") {
            self.alignment = v.to_lowercase() == "true";
        }
        if let Some(v) = var("SCRIPTURE_ATTRIBUTION") {
            self.attribution = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(v) = var("SCRIPTURE_LANGUAGE").filter(|v| !v.trim().is_empty()) {
            self.language = v.trim().to_string();
        }
        if let Some(v) = var("SCRIPTURE_VERSE_COUNTS") {
            self.verse_counts_path = if v.is_empty() { None } else { Some(PathBuf::from(v)) };
        }
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            alignment: self.alignment,
        }
    }

    pub fn writes(&self, format: OutputFormat) -> bool {
        self.formats.contains(&format)
    }

    /// The configured verse-count table, or the embedded one.
    pub fn verse_table(&self) -> Result<Cow<'static, CanonicalVerseTable>> {
        match &self.verse_counts_path {
            Some(path) => Ok(Cow::Owned(CanonicalVerseTable::load_from_file(path)?)),
            None => Ok(Cow::Borrowed(CanonicalVerseTable::standard())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "html_verses")]
    HtmlVerses,
    #[serde(rename = "txt")]
    Txt,
}

impl OutputFormat {
    /// Directory of this format in the asset tree
    pub fn dir_name(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::HtmlVerses => "html_verses",
            OutputFormat::Txt => "txt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert!(!settings.alignment);
        assert!(settings.writes(OutputFormat::Html));
        assert!(settings.writes(OutputFormat::Txt));
        assert_eq!(settings.convert_options(), ConvertOptions::default());
        assert!(matches!(settings.verse_table().unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_partial_json() {
        let settings = AppSettings::from_json(r#"{"alignment": true, "formats": ["html_verses"]}"#).unwrap();
        assert!(settings.alignment);
        assert!(settings.writes(OutputFormat::HtmlVerses));
        assert!(!settings.writes(OutputFormat::Html));
        assert_eq!(settings.language, "en");
        assert!(AppSettings::from_json(r#"{"formats": ["pdf"]}"#).is_err());
    }

    #[test]
    fn test_var_overrides() {
        let mut settings = AppSettings::default();
        settings.apply_vars(|name| match name {
            "SCRIPTURE_ALIGNMENT" => Some("TRUE".to_string()),
            "SCRIPTURE_ATTRIBUTION" => Some("<p>KJV</p>".to_string()),
            "SCRIPTURE_LANGUAGE" => Some("de".to_string()),
            _ => None,
        });
        assert!(settings.alignment);
        assert_eq!(settings.language, "de");
        assert_eq!(settings.attribution.as_deref(), Some("<p>KJV</p>"));
        assert_eq!(settings.verse_counts_path, None);

        // A blank language keeps the current one
        settings.apply_vars(|name| (name == "SCRIPTURE_LANGUAGE").then(|| " ".to_string()));
        assert_eq!(settings.language, "de");
    }

    #[test]
    fn test_missing_verse_table_file() {
        let settings = AppSettings {
            verse_counts_path: Some(PathBuf::from("/nonexistent/verse_counts.json")),
            ..Default::default()
        };
        assert!(settings.verse_table().is_err());
    }
}
