pub mod rules;

#[cfg(test)]
mod tests;

use scraper::Html;
use std::fs;
use std::path::Path;

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::filter::{FileFilter, FileFilterConfig};
use crate::results::{Extraction, ExtractionStats};

pub use rules::{Field, FieldRule, FieldSelection, ParsedFragment, RuleSet};

/// Parses persisted fragments into product records
pub struct Extractor {
    rules: RuleSet,
    filter: FileFilter,
}

impl Extractor {
    /// Create an extractor with the marketplace rules and the configured file filter
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            rules: RuleSet::marketplace(&config.base_origin),
            filter: FileFilter::new(FileFilterConfig::from(config))?,
        })
    }

    /// Replace the file filter
    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the rule for one field
    pub fn with_rule(mut self, rule: Box<dyn FieldRule>) -> Self {
        self.rules.set(rule);
        self
    }

    /// Apply the field rules to one fragment's markup
    pub fn parse_fragment(&self, html: &str, fields: FieldSelection) -> ParsedFragment {
        let doc = Html::parse_document(html);
        self.rules.apply(&doc, fields)
    }

    /// Extract every accepted fragment file in `source_dir` (non-recursive).
    ///
    /// Only complete records are returned. Files that cannot be read are
    /// counted in `errors` and skipped; the run only fails if the directory
    /// itself cannot be listed.
    pub fn extract(
        &self,
        source_dir: impl AsRef<Path>,
        fields: FieldSelection,
    ) -> Result<Extraction, ExtractError> {
        let source_dir = source_dir.as_ref();
        ::log::info!("Extracting fragments from {}", source_dir.display());

        let entries = fs::read_dir(source_dir).map_err(|source| ExtractError::SourceDir {
            path: source_dir.display().to_string(),
            source,
        })?;

        let mut extraction = Extraction::default();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    ::log::warn!("Skipping unreadable entry in {}: {}", source_dir.display(), e);
                    continue;
                }
            };

            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !self.filter.accepts(&file_name) {
                ::log::trace!("File filter rejected: {}", file_name);
                continue;
            }

            let mut stats = ExtractionStats {
                total_files: 1,
                ..Default::default()
            };

            match fs::read(entry.path()) {
                Ok(bytes) => {
                    let html = String::from_utf8_lossy(&bytes);
                    let parsed = self.parse_fragment(&html, fields);
                    count_missing(&parsed, &mut stats);

                    if let Some(record) = parsed.into_record(&file_name) {
                        stats.complete_records = 1;
                        extraction.records.push(record);
                    } else {
                        ::log::debug!("Incomplete record in {}", file_name);
                    }
                }
                Err(e) => {
                    ::log::error!("Error processing file {}: {}", file_name, e);
                    stats.errors = 1;
                }
            }

            extraction.stats += stats;
        }

        log_summary(&extraction);
        Ok(extraction)
    }
}

/// Extract `source_dir` with the default configuration
pub fn extract(
    source_dir: impl AsRef<Path>,
    fields: FieldSelection,
) -> Result<Extraction, ExtractError> {
    Extractor::new(&ExtractorConfig::default())?.extract(source_dir, fields)
}

fn count_missing(parsed: &ParsedFragment, stats: &mut ExtractionStats) {
    for field in Field::ALL {
        if !parsed.is_missing(field) {
            continue;
        }
        match field {
            Field::Name => stats.missing_names += 1,
            Field::Price => stats.missing_prices += 1,
            Field::Rating => stats.missing_ratings += 1,
            Field::Link => stats.missing_links += 1,
            Field::Image => stats.missing_images += 1,
        }
    }
}

fn log_summary(extraction: &Extraction) {
    let stats = &extraction.stats;
    ::log::info!(
        "Extraction complete - {} files, {} products, {} complete records ({:.1}%)",
        stats.total_files,
        extraction.records.len(),
        stats.complete_records,
        stats.completion_rate()
    );
    ::log::info!(
        "Missing data - names: {}, prices: {}, ratings: {}, links: {}, images: {}, errors: {}",
        stats.missing_names,
        stats.missing_prices,
        stats.missing_ratings,
        stats.missing_links,
        stats.missing_images,
        stats.errors
    );
}
