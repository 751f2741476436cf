// Re-export modules
pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod filter;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use collector::{Collector, collect};
pub use error::{CollectError, ExportError, ExtractError, HarvestError};
pub use extractor::{Extractor, Field, FieldSelection, extract};
pub use results::{CollectSummary, Extraction, ExtractionStats, NOT_AVAILABLE, ProductRecord};

use std::path::PathBuf;

use collector::BrowserLauncher;
use config::HarvestConfig;
use filter::{FileFilter, FileFilterConfig};

/// Result of a combined collect-then-extract run
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub collected: CollectSummary,
    pub extraction: Extraction,
}

/// Builder for a full run: collect search result pages, then extract them
pub struct Harvest {
    keyword: String,
    pages: usize,
    data_dir: PathBuf,
    fields: FieldSelection,
    keyword_only: bool,
    config: HarvestConfig,
}

impl Harvest {
    /// Create a new Harvest builder for the given keyword
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            pages: 5,
            data_dir: PathBuf::from("data"),
            fields: FieldSelection::default(),
            keyword_only: false,
            config: HarvestConfig::default(),
        }
    }

    /// Set the number of result pages to visit
    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages;
        self
    }

    /// Set the directory fragments are written to and read from
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Select which fields the extractor attempts
    pub fn with_fields(mut self, fields: FieldSelection) -> Self {
        self.fields = fields;
        self
    }

    /// Only extract files produced for this keyword, not the whole directory
    pub fn keyword_only(mut self, enabled: bool) -> Self {
        self.keyword_only = enabled;
        self
    }

    /// Set the configuration
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = HarvestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Run both stages through a WebDriver server
    pub async fn run(self) -> Result<HarvestReport, HarvestError> {
        let collector = Collector::webdriver(self.config.collector.clone());
        self.run_with(&collector).await
    }

    /// Run both stages with a specific collector
    pub async fn run_with<L: BrowserLauncher>(
        self,
        collector: &Collector<L>,
    ) -> Result<HarvestReport, HarvestError> {
        let collected = collector
            .run(&self.keyword, self.pages, &self.data_dir)
            .await?;

        let mut extractor = Extractor::new(&self.config.extractor)?;
        if self.keyword_only {
            let mut filter_config = FileFilterConfig::from(&self.config.extractor);
            filter_config.keyword = Some(self.keyword.clone());
            extractor = extractor.with_filter(FileFilter::new(filter_config).map_err(ExtractError::from)?);
        }

        let extraction = extractor.extract(&self.data_dir, self.fields)?;
        Ok(HarvestReport {
            collected,
            extraction,
        })
    }
}
