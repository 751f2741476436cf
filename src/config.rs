use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// How the collector waits for client-side rendering after navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderWait {
    /// Sleep for a fixed number of milliseconds
    Fixed { millis: u64 },

    /// Wait until at least one container element is present, up to a timeout
    UntilContainers { timeout_millis: u64 },
}

impl RenderWait {
    /// Fixed delay from a `Duration`
    pub fn fixed(delay: Duration) -> Self {
        RenderWait::Fixed {
            millis: delay.as_millis() as u64,
        }
    }
}

impl Default for RenderWait {
    fn default() -> Self {
        RenderWait::Fixed { millis: 3000 }
    }
}

/// What the collector does when a single page fails to load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageErrorPolicy {
    /// Stop the run and propagate the error (files already written stay on disk)
    #[default]
    Abort,

    /// Log the failure, count it, and move on to the next page
    Skip,
}

/// Configuration for the search results collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether to request a headless browser session
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Search endpoint the keyword and page number are appended to
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Fixed query parameters reproducing the marketplace search context
    #[serde(default = "default_search_params")]
    pub search_params: Vec<(String, String)>,

    /// Layout container class whose elements are treated as product tiles
    #[serde(default = "default_container_class")]
    pub container_class: String,

    /// Fragments whose trimmed markup is not longer than this are skipped
    #[serde(default = "default_min_fragment_len")]
    pub min_fragment_len: usize,

    /// Wait strategy applied after each navigation
    #[serde(default)]
    pub render_wait: RenderWait,

    /// Behavior when a page cannot be fetched
    #[serde(default)]
    pub on_page_error: PageErrorPolicy,
}

/// Configuration for the fragment extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Origin prepended to relative product links
    #[serde(default = "default_base_origin")]
    pub base_origin: String,

    /// File extension (without dot) of persisted fragments
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Regex patterns for file names to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for file names to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Top level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarvestConfig {
    #[serde(default)]
    pub collector: CollectorConfig,

    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl HarvestConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the `WEBDRIVER_URL` environment override, if set
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.collector.webdriver_url = webdriver_url;
            }
        }
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        url::Url::parse(&self.collector.search_url)?;
        url::Url::parse(&self.extractor.base_origin)?;
        for pattern in self
            .extractor
            .include_patterns
            .iter()
            .chain(&self.extractor.exclude_patterns)
        {
            regex::Regex::new(pattern)?;
        }
        Ok(())
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            search_url: default_search_url(),
            search_params: default_search_params(),
            container_class: default_container_class(),
            min_fragment_len: default_min_fragment_len(),
            render_wait: RenderWait::default(),
            on_page_error: PageErrorPolicy::default(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_origin: default_base_origin(),
            extension: default_extension(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_search_url() -> String {
    "https://www.amazon.in/s".to_string()
}

/// Query parameters captured from a live search session on the marketplace
fn default_search_params() -> Vec<(String, String)> {
    [
        ("crid", "3GJ7S0QWWNCP0"),
        ("qid", "1765479616"),
        ("sprefix", "mobile,aps,508"),
        ("xpid", "1n4ZVr0HNNA3c"),
        ("ref", "sr_pg_2"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_container_class() -> String {
    "sg-col-inner".to_string()
}

/// Anything shorter is a layout cell, ad slot or placeholder
fn default_min_fragment_len() -> usize {
    2500
}

fn default_base_origin() -> String {
    "https://www.amazon.in".to_string()
}

fn default_extension() -> String {
    "html".to_string()
}
