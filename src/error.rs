use thiserror::Error;

/// Failures while driving the browser or writing fragments
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("could not connect to a WebDriver server at {0}")]
    Connect(String),

    #[error("failed to load page {page} ({url}): {reason}")]
    Fetch {
        page: usize,
        url: String,
        reason: String,
    },

    #[error("browser command failed: {0}")]
    Browser(String),

    #[error("invalid search URL: {0}")]
    SearchUrl(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<fantoccini::error::CmdError> for CollectError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        CollectError::Browser(err.to_string())
    }
}

/// Run-level extractor failures; per-file problems are counted, not raised
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("cannot read source directory {path}: {source}")]
    SourceDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a combined collect-then-extract run
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("collection failed: {0}")]
    Collect(#[from] CollectError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}
