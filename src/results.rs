use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Value stored for a field that was not extracted
pub const NOT_AVAILABLE: &str = "N/A";

/// Column headers of the exported table, in order
pub const COLUMNS: [&str; 6] = [
    "Product Name",
    "Price",
    "Rating",
    "Product URL",
    "Image URL",
    "Source File",
];

/// A complete product parsed from one persisted fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Product Name")]
    pub name: String,

    #[serde(rename = "Price")]
    pub price: String,

    #[serde(rename = "Rating")]
    pub rating: String,

    #[serde(rename = "Product URL")]
    pub product_url: String,

    #[serde(rename = "Image URL")]
    pub image_url: String,

    /// File name (not path) of the fragment the record came from
    #[serde(rename = "Source File")]
    pub source_file: String,
}

impl ProductRecord {
    /// Row values in column order
    pub fn to_row(&self) -> [&str; 6] {
        [
            &self.name,
            &self.price,
            &self.rating,
            &self.product_url,
            &self.image_url,
            &self.source_file,
        ]
    }
}

/// Per-run extraction counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub missing_names: usize,
    pub missing_prices: usize,
    pub missing_ratings: usize,
    pub missing_links: usize,
    pub missing_images: usize,
    pub errors: usize,
    pub complete_records: usize,
    pub total_files: usize,
}

impl ExtractionStats {
    /// Files that parsed but lacked at least one field
    pub fn incomplete_records(&self) -> usize {
        self.total_files
            .saturating_sub(self.errors)
            .saturating_sub(self.complete_records)
    }

    /// Counter names and values, in reporting order
    pub fn entries(&self) -> [(&'static str, usize); 8] {
        [
            ("missing_names", self.missing_names),
            ("missing_prices", self.missing_prices),
            ("missing_ratings", self.missing_ratings),
            ("missing_links", self.missing_links),
            ("missing_images", self.missing_images),
            ("errors", self.errors),
            ("complete_records", self.complete_records),
            ("total_files", self.total_files),
        ]
    }

    /// Share of parsed files that produced a complete record, in percent
    pub fn completion_rate(&self) -> f64 {
        let parsed = self.total_files.saturating_sub(self.errors);
        if parsed == 0 {
            0.0
        } else {
            self.complete_records as f64 * 100.0 / parsed as f64
        }
    }
}

impl AddAssign for ExtractionStats {
    fn add_assign(&mut self, other: Self) {
        self.missing_names += other.missing_names;
        self.missing_prices += other.missing_prices;
        self.missing_ratings += other.missing_ratings;
        self.missing_links += other.missing_links;
        self.missing_images += other.missing_images;
        self.errors += other.errors;
        self.complete_records += other.complete_records;
        self.total_files += other.total_files;
    }
}

/// Output of one extractor run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    /// Complete records in directory-listing order
    pub records: Vec<ProductRecord>,
    pub stats: ExtractionStats,
}

/// Outcome of one collector run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectSummary {
    /// Fragments written to disk
    pub saved: usize,

    /// Containers dropped by the size threshold
    pub skipped: usize,

    pub pages_visited: usize,

    /// Pages that failed under the skip policy
    pub pages_failed: usize,
}
