use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ExtractorConfig;

/// Configuration for selecting which fragment files the extractor reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFilterConfig {
    /// Required file extension, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Only accept `{keyword}_<n>.{extension}` files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,

    /// Regex patterns for file names to include (if empty, all names are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for file names to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_extension() -> String {
    "html".to_string()
}

impl Default for FileFilterConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            keyword: None,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl From<&ExtractorConfig> for FileFilterConfig {
    fn from(config: &ExtractorConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            keyword: None,
            include_patterns: config.include_patterns.clone(),
            exclude_patterns: config.exclude_patterns.clone(),
        }
    }
}

/// File name filter built from extension, keyword and regex rules
#[derive(Debug)]
pub struct FileFilter {
    suffix: String,
    keyword_regex: Option<Regex>,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(FileFilterConfig::default()).expect("Default filter has no patterns")
    }
}

impl FileFilter {
    /// Create a new file filter from configuration
    pub fn new(config: FileFilterConfig) -> Result<Self, regex::Error> {
        let keyword_regex = match &config.keyword {
            Some(keyword) => Some(Regex::new(&format!(
                r"^{}_\d+\.{}$",
                regex::escape(&keyword.replace(['/', '\\'], "_")),
                regex::escape(&config.extension)
            ))?),
            None => None,
        };

        let mut include_regexes = Vec::with_capacity(config.include_patterns.len());
        for pattern in &config.include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            suffix: format!(".{}", config.extension),
            keyword_regex,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a file should be extracted based on all filtering rules
    pub fn accepts(&self, file_name: &str) -> bool {
        if !file_name.ends_with(&self.suffix) {
            return false;
        }

        if let Some(regex) = &self.keyword_regex {
            if !regex.is_match(file_name) {
                return false;
            }
        }

        if self.exclude_regexes.iter().any(|r| r.is_match(file_name)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|r| r.is_match(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = FileFilter::default();

        assert!(filter.accepts("Mobile_Phones_1.html"));
        assert!(filter.accepts("anything.html"));
        assert!(!filter.accepts("notes.txt"));
        assert!(!filter.accepts("page.html.bak"));
        assert!(!filter.accepts("html"));
    }

    #[test]
    fn test_keyword_restriction() {
        let config = FileFilterConfig {
            keyword: Some("red shoes".to_string()),
            ..FileFilterConfig::default()
        };
        let filter = FileFilter::new(config).unwrap();

        assert!(filter.accepts("red shoes_1.html"));
        assert!(filter.accepts("red shoes_42.html"));
        assert!(!filter.accepts("red shoes_x.html"));
        assert!(!filter.accepts("blue shoes_1.html"));
        assert!(!filter.accepts("red shoes_1.htm"));
    }

    #[test]
    fn test_keyword_with_regex_metacharacters() {
        let config = FileFilterConfig {
            keyword: Some("c++ (books)".to_string()),
            ..FileFilterConfig::default()
        };
        let filter = FileFilter::new(config).unwrap();

        assert!(filter.accepts("c++ (books)_3.html"));
        assert!(!filter.accepts("cc (books)_3.html"));
    }

    #[test]
    fn test_regex_patterns() {
        let config = FileFilterConfig {
            include_patterns: vec![r"^phone_".to_string()],
            exclude_patterns: vec![r"_1\.html$".to_string()],
            ..FileFilterConfig::default()
        };
        let filter = FileFilter::new(config).unwrap();

        assert!(filter.accepts("phone_2.html"));
        assert!(!filter.accepts("laptop_2.html"));
        // Exclude wins over include
        assert!(!filter.accepts("phone_1.html"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = FileFilterConfig {
            include_patterns: vec!["[".to_string()],
            ..FileFilterConfig::default()
        };
        assert!(FileFilter::new(config).is_err());
    }
}
