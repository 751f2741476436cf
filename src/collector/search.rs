use url::Url;

use crate::config::CollectorConfig;

/// One page of search results for a keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub keyword: String,

    /// 1-based
    pub page_index: usize,
}

impl SearchPage {
    pub fn new(keyword: &str, page_index: usize) -> Self {
        Self {
            keyword: keyword.to_string(),
            page_index,
        }
    }

    /// Search results URL; spaces in the keyword are sent as `+`
    pub fn url(&self, config: &CollectorConfig) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&config.search_url)?;
        url.query_pairs_mut()
            .append_pair("k", &self.keyword)
            .append_pair("page", &self.page_index.to_string())
            .extend_pairs(config.search_params.iter());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_search_url() {
        let url = SearchPage::new("Mobile_Phones", 2)
            .url(&CollectorConfig::default())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.amazon.in/s?k=Mobile_Phones&page=2&crid=3GJ7S0QWWNCP0&qid=1765479616&sprefix=mobile%2Caps%2C508&xpid=1n4ZVr0HNNA3c&ref=sr_pg_2"
        );
    }

    #[test]
    fn test_keyword_spaces_become_plus() {
        let config = CollectorConfig {
            search_params: Vec::new(),
            ..CollectorConfig::default()
        };
        let url = SearchPage::new("red running shoes", 1).url(&config).unwrap();
        assert_eq!(url.as_str(), "https://www.amazon.in/s?k=red+running+shoes&page=1");

        let url = SearchPage::new("c++ & rust", 3).url(&config).unwrap();
        assert_eq!(url.as_str(), "https://www.amazon.in/s?k=c%2B%2B+%26+rust&page=3");
    }

    #[test]
    fn test_invalid_search_url() {
        let config = CollectorConfig {
            search_url: "amazon".to_string(),
            ..CollectorConfig::default()
        };
        assert!(SearchPage::new("x", 1).url(&config).is_err());
    }
}
