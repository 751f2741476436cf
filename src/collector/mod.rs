pub mod browser;
pub mod search;


use std::path::Path;
use std::time::Duration;

use crate::config::{CollectorConfig, PageErrorPolicy, RenderWait};
use crate::error::CollectError;
use crate::results::CollectSummary;
use crate::utils::fragment_file_name;

pub use browser::{BrowserLauncher, BrowserSession, WebDriverLauncher, WebDriverSession};
pub use search::SearchPage;

const FRAGMENT_EXTENSION: &str = "html";

/// Walks search result pages and persists product tile fragments
pub struct Collector<L> {
    launcher: L,
    config: CollectorConfig,
}

impl Collector<WebDriverLauncher> {
    /// Collector driving a WebDriver server
    pub fn webdriver(config: CollectorConfig) -> Self {
        Self::new(WebDriverLauncher::new(&config), config)
    }
}

impl<L: BrowserLauncher> Collector<L> {
    pub fn new(launcher: L, config: CollectorConfig) -> Self {
        Self { launcher, config }
    }

    /// Collect `page_count` pages for `keyword` into `output_dir` and return
    /// how many fragments were written
    pub async fn collect(
        &self,
        keyword: &str,
        page_count: usize,
        output_dir: impl AsRef<Path>,
    ) -> Result<usize, CollectError> {
        Ok(self.run(keyword, page_count, output_dir).await?.saved)
    }

    /// Like [`Collector::collect`], with the full per-run counters.
    ///
    /// The browser session is closed before this returns, whether the page
    /// loop finished or failed. Files written before a failure stay on disk.
    pub async fn run(
        &self,
        keyword: &str,
        page_count: usize,
        output_dir: impl AsRef<Path>,
    ) -> Result<CollectSummary, CollectError> {
        let output_dir = output_dir.as_ref();
        tokio::fs::create_dir_all(output_dir).await?;

        ::log::info!(
            "Collecting {} page(s) for '{}' into {}",
            page_count,
            keyword,
            output_dir.display()
        );

        let mut session = self.launcher.launch().await?;
        let result = self
            .visit_pages(&mut session, keyword, page_count, output_dir)
            .await;

        if let Err(e) = session.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }

        let summary = result?;
        ::log::info!("Total files saved: {}", summary.saved);
        ::log::info!("Total files skipped: {}", summary.skipped);
        if summary.pages_failed > 0 {
            ::log::warn!("Pages failed: {}", summary.pages_failed);
        }
        Ok(summary)
    }

    async fn visit_pages(
        &self,
        session: &mut L::Session,
        keyword: &str,
        page_count: usize,
        output_dir: &Path,
    ) -> Result<CollectSummary, CollectError> {
        let mut summary = CollectSummary::default();

        for page_index in 1..=page_count {
            let page = SearchPage::new(keyword, page_index);

            let fragments = match self.fetch_page(session, &page).await {
                Ok(fragments) => fragments,
                Err(e) => match self.config.on_page_error {
                    PageErrorPolicy::Abort => return Err(e),
                    PageErrorPolicy::Skip => {
                        ::log::warn!("Skipping page {}: {}", page_index, e);
                        summary.pages_failed += 1;
                        continue;
                    }
                },
            };
            summary.pages_visited += 1;
            ::log::info!("Page {} has {} products.", page_index, fragments.len());

            for fragment in fragments {
                let content = fragment.trim();
                if content.chars().count() <= self.config.min_fragment_len {
                    summary.skipped += 1;
                    continue;
                }

                let file_name = fragment_file_name(keyword, summary.saved + 1, FRAGMENT_EXTENSION);
                tokio::fs::write(output_dir.join(&file_name), content).await?;
                summary.saved += 1;
                ::log::debug!("Saved {}", file_name);
            }
        }

        Ok(summary)
    }

    /// Load one results page and return the inner markup of its containers
    async fn fetch_page(
        &self,
        session: &mut L::Session,
        page: &SearchPage,
    ) -> Result<Vec<String>, CollectError> {
        let url = page.url(&self.config)?;
        ::log::debug!("SCRAPE: {}", url);

        let fetch_error = |e: CollectError| CollectError::Fetch {
            page: page.page_index,
            url: url.to_string(),
            reason: e.to_string(),
        };

        session.goto(url.as_str()).await.map_err(fetch_error)?;

        match self.config.render_wait {
            RenderWait::Fixed { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }
            RenderWait::UntilContainers { timeout_millis } => {
                session
                    .wait_for_class(
                        &self.config.container_class,
                        Duration::from_millis(timeout_millis),
                    )
                    .await
                    .map_err(fetch_error)?;
            }
        }

        session
            .inner_html_by_class(&self.config.container_class)
            .await
            .map_err(fetch_error)
    }
}

/// Collect with the given configuration through a WebDriver server
pub async fn collect(
    keyword: &str,
    page_count: usize,
    output_dir: impl AsRef<Path>,
    config: &CollectorConfig,
) -> Result<usize, CollectError> {
    Collector::webdriver(config.clone())
        .collect(keyword, page_count, output_dir)
        .await
}
