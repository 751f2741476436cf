use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;

use crate::config::CollectorConfig;
use crate::error::CollectError;

/// An open browser session that renders pages
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to `url`
    async fn goto(&mut self, url: &str) -> Result<(), CollectError>;

    /// Block until an element with `class_name` exists, or `timeout` elapses
    async fn wait_for_class(
        &mut self,
        class_name: &str,
        timeout: Duration,
    ) -> Result<(), CollectError>;

    /// Inner markup of every element carrying `class_name`, in document order
    async fn inner_html_by_class(&mut self, class_name: &str) -> Result<Vec<String>, CollectError>;

    /// End the session. Called exactly once, on every exit path of a run.
    async fn close(&mut self) -> Result<(), CollectError>;
}

/// Creates browser sessions
#[async_trait]
pub trait BrowserLauncher: Sync {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session, CollectError>;
}

/// Launches sessions on a WebDriver server (ChromeDriver, geckodriver, ...)
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverLauncher {
    pub fn new(config: &CollectorConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
        }
    }

    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new"] }),
            );
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }
        caps
    }

    async fn connect(&self, url: &str) -> Result<Client, fantoccini::error::NewSessionError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        builder.connect(url).await
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    type Session = WebDriverSession;

    async fn launch(&self) -> Result<WebDriverSession, CollectError> {
        match self.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(WebDriverSession::new(client));
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
            }
        }

        // If we couldn't connect, try the usual local driver ports
        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // geckodriver / Selenium default
            "http://127.0.0.1:4444",
        ];

        for url in fallback_urls.iter() {
            if *url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = self.connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(WebDriverSession::new(client));
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(CollectError::Connect(self.webdriver_url.clone()))
    }
}

/// Session backed by a fantoccini client
pub struct WebDriverSession {
    client: Option<Client>,
}

impl WebDriverSession {
    fn new(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    fn client(&self) -> Result<&Client, CollectError> {
        self.client
            .as_ref()
            .ok_or_else(|| CollectError::Browser("session already closed".to_string()))
    }
}

fn class_selector(class_name: &str) -> String {
    format!(".{}", class_name)
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<(), CollectError> {
        self.client()?.goto(url).await?;
        Ok(())
    }

    async fn wait_for_class(
        &mut self,
        class_name: &str,
        timeout: Duration,
    ) -> Result<(), CollectError> {
        let css = class_selector(class_name);
        self.client()?
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(&css))
            .await?;
        Ok(())
    }

    async fn inner_html_by_class(&mut self, class_name: &str) -> Result<Vec<String>, CollectError> {
        let css = class_selector(class_name);
        let client = self.client()?;
        let elements = client.find_all(Locator::Css(&css)).await?;

        let mut fragments = Vec::with_capacity(elements.len());
        for element in elements {
            fragments.push(element.html(true).await?);
        }
        Ok(fragments)
    }

    async fn close(&mut self) -> Result<(), CollectError> {
        if let Some(client) = self.client.take() {
            client.close().await?;
            ::log::debug!("WebDriver session closed");
        }
        Ok(())
    }
}
