// WebDriverPage - Page capability over a remote WebDriver session

use crate::api::SessionConfig;
use crate::error::{Error, Result};
use crate::forms::css_escape;
use crate::page::{AccessibleRole, ElementHandle, Page, accessible_name_matches};
use crate::session::location_or_placeholder;
use crate::webdriver::element::WebDriverElement;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::Value;

/// A browser session on a remote WebDriver endpoint.
///
/// The caller owns the session: open it with [`WebDriverPage::connect`] and
/// end it with [`WebDriverPage::close`]. No retries or timeouts are layered
/// on top of the endpoint's own.
///
/// # Example
///
/// ```ignore
/// use pageassert_rs::{SessionConfig, WebDriverPage};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = SessionConfig::new().webdriver_url("http://localhost:9515");
///     let page = WebDriverPage::connect(&config).await?;
///     page.goto("http://localhost:8080/user/login").await?;
///     page.close().await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    /// Opens a new WebDriver session with the configured capabilities.
    pub async fn connect(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            "Opening {:?} session on {}",
            config.browser,
            config.webdriver_url
        );

        let client = ClientBuilder::native()
            .capabilities(config.capabilities())
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| {
                Error::Driver(format!(
                    "Failed to open WebDriver session on {}: {}",
                    config.webdriver_url, e
                ))
            })?;

        Ok(Self { client })
    }

    /// Wraps an already established fantoccini client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Navigates the top-level document to `url`.
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        Ok(self.client.goto(url).await?)
    }

    /// Ends the WebDriver session.
    pub async fn close(self) -> Result<()> {
        Ok(self.client.close().await?)
    }

    /// Labels naming `element`: `aria-label`, `title` and the text of every
    /// `<label for=…>` pointing at its id.
    async fn labels_of(&self, element: &Element, id: Option<&str>) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for attribute in ["aria-label", "title"] {
            if let Some(label) = element.attr(attribute).await? {
                labels.push(label);
            }
        }
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            let selector = format!("label[for=\"{}\"]", css_escape(id));
            for label in self.client.find_all(Locator::Css(&selector)).await? {
                labels.push(label.text().await?);
            }
        }
        Ok(labels)
    }
}

#[async_trait]
impl Page for WebDriverPage {
    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let found = self.client.find_all(Locator::Css(selector)).await?;
        tracing::debug!("Selector \"{}\" matched {} element(s)", selector, found.len());
        Ok(WebDriverElement::boxed(&self.client, found))
    }

    async fn find_by_role(
        &self,
        role: AccessibleRole,
        name: &str,
    ) -> Result<Vec<Box<dyn ElementHandle>>> {
        let candidates = self.client.find_all(Locator::Css(role.selector())).await?;

        let mut matched = Vec::new();
        for element in candidates {
            if !name.is_empty() {
                let id = element.attr("id").await?;
                let element_name = element.attr("name").await?;
                let labels = self.labels_of(&element, id.as_deref()).await?;
                if !accessible_name_matches(name, id.as_deref(), element_name.as_deref(), &labels)
                {
                    continue;
                }
            }
            matched.push(element);
        }

        tracing::debug!("{} {} element(s) named \"{}\"", matched.len(), role, name);
        Ok(WebDriverElement::boxed(&self.client, matched))
    }

    async fn execute_script(&self, code: &str, args: Vec<Value>) -> Result<Value> {
        Ok(self.client.execute(code, args).await?)
    }

    async fn switch_frame(&self, name: Option<&str>) -> Result<()> {
        let Some(name) = name else {
            return Ok(self.client.enter_frame(None).await?);
        };

        let escaped = css_escape(name);
        let selector = format!(
            "iframe[id=\"{0}\"], iframe[name=\"{0}\"], frame[id=\"{0}\"], frame[name=\"{0}\"]",
            escaped
        );
        let frame = self.client.find_all(Locator::Css(&selector)).await?.into_iter().next();

        match frame {
            Some(frame) => Ok(frame.enter_frame().await?),
            None => Err(Error::FrameNotFound {
                name: name.to_string(),
                location: location_or_placeholder(self.current_url().await),
            }),
        }
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(self.client.screenshot().await?)
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<()> {
        Ok(self.client.set_window_size(width, height).await?)
    }
}
