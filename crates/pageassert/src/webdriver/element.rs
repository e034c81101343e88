// WebDriverElement - ElementHandle backed by a fantoccini Element

use crate::error::{Error, Result};
use crate::forms::css_escape;
use crate::page::ElementHandle;
use crate::session::location_or_placeholder;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, Locator};

/// A DOM element located through a WebDriver session.
///
/// Valid while the frame it was found in stays active; WebDriver reports
/// a stale element reference otherwise.
#[derive(Clone)]
pub struct WebDriverElement {
    client: Client,
    element: Element,
}

impl WebDriverElement {
    pub(crate) fn new(client: Client, element: Element) -> Self {
        Self { client, element }
    }

    pub(crate) fn boxed(client: &Client, elements: Vec<Element>) -> Vec<Box<dyn ElementHandle>> {
        elements
            .into_iter()
            .map(|element| {
                Box::new(WebDriverElement::new(client.clone(), element)) as Box<dyn ElementHandle>
            })
            .collect()
    }

    /// The underlying fantoccini element.
    pub fn inner(&self) -> &Element {
        &self.element
    }

    async fn tag_name(&self) -> Result<String> {
        Ok(self
            .element
            .prop("tagName")
            .await?
            .unwrap_or_default()
            .to_ascii_lowercase())
    }

    async fn click_if_unchecked(element: &Element) -> Result<()> {
        if !element.is_selected().await? {
            element.click().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ElementHandle for WebDriverElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.element.attr(name).await?)
    }

    async fn text(&self) -> Result<String> {
        Ok(self.element.text().await?)
    }

    async fn is_checked(&self) -> Result<bool> {
        Ok(self.element.is_selected().await?)
    }

    async fn check(&self) -> Result<()> {
        Self::click_if_unchecked(&self.element).await
    }

    async fn click(&self) -> Result<()> {
        Ok(self.element.click().await?)
    }

    async fn select_value(&self, value: &str) -> Result<()> {
        if self.tag_name().await? == "select" {
            self.element.select_by_value(value).await?;
            return Ok(());
        }

        // Radio: select within the group this radio belongs to. The value
        // property reports "on" for radios without a value attribute and is
        // absent on ARIA role="radio" elements.
        if self.element.prop("value").await?.unwrap_or_default() == value {
            return Self::click_if_unchecked(&self.element).await;
        }
        let group = self.element.attr("name").await?.unwrap_or_default();
        let selector = format!(
            "input[type=\"radio\"][name=\"{}\"][value=\"{}\"]",
            css_escape(&group),
            css_escape(value)
        );
        match self.client.find_all(Locator::Css(&selector)).await?.first() {
            Some(radio) => Self::click_if_unchecked(radio).await,
            None => Err(Error::ElementNotFound {
                criteria: format!("radio button with value \"{}\"", value),
                scope: format!("radio group \"{}\"", group),
                location: location_or_placeholder(
                    self.client
                        .current_url()
                        .await
                        .map(|url| url.to_string())
                        .map_err(Error::from),
                ),
            }),
        }
    }

    async fn value(&self) -> Result<Option<String>> {
        Ok(self.element.prop("value").await?)
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let found = self.element.find_all(Locator::Css(selector)).await?;
        Ok(Self::boxed(&self.client, found))
    }
}
