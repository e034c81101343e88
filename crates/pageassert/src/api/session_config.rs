// Session configuration for WebDriver-backed assertion sessions
//
// Values come from the builder or from the environment, so the same scenario
// suite can run against a local chromedriver or a remote grid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

/// Default WebDriver endpoint (chromedriver / geckodriver / Selenium default port).
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Window size applied before failure screenshots.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1440, 900);

/// Browser to request from the WebDriver endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserName {
    #[default]
    Chrome,
    Firefox,
}

impl std::str::FromStr for BrowserName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserName::Chrome),
            "firefox" => Ok(BrowserName::Firefox),
            other => Err(Error::Config(format!(
                "unsupported browser \"{}\" (expected chrome or firefox)",
                other
            ))),
        }
    }
}

/// Options for opening a [`crate::WebDriverPage`] and for the step runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// WebDriver endpoint URL
    pub webdriver_url: String,

    /// Browser to request
    pub browser: BrowserName,

    /// Run the browser without a visible window (default: true)
    pub headless: bool,

    /// Window size used for failure screenshots
    pub window_size: (u32, u32),

    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,

    /// Additional browser command-line arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            browser: BrowserName::default(),
            headless: true,
            window_size: DEFAULT_WINDOW_SIZE,
            screenshot_dir: PathBuf::from("."),
            args: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Creates a new SessionConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads configuration from the process environment.
    ///
    /// - `WEBDRIVER_URL`: endpoint URL
    /// - `PAGEASSERT_BROWSER`: `chrome` or `firefox`
    /// - `PAGEASSERT_HEADLESS`: `0`/`false` to show the browser window
    /// - `PAGEASSERT_SCREENSHOT_DIR`: where screenshots are written
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`SessionConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("WEBDRIVER_URL") {
            config.webdriver_url = url;
        }
        if let Some(browser) = lookup("PAGEASSERT_BROWSER") {
            config.browser = browser.parse()?;
        }
        if let Some(headless) = lookup("PAGEASSERT_HEADLESS") {
            config.headless = parse_bool("PAGEASSERT_HEADLESS", &headless)?;
        }
        if let Some(dir) = lookup("PAGEASSERT_SCREENSHOT_DIR") {
            config.screenshot_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the WebDriver endpoint URL
    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    /// Set the browser to request
    pub fn browser(mut self, browser: BrowserName) -> Self {
        self.browser = browser;
        self
    }

    /// Run headless or with a visible window
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the window size used for failure screenshots
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Set the screenshot directory
    pub fn screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set additional browser arguments
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Checks that the endpoint is an http(s) URL and the window has an area.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.webdriver_url).map_err(|e| {
            Error::Config(format!("invalid WebDriver URL \"{}\": {}", self.webdriver_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "WebDriver URL must use http or https, got \"{}\"",
                url.scheme()
            )));
        }
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Err(Error::Config("window size must be non-zero".to_string()));
        }
        Ok(())
    }

    /// W3C capabilities requested when the session is created.
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut args = self.args.clone();
        let mut caps = Map::new();

        match self.browser {
            BrowserName::Chrome => {
                if self.headless {
                    args.insert(0, "--headless=new".to_string());
                }
                caps.insert("browserName".to_string(), json!("chrome"));
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            BrowserName::Firefox => {
                if self.headless {
                    args.insert(0, "-headless".to_string());
                }
                caps.insert("browserName".to_string(), json!("firefox"));
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }

        caps
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!(
            "{} must be a boolean, got \"{}\"",
            key, other
        ))),
    }
}
