// Session - a Page plus the frame context the helpers are working in
//
// Which frame is active is global state of the browser session. It is kept
// here as an explicit field so helpers can reason about it and tests can
// observe it without a live browser.

use crate::error::Result;
use crate::page::Page;
use std::fmt;

/// Frame the session is currently pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FrameContext {
    /// The top-level document.
    #[default]
    Top,
    /// An iframe, by the id or name it was entered with.
    Named(String),
}

impl FrameContext {
    pub fn is_top(&self) -> bool {
        matches!(self, FrameContext::Top)
    }
}

impl fmt::Display for FrameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameContext::Top => f.write_str("top-level document"),
            FrameContext::Named(name) => write!(f, "iframe \"{}\"", name),
        }
    }
}

/// Placeholder used when the page URL cannot be read.
pub const UNKNOWN_LOCATION: &str = "<unknown location>";

/// Turns a URL lookup into a location for error messages.
pub(crate) fn location_or_placeholder(url: Result<String>) -> String {
    match url {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Could not read current URL: {}", e);
            UNKNOWN_LOCATION.to_string()
        }
    }
}

/// Assertion session over one [`Page`].
///
/// All helpers take the session rather than the bare page. Operations are
/// strictly sequential: each awaits its browser round-trips before returning,
/// and `&mut self` on frame switches keeps two callers from interleaving them.
///
/// # Example
///
/// ```ignore
/// use pageassert_rs::{Session, WebDriverPage, SessionConfig, CheckState, rows};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let page = WebDriverPage::connect(&SessionConfig::from_env()?).await?;
///     page.goto("http://localhost:8080/admin/config/security/policies").await?;
///
///     let mut session = Session::new(page);
///     rows::assert_checkbox_state_in_rows(
///         &session,
///         "enabled",
///         "Australian Government ISM Policy (Strong)",
///         CheckState::Checked,
///     )
///     .await?;
///     session.switch_to_top_level().await?;
///
///     session.into_page().close().await?;
///     Ok(())
/// }
/// ```
pub struct Session<P: Page> {
    page: P,
    frame: FrameContext,
}

impl<P: Page> Session<P> {
    /// Creates a session. The page is assumed to be at its top-level document.
    pub fn new(page: P) -> Self {
        Self {
            page,
            frame: FrameContext::Top,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Returns the frame the session is currently in.
    pub fn frame(&self) -> &FrameContext {
        &self.frame
    }

    /// URL of the top-level document, for error messages.
    ///
    /// Falls back to a placeholder if the backend cannot report it, so a
    /// diagnostic never masks the failure it is describing.
    pub async fn location(&self) -> String {
        location_or_placeholder(self.page.current_url().await)
    }

    /// Switches into the named iframe, or back to the top-level document
    /// when `name` is `None`.
    ///
    /// The recorded frame only changes once the backend switch succeeded.
    pub async fn switch_to_frame(&mut self, name: Option<&str>) -> Result<()> {
        self.page.switch_frame(name).await?;
        self.frame = match name {
            Some(name) => FrameContext::Named(name.to_string()),
            None => FrameContext::Top,
        };
        tracing::info!("Switched to {}", self.frame);
        Ok(())
    }

    /// Returns to the top-level document.
    pub async fn switch_to_top_level(&mut self) -> Result<()> {
        self.switch_to_frame(None).await
    }

    /// Consumes the session, returning the page.
    pub fn into_page(self) -> P {
        self.page
    }
}
