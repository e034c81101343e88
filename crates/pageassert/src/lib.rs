//! pageassert: declarative browser assertions for behavior-driven UI tests
//!
//! This crate provides helpers that locate elements by the text around them,
//! verify and toggle checkbox and radio state, and work with iframes, against
//! any backend implementing the [`Page`] capability. A remote WebDriver
//! backend ([`WebDriverPage`]) is included behind the default `webdriver`
//! feature.
//!
//! Every lookup that finds nothing fails with a `NotFound` error naming what
//! was searched for and the page it was searched on; callers never check for
//! empty results themselves.
//!
//! # Examples
//!
//! ## Asserting checkboxes in table rows
//!
//! ```ignore
//! use pageassert_rs::{CheckState, Session, SessionConfig, WebDriverPage, rows};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let page = WebDriverPage::connect(&SessionConfig::from_env()?).await?;
//!     page.goto("http://localhost:8080/admin/config/people/password_policy").await?;
//!     let session = Session::new(page);
//!
//!     // Every row mentioning the policy must have its "enabled" box ticked
//!     rows::assert_checkbox_state_in_rows(
//!         &session,
//!         "enabled",
//!         "Australian Government ISM Policy (Strong)",
//!         CheckState::Checked,
//!     )
//!     .await?;
//!
//!     session.into_page().close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Filling a WYSIWYG editor
//!
//! ```ignore
//! use pageassert_rs::{Session, SessionConfig, WebDriverPage, frames};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let page = WebDriverPage::connect(&SessionConfig::from_env()?).await?;
//!     page.goto("http://localhost:8080/node/add/page").await?;
//!     let mut session = Session::new(page);
//!
//!     frames::set_iframe_id_by_container(&session, "cke_edit-body", "body-editor").await?;
//!     frames::fill_iframe_body(&mut session, "body-editor", "<b>hi</b>").await?;
//!     assert!(session.frame().is_top());
//!
//!     session.into_page().close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Running scenarios with cucumber
//!
//! ```ignore
//! use cucumber::World as _;
//! use pageassert_rs::{BrowserWorld, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     BrowserWorld::cucumber()
//!         .before(|_, _, _, world| {
//!             Box::pin(async move {
//!                 let config = SessionConfig::from_env().expect("valid configuration");
//!                 world.connect(config).await.expect("WebDriver session");
//!                 world.before_scenario().await.expect("window resized");
//!             })
//!         })
//!         .after(|_, _, _, finished, world| {
//!             Box::pin(async move {
//!                 if let Some(world) = world {
//!                     world.after_scenario(finished).await;
//!                     let _ = world.close().await;
//!                 }
//!             })
//!         })
//!         .run_and_exit("tests/features")
//!         .await;
//! }
//! ```

pub mod api;
mod error;
pub mod forms;
pub mod frames;
pub mod page;
pub mod rows;
pub mod screenshot;
pub mod session;
#[cfg(feature = "cucumber")]
pub mod steps;
#[cfg(feature = "webdriver")]
pub mod webdriver;

// Re-export error types
pub use error::{Error, ErrorKind, Result};

// Re-export page capabilities
pub use page::{AccessibleRole, CheckState, ElementHandle, Page};

// Re-export session and frame context
pub use session::{FrameContext, Session};

// Re-export row matching
pub use rows::TableRowMatch;

// Re-export the cucumber world
#[cfg(feature = "cucumber")]
pub use steps::BrowserWorld;

// Re-export screenshot hooks
pub use screenshot::FailureScreenshot;

// Re-export configuration
pub use api::{BrowserName, SessionConfig};

// Re-export the WebDriver backend
#[cfg(feature = "webdriver")]
pub use webdriver::{WebDriverElement, WebDriverPage};
