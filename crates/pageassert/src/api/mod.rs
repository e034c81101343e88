// Public API types module
//
// Configuration types shared by the WebDriver backend and the step runner.
// These types provide builder patterns and environment loading.

pub mod session_config;

pub use session_config::{BrowserName, SessionConfig};
