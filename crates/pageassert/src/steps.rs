// Steps - cucumber world and step definitions over a Session
//
// BrowserWorld owns the session for one scenario. The runner attaches a page
// in its `before` hook and forwards the scenario outcome from its `after`
// hook, which is where failure screenshots are taken:
//
//   BrowserWorld::cucumber()
//       .before(|_, _, _, world| Box::pin(async move {
//           world.attach(page);
//           world.before_scenario().await.ok();
//       }))
//       .after(|_, _, _, finished, world| Box::pin(async move {
//           if let Some(world) = world {
//               world.after_scenario(finished).await;
//           }
//       }))
//       .run("tests/features")
//       .await;
//
// Quoted arguments cannot themselves contain double quotes.

use crate::api::SessionConfig;
use crate::error::{Error, Result};
use crate::page::{CheckState, Page};
use crate::screenshot::{FailureScreenshot, save_screenshot};
use crate::session::Session;
use crate::{forms, frames, rows};
use cucumber::event::ScenarioFinished;
use cucumber::{World, given, then, when};
use std::fmt;

/// Session type held by [`BrowserWorld`].
pub type WorldSession = Session<Box<dyn Page>>;

/// Per-scenario state: the session under test and the screenshot settings.
#[derive(World)]
pub struct BrowserWorld {
    session: Option<WorldSession>,
    config: SessionConfig,
    capture_failures: bool,
    #[cfg(feature = "webdriver")]
    webdriver: Option<crate::webdriver::WebDriverPage>,
}

impl Default for BrowserWorld {
    fn default() -> Self {
        Self {
            session: None,
            config: SessionConfig::default(),
            capture_failures: true,
            #[cfg(feature = "webdriver")]
            webdriver: None,
        }
    }
}

impl fmt::Debug for BrowserWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserWorld")
            .field("frame", &self.session.as_ref().map(|s| s.frame().clone()))
            .field("config", &self.config)
            .field("capture_failures", &self.capture_failures)
            .finish()
    }
}

impl BrowserWorld {
    /// Attaches the page the scenario runs against, at its top-level document.
    pub fn attach<P: Page + 'static>(&mut self, page: P) {
        self.session = Some(Session::new(Box::new(page)));
    }

    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Enables or disables the screenshot taken after a failed step.
    pub fn set_capture_failures(&mut self, enabled: bool) {
        self.capture_failures = enabled;
    }

    pub fn session(&self) -> Result<&WorldSession> {
        self.session.as_ref().ok_or(Error::PageNotAttached)
    }

    pub fn session_mut(&mut self) -> Result<&mut WorldSession> {
        self.session.as_mut().ok_or(Error::PageNotAttached)
    }

    /// Opens a WebDriver session with `config` and attaches it.
    #[cfg(feature = "webdriver")]
    pub async fn connect(&mut self, config: SessionConfig) -> Result<()> {
        let page = crate::webdriver::WebDriverPage::connect(&config).await?;
        self.webdriver = Some(page.clone());
        self.attach(page);
        self.config = config;
        Ok(())
    }

    /// Ends a WebDriver session opened with [`BrowserWorld::connect`].
    #[cfg(feature = "webdriver")]
    pub async fn close(&mut self) -> Result<()> {
        self.session = None;
        match self.webdriver.take() {
            Some(page) => page.close().await,
            None => Ok(()),
        }
    }

    /// Sizes the browser window to the configured window size.
    pub async fn before_scenario(&self) -> Result<()> {
        let (width, height) = self.config.window_size;
        self.session()?.page().set_window_size(width, height).await?;
        tracing::debug!("Window set to {}x{}", width, height);
        Ok(())
    }

    /// Captures the failure screenshot if a step of the scenario failed.
    ///
    /// Screenshot problems are logged; the scenario result is left as is.
    pub async fn after_scenario(&self, finished: &ScenarioFinished) {
        if !self.capture_failures || !matches!(finished, ScenarioFinished::StepFailed(..)) {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        match FailureScreenshot::from_config(&self.config).capture(session).await {
            Ok(path) => tracing::info!("Step failed; screenshot saved to {}", path.display()),
            Err(e) => tracing::warn!("Step failed; could not capture screenshot: {}", e),
        }
    }
}

fn check_state(phrase: &str) -> CheckState {
    if phrase == "not be" {
        CheckState::Unchecked
    } else {
        CheckState::Checked
    }
}

#[then(
    regex = r#"^the checkbox named "([^"]*)" in table row with text "([^"]*)" should (be|not be) checked$"#
)]
async fn checkbox_in_table_rows(
    world: &mut BrowserWorld,
    id_fragment: String,
    row_text: String,
    state: String,
) -> Result<()> {
    let session = world.session()?;
    rows::assert_checkbox_state_in_rows(session, &id_fragment, &row_text, check_state(&state)).await
}

#[then(regex = r#"^I should see (?:the text )?"([^"]*)" in a table row containing (?:the text )?"([^"]*)"$"#)]
async fn text_in_table_row(world: &mut BrowserWorld, text: String, row_text: String) -> Result<()> {
    rows::assert_text_in_row(world.session()?, &text, &row_text).await
}

#[given(regex = r#"^the iframe in element "([^"]*)" has id "([^"]*)"$"#)]
async fn iframe_in_element_has_id(
    world: &mut BrowserWorld,
    container_id: String,
    iframe_id: String,
) -> Result<()> {
    frames::set_iframe_id_by_container(world.session()?, &container_id, &iframe_id).await
}

#[given(regex = r#"^(?:I )?fill in "([^"]*)" in WYSIWYG editor "([^"]*)"$"#)]
async fn fill_wysiwyg_editor(world: &mut BrowserWorld, html: String, iframe_id: String) -> Result<()> {
    frames::fill_iframe_body(world.session_mut()?, &iframe_id, &html).await
}

#[given(regex = r#"^(?:I )?switch to an iframe "([^"]*)"$"#)]
async fn switch_to_iframe(world: &mut BrowserWorld, name: String) -> Result<()> {
    frames::switch_to_frame(world.session_mut()?, Some(&name)).await
}

#[then(regex = r"^(?:I )?switch back from an iframe$")]
async fn switch_back_from_iframe(world: &mut BrowserWorld) -> Result<()> {
    frames::switch_to_top_level(world.session_mut()?).await
}

#[when(regex = r#"^I select the radio button "([^"]*)" with the id containing "([^"]*)"$"#)]
async fn select_labelled_radio(world: &mut BrowserWorld, label: String, id_fragment: String) -> Result<()> {
    forms::select_radio_by_partial_id(world.session()?, &id_fragment, &label).await
}

#[when(regex = r#"^I select the radio button with the id containing "([^"]*)"$"#)]
async fn select_radio(world: &mut BrowserWorld, id_fragment: String) -> Result<()> {
    forms::select_radio_by_partial_id(world.session()?, &id_fragment, "").await
}

#[then(regex = r#"^the "([^"]*)" select list should be set to "([^"]*)"$"#)]
async fn select_list_value(world: &mut BrowserWorld, select_id: String, value: String) -> Result<()> {
    forms::assert_select_value(world.session()?, &select_id, &value).await
}

#[then(regex = r#"^the checkbox "([^"]*)" should (be|not be) checked$"#)]
async fn checkbox_field(world: &mut BrowserWorld, field: String, state: String) -> Result<()> {
    forms::assert_field_checked(world.session()?, &field, check_state(&state)).await
}

#[then(regex = r#"^the checkbox "([^"]*)" should be unchecked or absent$"#)]
async fn checkbox_field_unchecked_or_absent(world: &mut BrowserWorld, field: String) -> Result<()> {
    forms::assert_field_unchecked_or_absent(world.session()?, &field).await
}

#[when(regex = r#"^I check the checkbox with value "([^"]*)"$"#)]
async fn check_checkbox_with_value(world: &mut BrowserWorld, value: String) -> Result<()> {
    forms::check_checkbox_with_value(world.session()?, &value).await
}

#[then(regex = r#"^I should (see|not see) an element matching "([^"]*)"$"#)]
async fn element_presence(world: &mut BrowserWorld, presence: String, selector: String) -> Result<()> {
    let session = world.session()?;
    if presence == "see" {
        forms::assert_element_exists(session, &selector).await
    } else {
        forms::assert_element_not_exists(session, &selector).await
    }
}

#[when(regex = r#"^I take a screenshot named "([^"]*)"$"#)]
async fn take_named_screenshot(world: &mut BrowserWorld, name: String) -> Result<()> {
    let dir = world.config.screenshot_dir.clone();
    save_screenshot(world.session()?, &dir, &name).await?;
    Ok(())
}
