// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Page capabilities - what a browser backend must provide
//
// The assertion helpers never talk to a browser directly. They run against
// these two traits, so the same helpers work over a remote WebDriver session
// or an in-memory fake DOM in tests.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Checked state of a checkbox or radio button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    Unchecked,
}

impl CheckState {
    /// Returns the opposite state.
    pub fn toggled(self) -> Self {
        match self {
            CheckState::Checked => CheckState::Unchecked,
            CheckState::Unchecked => CheckState::Checked,
        }
    }

    /// Returns true if `checked` satisfies this state.
    pub fn matches(self, checked: bool) -> bool {
        checked == (self == CheckState::Checked)
    }
}

impl From<bool> for CheckState {
    fn from(checked: bool) -> Self {
        if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckState::Checked => f.write_str("checked"),
            CheckState::Unchecked => f.write_str("unchecked"),
        }
    }
}

/// Semantic role of a form control, used for lookup by accessible name.
///
/// Each role maps to the CSS selector of its candidate elements; backends
/// narrow the candidates down by accessible name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessibleRole {
    Radio,
    Checkbox,
    Textbox,
    Combobox,
    Button,
    Link,
}

impl AccessibleRole {
    /// CSS selector matching every candidate element for this role.
    pub fn selector(self) -> &'static str {
        match self {
            AccessibleRole::Radio => "input[type=\"radio\"], [role=\"radio\"]",
            AccessibleRole::Checkbox => "input[type=\"checkbox\"], [role=\"checkbox\"]",
            AccessibleRole::Textbox => {
                "input[type=\"text\"], input:not([type]), textarea, [role=\"textbox\"]"
            }
            AccessibleRole::Combobox => "select, [role=\"combobox\"]",
            AccessibleRole::Button => "button, input[type=\"submit\"], [role=\"button\"]",
            AccessibleRole::Link => "a[href], [role=\"link\"]",
        }
    }
}

impl fmt::Display for AccessibleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessibleRole::Radio => "radio",
            AccessibleRole::Checkbox => "checkbox",
            AccessibleRole::Textbox => "textbox",
            AccessibleRole::Combobox => "combobox",
            AccessibleRole::Button => "button",
            AccessibleRole::Link => "link",
        };
        f.write_str(name)
    }
}

/// Returns true if an element with the given identity satisfies an
/// accessible-name filter.
///
/// An empty filter matches everything. Otherwise the filter must equal the
/// element's `id` or `name` attribute, or appear within one of its labels
/// (`aria-label`, associated `<label>` text, `title`).
pub fn accessible_name_matches(
    filter: &str,
    id: Option<&str>,
    name: Option<&str>,
    labels: &[String],
) -> bool {
    if filter.is_empty() {
        return true;
    }
    if id == Some(filter) || name == Some(filter) {
        return true;
    }
    labels.iter().any(|label| label.contains(filter))
}

/// Reference to one located DOM node.
///
/// Handles are only valid while the frame they were found in is active.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Reads an attribute; `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Rendered text of the element and its descendants.
    async fn text(&self) -> Result<String>;

    /// Checked state for checkboxes and radios; selected state for options.
    async fn is_checked(&self) -> Result<bool>;

    /// Ensures a checkbox or radio is checked. No-op if it already is.
    async fn check(&self) -> Result<()>;

    async fn click(&self) -> Result<()>;

    /// Selects `value`: for a radio button this checks the radio carrying that
    /// value, for a `<select>` it picks the matching option.
    async fn select_value(&self, value: &str) -> Result<()>;

    /// Current form value (`value` property, not the attribute).
    async fn value(&self) -> Result<Option<String>>;

    /// Descendants of this element matching a CSS selector, in document order.
    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>>;
}

/// The current browser document under test.
#[async_trait]
pub trait Page: Send + Sync {
    /// All elements in the active frame matching a CSS selector, in document order.
    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>>;

    /// Elements with the given role whose accessible name satisfies `name`
    /// (see [`accessible_name_matches`]), in document order.
    async fn find_by_role(
        &self,
        role: AccessibleRole,
        name: &str,
    ) -> Result<Vec<Box<dyn ElementHandle>>>;

    /// Runs a script in the active frame. Arguments are available to the
    /// script as `arguments[0..]`; the script's return value is returned.
    async fn execute_script(&self, code: &str, args: Vec<Value>) -> Result<Value>;

    /// Switches the active frame. `Some(name)` enters the iframe with that id
    /// or name and must fail with [`crate::Error::FrameNotFound`] if there is
    /// none; `None` returns to the top-level document.
    async fn switch_frame(&self, name: Option<&str>) -> Result<()>;

    /// URL of the top-level document.
    async fn current_url(&self) -> Result<String>;

    /// PNG screenshot of the viewport.
    async fn screenshot(&self) -> Result<Vec<u8>>;

    async fn set_window_size(&self, width: u32, height: u32) -> Result<()>;
}

#[async_trait]
impl<P: Page + ?Sized> Page for Box<P> {
    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        (**self).find_elements(selector).await
    }

    async fn find_by_role(
        &self,
        role: AccessibleRole,
        name: &str,
    ) -> Result<Vec<Box<dyn ElementHandle>>> {
        (**self).find_by_role(role, name).await
    }

    async fn execute_script(&self, code: &str, args: Vec<Value>) -> Result<Value> {
        (**self).execute_script(code, args).await
    }

    async fn switch_frame(&self, name: Option<&str>) -> Result<()> {
        (**self).switch_frame(name).await
    }

    async fn current_url(&self) -> Result<String> {
        (**self).current_url().await
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        (**self).screenshot().await
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<()> {
        (**self).set_window_size(width, height).await
    }
}
