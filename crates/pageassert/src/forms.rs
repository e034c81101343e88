// Form controls - radio selection, select lists and checkbox fields
//
// Controls are addressed the way a scenario author describes them: by label,
// name or a fragment of their generated id.

use crate::error::{Error, Result};
use crate::page::{AccessibleRole, CheckState, Page};
use crate::session::Session;

/// Selects the first radio button whose `id` contains `id_fragment`.
///
/// Candidates are radio buttons whose accessible name matches `label` (an
/// empty label accepts every radio on the page). They are examined in document
/// order and the first one whose id contains the fragment is selected by its
/// `value`; later candidates are left alone, so repeated calls select the same
/// radio.
///
/// Fails with [`Error::RadioNotFound`] when no radio matches the label, or
/// none of the candidates has a matching id.
///
/// # Example
///
/// ```ignore
/// // "I select the radio button "Strong" with the id containing "policy-strong""
/// forms::select_radio_by_partial_id(&session, "policy-strong", "Strong").await?;
/// ```
pub async fn select_radio_by_partial_id<P: Page>(
    session: &Session<P>,
    id_fragment: &str,
    label: &str,
) -> Result<()> {
    let radios = session
        .page()
        .find_by_role(AccessibleRole::Radio, label)
        .await?;
    tracing::debug!(
        "{} radio button(s) match label \"{}\"",
        radios.len(),
        label
    );

    if radios.is_empty() {
        return Err(Error::RadioNotFound {
            id: id_fragment.to_string(),
            label: label.to_string(),
            location: session.location().await,
        });
    }

    for radio in &radios {
        let id = radio.attribute("id").await?.unwrap_or_default();
        if !id.contains(id_fragment) {
            continue;
        }

        // The value property, which defaults to "on" without a value attribute
        let value = radio.value().await?.unwrap_or_default();
        radio.select_value(&value).await?;
        tracing::info!("Selected radio button \"{}\" with value \"{}\"", id, value);
        return Ok(());
    }

    Err(Error::RadioNotFound {
        id: id_fragment.to_string(),
        label: label.to_string(),
        location: session.location().await,
    })
}

/// Asserts that the select list with id `select_id` is set to `expected`.
pub async fn assert_select_value<P: Page>(
    session: &Session<P>,
    select_id: &str,
    expected: &str,
) -> Result<()> {
    let selector = format!("select[id=\"{}\"]", css_escape(select_id));
    let select = session
        .page()
        .find_elements(&selector)
        .await?
        .into_iter()
        .next();

    let Some(select) = select else {
        return Err(Error::ElementNotFound {
            criteria: format!("select list with id \"{}\"", select_id),
            scope: session.frame().to_string(),
            location: session.location().await,
        });
    };

    let actual = select.value().await?.unwrap_or_default();
    if actual != expected {
        return Err(Error::AssertionFailed {
            subject: format!("Select list with id \"{}\"", select_id),
            expected: format!("value \"{}\"", expected),
            actual: format!("value \"{}\"", actual),
            location: session.location().await,
        });
    }
    Ok(())
}

/// Asserts the state of the checkbox addressed by id, name or label.
///
/// Permission grids name their checkboxes `<role id>[<permission>]`; this
/// finds them by that name directly.
pub async fn assert_field_checked<P: Page>(
    session: &Session<P>,
    field: &str,
    expected: CheckState,
) -> Result<()> {
    if field.is_empty() {
        return Err(Error::InvalidArgument(
            "checkbox field locator must not be empty".to_string(),
        ));
    }

    let checkbox = session
        .page()
        .find_by_role(AccessibleRole::Checkbox, field)
        .await?
        .into_iter()
        .next();

    let Some(checkbox) = checkbox else {
        return Err(Error::ElementNotFound {
            criteria: format!("checkbox with id|name|label \"{}\"", field),
            scope: session.frame().to_string(),
            location: session.location().await,
        });
    };

    if !expected.matches(checkbox.is_checked().await?) {
        return Err(Error::checkbox_state(
            format!("Checkbox \"{}\"", field),
            expected,
            session.location().await,
        ));
    }
    Ok(())
}

/// Asserts that the checkbox addressed by id, name or label is unchecked,
/// or not on the page at all.
///
/// This is the revoked-permission check: a permission grid omits the
/// checkbox for permissions a role cannot hold, which also counts as not
/// granted. Use [`assert_field_checked`] with [`CheckState::Unchecked`] when
/// the field must exist.
pub async fn assert_field_unchecked_or_absent<P: Page>(
    session: &Session<P>,
    field: &str,
) -> Result<()> {
    match assert_field_checked(session, field, CheckState::Unchecked).await {
        Err(Error::ElementNotFound { .. }) => {
            tracing::debug!("Checkbox \"{}\" is absent", field);
            Ok(())
        }
        other => other,
    }
}

/// Checks the first input whose `value` attribute equals `value`.
///
/// Bulk-operation lists key their row checkboxes by entity id, which is what
/// `value` usually is.
pub async fn check_checkbox_with_value<P: Page>(session: &Session<P>, value: &str) -> Result<()> {
    let selector = format!("input[value=\"{}\"]", css_escape(value));
    let checkbox = session
        .page()
        .find_elements(&selector)
        .await?
        .into_iter()
        .next();

    match checkbox {
        Some(checkbox) => {
            checkbox.check().await?;
            tracing::info!("Checked checkbox with value \"{}\"", value);
            Ok(())
        }
        None => Err(Error::ElementNotFound {
            criteria: format!("checkbox with value \"{}\"", value),
            scope: session.frame().to_string(),
            location: session.location().await,
        }),
    }
}

/// Asserts that `selector` matches at least one element in the active frame.
pub async fn assert_element_exists<P: Page>(session: &Session<P>, selector: &str) -> Result<()> {
    let found = session.page().find_elements(selector).await?;
    if found.is_empty() {
        return Err(Error::ElementNotFound {
            criteria: format!("selector \"{}\"", selector),
            scope: session.frame().to_string(),
            location: session.location().await,
        });
    }
    Ok(())
}

/// Asserts that `selector` matches nothing in the active frame.
pub async fn assert_element_not_exists<P: Page>(
    session: &Session<P>,
    selector: &str,
) -> Result<()> {
    let found = session.page().find_elements(selector).await?.len();
    if found > 0 {
        return Err(Error::AssertionFailed {
            subject: format!("Selector \"{}\"", selector),
            expected: "no matching elements".to_string(),
            actual: format!("{} element(s)", found),
            location: session.location().await,
        });
    }
    Ok(())
}

/// Escapes a value for use inside a double-quoted CSS attribute selector.
pub(crate) fn css_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\a "),
            _ => escaped.push(c),
        }
    }
    escaped
}
