// Table rows - locate rows by the text they render and assert on their contents
//
// Rows are identified by text rather than position, so assertions do not
// depend on the order a table happens to list its content in.

use crate::error::{Error, Result};
use crate::page::{CheckState, ElementHandle, Page};
use crate::session::Session;

/// Selector for every candidate row.
const ROW_SELECTOR: &str = "table tr";

/// Selector for row descendants that can be matched by id fragment.
const ID_SELECTOR: &str = "[id]";

/// Table rows whose rendered text contains a fragment, in document order.
///
/// Never empty: [`find_rows_containing_text`] fails instead of producing an
/// empty match.
pub struct TableRowMatch {
    text: String,
    location: String,
    rows: Vec<Box<dyn ElementHandle>>,
}

impl TableRowMatch {
    /// The fragment the rows were matched with.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Page URL at the time of the match.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ElementHandle> {
        self.rows.iter().map(|row| row.as_ref())
    }

    pub fn into_rows(self) -> Vec<Box<dyn ElementHandle>> {
        self.rows
    }
}

/// Finds all table rows whose rendered text contains `text`.
///
/// Matching is a case-sensitive substring test. Rows are returned in document
/// order. Fails with [`Error::RowsNotFound`] when no row matches, and with
/// [`Error::InvalidArgument`] for an empty fragment (which would match every
/// row).
///
/// # Example
///
/// ```ignore
/// let rows = rows::find_rows_containing_text(&session, "Policy A").await?;
/// assert_eq!(rows.len(), 2);
/// ```
pub async fn find_rows_containing_text<P: Page>(
    session: &Session<P>,
    text: &str,
) -> Result<TableRowMatch> {
    if text.is_empty() {
        return Err(Error::InvalidArgument(
            "row text fragment must not be empty".to_string(),
        ));
    }

    let candidates = session.page().find_elements(ROW_SELECTOR).await?;
    let total = candidates.len();

    let mut rows = Vec::new();
    for row in candidates {
        if row.text().await?.contains(text) {
            rows.push(row);
        }
    }

    tracing::debug!(
        "{} of {} table rows contain \"{}\"",
        rows.len(),
        total,
        text
    );

    let location = session.location().await;
    if rows.is_empty() {
        return Err(Error::RowsNotFound {
            text: text.to_string(),
            location,
        });
    }

    Ok(TableRowMatch {
        text: text.to_string(),
        location,
        rows,
    })
}

/// First descendant of `row` whose `id` attribute contains `id_fragment`.
async fn find_in_row_by_id(
    row: &dyn ElementHandle,
    id_fragment: &str,
) -> Result<Option<(String, Box<dyn ElementHandle>)>> {
    for element in row.find_elements(ID_SELECTOR).await? {
        if let Some(id) = element.attribute("id").await? {
            if id.contains(id_fragment) {
                return Ok(Some((id, element)));
            }
        }
    }
    Ok(None)
}

/// Asserts the checkbox state in every row containing `row_text`.
///
/// In each matched row the first element whose `id` contains `id_fragment` is
/// inspected. The assertion is universal: a single row in the wrong state
/// fails it, no matter how many others match. Fails with
/// [`Error::ElementNotFound`] when a matched row has no such element and with
/// [`Error::AssertionFailed`] on the first row whose state differs.
pub async fn assert_checkbox_state_in_rows<P: Page>(
    session: &Session<P>,
    id_fragment: &str,
    row_text: &str,
    expected: CheckState,
) -> Result<()> {
    let rows = find_rows_containing_text(session, row_text).await?;

    for row in rows.iter() {
        let (id, checkbox) = find_in_row_by_id(row, id_fragment).await?.ok_or_else(|| {
            Error::ElementNotFound {
                criteria: format!("checkbox named \"{}\"", id_fragment),
                scope: format!("the table row with text \"{}\"", row_text),
                location: rows.location().to_string(),
            }
        })?;

        let checked = checkbox.is_checked().await?;
        tracing::debug!("Checkbox \"{}\" in row \"{}\" checked={}", id, row_text, checked);

        if !expected.matches(checked) {
            return Err(Error::checkbox_state(
                format!(
                    "Checkbox with id \"{}\" in a row containing \"{}\"",
                    id, row_text
                ),
                expected,
                rows.location(),
            ));
        }
    }

    Ok(())
}

/// Asserts that at least one row containing `row_text` also contains `text`.
///
/// Unlike the checkbox assertion this is existential: any one row suffices.
pub async fn assert_text_in_row<P: Page>(
    session: &Session<P>,
    text: &str,
    row_text: &str,
) -> Result<()> {
    let rows = find_rows_containing_text(session, row_text).await?;

    for row in rows.iter() {
        if row.text().await?.contains(text) {
            return Ok(());
        }
    }

    Err(Error::AssertionFailed {
        subject: format!("Table rows containing \"{}\"", row_text),
        expected: format!("text \"{}\"", text),
        actual: format!("{} row(s) without it", rows.len()),
        location: rows.location().to_string(),
    })
}
