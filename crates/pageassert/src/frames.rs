// Frames - iframe identification, WYSIWYG body filling and frame switching
//
// Rich-text editors render into iframes that often carry no id. These helpers
// give such an iframe an id, write into its body, and move the session in and
// out of it.

use crate::error::{Error, Result};
use crate::page::Page;
use crate::session::Session;
use serde_json::{Value, json};

/// Assigns `arguments[1]` as the id of the first iframe inside the element
/// with id `arguments[0]`.
///
/// Returns one of [`SCRIPT_OK`], [`SCRIPT_MISSING_CONTAINER`] or
/// [`SCRIPT_MISSING_IFRAME`].
pub const ASSIGN_IFRAME_ID_SCRIPT: &str = r#"
var container = document.getElementById(arguments[0]);
if (!container) { return "missing-container"; }
var iframes = container.getElementsByTagName("iframe");
if (iframes.length === 0) { return "missing-iframe"; }
iframes[0].id = arguments[1];
return "ok";
"#;

/// Replaces the active document's body with a paragraph wrapping
/// `arguments[0]` verbatim.
pub const REPLACE_BODY_SCRIPT: &str = r#"
document.body.innerHTML = "<p>" + arguments[0] + "</p>";
return null;
"#;

pub const SCRIPT_OK: &str = "ok";
pub const SCRIPT_MISSING_CONTAINER: &str = "missing-container";
pub const SCRIPT_MISSING_IFRAME: &str = "missing-iframe";

/// Gives the first iframe inside `container_id` the id `new_iframe_id`.
///
/// Runs as a single in-page script. Calling it again with the same arguments
/// leaves the same iframe with the same id.
///
/// Fails with [`Error::ContainerNotFound`] when there is no element with
/// `container_id`, and with [`Error::IframeNotFound`] when the element has no
/// iframe descendants.
///
/// # Example
///
/// ```ignore
/// frames::set_iframe_id_by_container(&session, "cke_edit-body", "body-editor").await?;
/// frames::fill_iframe_body(&mut session, "body-editor", "<b>hi</b>").await?;
/// ```
pub async fn set_iframe_id_by_container<P: Page>(
    session: &Session<P>,
    container_id: &str,
    new_iframe_id: &str,
) -> Result<()> {
    let outcome = session
        .page()
        .execute_script(
            ASSIGN_IFRAME_ID_SCRIPT,
            vec![json!(container_id), json!(new_iframe_id)],
        )
        .await?;

    match outcome.as_str() {
        Some(SCRIPT_OK) => {
            tracing::info!(
                "Assigned id \"{}\" to the iframe in element \"{}\"",
                new_iframe_id,
                container_id
            );
            Ok(())
        }
        Some(SCRIPT_MISSING_CONTAINER) => Err(Error::ContainerNotFound {
            container: container_id.to_string(),
            location: session.location().await,
        }),
        Some(SCRIPT_MISSING_IFRAME) => Err(Error::IframeNotFound {
            container: container_id.to_string(),
            location: session.location().await,
        }),
        _ => Err(Error::Driver(format!(
            "Unexpected result from iframe id script: {}",
            outcome
        ))),
    }
}

/// Replaces the body of iframe `iframe_id` with `<p>{html}</p>`.
///
/// `html` is inserted as-is, without escaping. Existing content is discarded.
/// The session is returned to the top-level document afterwards, also when
/// writing the body fails. Fails with [`Error::FrameNotFound`] when the frame
/// does not exist.
pub async fn fill_iframe_body<P: Page>(
    session: &mut Session<P>,
    iframe_id: &str,
    html: &str,
) -> Result<()> {
    session.switch_to_frame(Some(iframe_id)).await?;

    let written = session
        .page()
        .execute_script(REPLACE_BODY_SCRIPT, vec![Value::String(html.to_string())])
        .await;
    let restored = session.switch_to_top_level().await;

    written.map_err(|e| e.context(format!("Failed to fill iframe \"{}\"", iframe_id)))?;
    restored?;
    tracing::debug!("Filled body of iframe \"{}\"", iframe_id);
    Ok(())
}

/// Switches into the iframe `name`, or back to the top-level document for `None`.
pub async fn switch_to_frame<P: Page>(session: &mut Session<P>, name: Option<&str>) -> Result<()> {
    session.switch_to_frame(name).await
}

/// Switches back to the top-level document.
pub async fn switch_to_top_level<P: Page>(session: &mut Session<P>) -> Result<()> {
    session.switch_to_top_level().await
}
