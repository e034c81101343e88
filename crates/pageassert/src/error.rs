// Error types for pageassert-rs

use crate::page::CheckState;
use thiserror::Error;

/// Result type alias for pageassert operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
///
/// Step runners use this to decide how to report a failure: a `NotFound` means
/// the page never contained what the step was looking for, an `Assertion` means
/// it did but in the wrong state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required row, element, container or frame does not exist.
    NotFound,
    /// An element was found but its observed state contradicts the expected one.
    Assertion,
    /// The caller supplied input the library cannot act on.
    InvalidInput,
    /// The browser backend failed to carry out a command.
    Driver,
    /// Local I/O or serialization failure.
    Io,
}

/// Errors that can occur when asserting against a page
#[derive(Debug, Error)]
pub enum Error {
    /// No table row contains the requested text
    #[error("No rows containing the text \"{text}\" found on the page {location}")]
    RowsNotFound { text: String, location: String },

    /// A required element could not be located
    ///
    /// `criteria` describes how the element was searched for, `scope` where.
    #[error("No element matching {criteria} found in {scope} on the page {location}")]
    ElementNotFound {
        criteria: String,
        scope: String,
        location: String,
    },

    /// No radio button matched the label filter or the id fragment
    #[error(
        "The radio button with id containing \"{id}\" and label \"{label}\" was not found on the page {location}"
    )]
    RadioNotFound {
        id: String,
        label: String,
        location: String,
    },

    /// The element expected to contain an iframe does not exist
    #[error("No element with id \"{container}\" found on the page {location}")]
    ContainerNotFound { container: String, location: String },

    /// The container exists but holds no iframe
    #[error("No iframe found in the element \"{container}\" on the page {location}")]
    IframeNotFound { container: String, location: String },

    /// Frame switching target does not exist
    #[error("No iframe with id or name \"{name}\" found on the page {location}")]
    FrameNotFound { name: String, location: String },

    /// Observed state contradicts the expected state
    #[error("{subject}: expected {expected}, found {actual} on the page {location}")]
    AssertionFailed {
        subject: String,
        expected: String,
        actual: String,
        location: String,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A scenario step ran before a page was attached to its world
    #[error("No page is attached to the scenario")]
    PageNotAttached,

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Browser backend failure (WebDriver command, session setup, script error)
    #[error("Driver error: {0}")]
    Driver(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Builds an [`Error::AssertionFailed`] for a checkbox state mismatch.
    pub(crate) fn checkbox_state(
        subject: impl Into<String>,
        expected: CheckState,
        location: impl Into<String>,
    ) -> Self {
        Error::AssertionFailed {
            subject: subject.into(),
            expected: expected.to_string(),
            actual: expected.toggled().to_string(),
            location: location.into(),
        }
    }

    /// Classifies the error. Context wrappers report the kind of their source.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RowsNotFound { .. }
            | Error::ElementNotFound { .. }
            | Error::RadioNotFound { .. }
            | Error::ContainerNotFound { .. }
            | Error::IframeNotFound { .. }
            | Error::FrameNotFound { .. } => ErrorKind::NotFound,
            Error::AssertionFailed { .. } => ErrorKind::Assertion,
            Error::InvalidArgument(_) | Error::PageNotAttached | Error::Config(_) => {
                ErrorKind::InvalidInput
            }
            Error::Driver(_) => ErrorKind::Driver,
            Error::Io(_) | Error::Json(_) => ErrorKind::Io,
            Error::Context(_, source) => source.kind(),
        }
    }

    /// Returns true for errors of kind [`ErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns true for errors of kind [`ErrorKind::Assertion`].
    pub fn is_assertion(&self) -> bool {
        self.kind() == ErrorKind::Assertion
    }
}

#[cfg(feature = "webdriver")]
impl From<fantoccini::error::CmdError> for Error {
    fn from(err: fantoccini::error::CmdError) -> Self {
        Error::Driver(err.to_string())
    }
}
