use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// Role of an uploaded document within a comparison request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Actual,
    Planned,
}

impl Role {
    /// Multipart field name carrying this role's file.
    pub fn field_name(self) -> &'static str {
        match self {
            Role::Actual => "actual-state",
            Role::Planned => "planned-state",
        }
    }

    /// Staging prefix; distinct per role so two uploads can never collide
    /// inside one workspace, even with identical or empty sanitized names.
    pub fn staging_prefix(self) -> &'static str {
        match self {
            Role::Actual => "actual_",
            Role::Planned => "planned_",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// User-correctable upload problems, surfaced as HTTP 400 with the message
/// text as-is. These are expected outcomes, not exceptional ones.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("You must select both an actual-state and a planned-state file to upload.")]
    MissingBoth,
    #[error("There was an error uploading the {0} document. Please try again.")]
    Upload(Role),
}

/// Comparator invocation failures. The `detail` strings may contain the full
/// command line and captured output; they reach a response only in debug mode.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("comparator exited with code {code}")]
    NonZeroExit { code: i32, detail: String },
    #[error("comparator timed out after {seconds}s")]
    TimedOut { seconds: u64, detail: String },
    #[error("comparator could not be run: {0}")]
    Io(#[from] std::io::Error),
}

impl CompareError {
    pub fn detail(&self) -> String {
        match self {
            CompareError::NonZeroExit { detail, .. } | CompareError::TimedOut { detail, .. } => {
                detail.clone()
            }
            CompareError::Io(err) => err.to_string(),
        }
    }
}

/// Generic user-facing message for anything that is not the user's fault.
pub const EXECUTION_FAILURE_MESSAGE: &str = "Comparing the documents failed unexpectedly.";

/// Terminal result of one comparison request. Exactly one is produced per
/// request; the renderer consumes it without further interpretation.
#[derive(Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Comparator ran and exited 0; one entry per reported difference.
    /// An empty list means "no differences found", not "no result".
    Success(Vec<String>),
    /// HTTP 400 with an instructive message.
    ValidationFailure { message: String },
    /// HTTP 500; `detail` is populated only when diagnostics are exposed.
    ExecutionFailure { message: String, detail: Option<String> },
}

impl RequestOutcome {
    pub fn validation(err: ValidationError) -> Self {
        RequestOutcome::ValidationFailure { message: err.to_string() }
    }

    pub fn execution(detail: String, expose_diagnostics: bool) -> Self {
        RequestOutcome::ExecutionFailure {
            message: EXECUTION_FAILURE_MESSAGE.to_string(),
            detail: expose_diagnostics.then_some(detail),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RequestOutcome::Success(_) => StatusCode::OK,
            RequestOutcome::ValidationFailure { .. } => StatusCode::BAD_REQUEST,
            RequestOutcome::ExecutionFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RequestOutcome::Success(_) => "success",
            RequestOutcome::ValidationFailure { .. } => "validation_failure",
            RequestOutcome::ExecutionFailure { .. } => "execution_failure",
        }
    }
}
