//! Sequencing of ingestion and invocation into one terminal outcome.

use crate::compare::Comparator;
use crate::errors::{RequestOutcome, ValidationError};
use crate::ingest::{self, UploadSet};
use crate::workspace::Workspace;
use std::path::Path;
use tracing::debug;

/// Run the whole pipeline for one request: workspace, staging, invocation.
///
/// The workspace guard wraps the entire sequence, so staged files are gone
/// by the time this returns no matter which branch produced the outcome —
/// including panics unwinding through the comparator call. The empty-set
/// check comes first; no workspace is created when nothing was uploaded.
pub async fn assemble(
    scratch_root: &Path,
    expose_diagnostics: bool,
    comparator: &dyn Comparator,
    set: UploadSet,
) -> RequestOutcome {
    if set.is_empty() {
        return RequestOutcome::validation(ValidationError::MissingBoth);
    }

    let workspace = match Workspace::create(scratch_root) {
        Ok(ws) => ws,
        Err(err) => {
            return RequestOutcome::execution(
                format!("failed to create workspace: {err}"),
                expose_diagnostics,
            );
        }
    };
    debug!(workspace = %workspace.path().display(), "workspace created");

    let staged = match ingest::stage(&workspace, set) {
        Ok(pair) => pair,
        Err(err) => return RequestOutcome::validation(err),
    };
    debug!(
        actual = %staged.actual.original_name,
        planned = %staged.planned.original_name,
        "documents staged"
    );

    match comparator.compare(&staged.actual.path, &staged.planned.path).await {
        Ok(comparison) => RequestOutcome::Success(comparison.entries),
        Err(err) => RequestOutcome::execution(err.detail(), expose_diagnostics),
    }
}
