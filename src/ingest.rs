//! Validation and staging of uploaded multipart parts.

use crate::errors::{Role, ValidationError};
use crate::sanitize::sanitize_file_name;
use crate::workspace::Workspace;
use bytes::Bytes;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// What arrived for one multipart file field.
#[derive(Debug)]
pub enum PartPayload {
    /// Body received completely.
    Complete(Bytes),
    /// The transport reported an incomplete or malformed upload.
    TransportError,
}

#[derive(Debug)]
pub struct UploadPart {
    /// Client-supplied base name, untrusted.
    pub file_name: String,
    pub payload: PartPayload,
}

/// The two role slots of a comparison request, as parsed from the form.
#[derive(Debug, Default)]
pub struct UploadSet {
    pub actual: Option<UploadPart>,
    pub planned: Option<UploadPart>,
}

impl UploadSet {
    pub fn is_empty(&self) -> bool {
        self.actual.is_none() && self.planned.is_none()
    }

    pub fn insert(&mut self, role: Role, part: UploadPart) {
        match role {
            Role::Actual => self.actual = Some(part),
            Role::Planned => self.planned = Some(part),
        }
    }
}

/// One document written into the workspace. Immutable after staging; the
/// file itself is deleted only by workspace teardown.
#[derive(Debug)]
pub struct StagedUpload {
    pub original_name: String,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct StagedPair {
    pub actual: StagedUpload,
    pub planned: StagedUpload,
}

/// Validate and write both required documents into the workspace.
///
/// The caller has already ruled out the fully-empty set, so failures here are
/// always role-specific. Roles are processed actual first, matching the
/// order the messages instruct the user to fix.
pub fn stage(workspace: &Workspace, set: UploadSet) -> Result<StagedPair, ValidationError> {
    let actual = stage_role(workspace, Role::Actual, set.actual)?;
    let planned = stage_role(workspace, Role::Planned, set.planned)?;
    Ok(StagedPair { actual, planned })
}

fn stage_role(
    workspace: &Workspace,
    role: Role,
    part: Option<UploadPart>,
) -> Result<StagedUpload, ValidationError> {
    let part = part.ok_or(ValidationError::Upload(role))?;
    let PartPayload::Complete(bytes) = part.payload else {
        return Err(ValidationError::Upload(role));
    };
    let sanitized = sanitize_file_name(&part.file_name);
    let path = workspace.staging_path(role.staging_prefix(), &sanitized);
    if let Err(err) = fs::write(&path, &bytes) {
        warn!(role = %role, path = %path.display(), error = %err, "staging write failed");
        return Err(ValidationError::Upload(role));
    }
    Ok(StagedUpload { original_name: part.file_name, path })
}
