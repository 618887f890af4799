use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::{names_match, parse_app_and_slot, AppIdentity, TargetApp};

/// The caller asked for something the platform does not allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Target app must be a slot of the source web app.")]
    TargetNotASlot,
}

/// Where snapshot contents get written when they do not overwrite the source app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreTarget {
    pub location: String,
    #[serde(rename = "id")]
    pub resource_id: String,
}

/// A request to restore a snapshot, as sent to the recover operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRestoreRequest {
    overwrite: bool,
    snapshot_time: String,
    recover_configuration: bool,
    ignore_conflicting_host_names: bool,
    #[serde(rename = "recoveryTarget", skip_serializing_if = "Option::is_none")]
    target: Option<RestoreTarget>,
}

impl SnapshotRestoreRequest {
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn snapshot_time(&self) -> &str {
        &self.snapshot_time
    }

    pub fn recover_configuration(&self) -> bool {
        self.recover_configuration
    }

    pub fn ignore_conflicting_host_names(&self) -> bool {
        self.ignore_conflicting_host_names
    }

    /// `None` means the snapshot is restored onto the source app in place.
    pub fn target(&self) -> Option<&RestoreTarget> {
        self.target.as_ref()
    }
}

/// Check that `name` in `resource_group` is the source app or one of its slots.
pub fn validate_target(source: &AppIdentity, resource_group: &str, name: &str) -> Result<(), ValidationError> {
    let (target_app, _) = parse_app_and_slot(name);
    check_same_app(source, resource_group, &target_app)
}

fn check_same_app(source: &AppIdentity, resource_group: &str, app_name: &str) -> Result<(), ValidationError> {
    if !names_match(resource_group, &source.resource_group) || !names_match(app_name, &source.app_name) {
        return Err(ValidationError::TargetNotASlot);
    }

    Ok(())
}

/// Build the restore request for `source`.
///
/// A snapshot may only be restored onto the source app itself or onto a slot of
/// the same app, never onto a different app.
pub fn build(
    source: &AppIdentity,
    snapshot_time: &str,
    recover_configuration: bool,
    target: Option<&TargetApp>,
) -> Result<SnapshotRestoreRequest, ValidationError> {
    let target = match target {
        Some(t) => {
            check_same_app(source, &t.resource_group, &t.app_name())?;
            Some(RestoreTarget {
                location: t.location.to_string(),
                resource_id: t.id.to_string(),
            })
        }
        None => None,
    };

    Ok(SnapshotRestoreRequest {
        overwrite: true,
        snapshot_time: snapshot_time.to_string(),
        recover_configuration,
        ignore_conflicting_host_names: true,
        target,
    })
}
