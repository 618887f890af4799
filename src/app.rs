use std::fmt;

use thiserror::Error;

/// Errors produced while turning user input or resource ids into app identities.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("resource group must not be empty")]
    EmptyResourceGroup,
    #[error("web app name must not be empty")]
    EmptyAppName,
    #[error("conflicting slot names: `{in_name}` in the app name and `{explicit}` from --slot")]
    ConflictingSlot { in_name: String, explicit: String },
    #[error("`{0}` is not a web app resource id")]
    InvalidResourceId(String),
}

/// Split a combined `app/slot` name on the first separator.
///
/// The left part is the app name, the right part (if present and not empty) is the slot.
pub fn parse_app_and_slot(name: &str) -> (String, Option<String>) {
    match name.split_once('/') {
        Some((app, slot)) if !slot.is_empty() => (app.to_string(), Some(slot.to_string())),
        Some((app, _)) => (app.to_string(), None),
        None => (name.to_string(), None),
    }
}

/// Case-insensitive name comparison, as the platform treats resource names.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A web app, or one of its deployment slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub resource_group: String,
    pub app_name: String,
    pub slot: Option<String>,
}

impl AppIdentity {
    /// Build an identity from a resource group, a name that may be `app/slot`,
    /// and an optional explicit slot.
    pub fn parse(resource_group: &str, name: &str, slot: Option<&str>) -> Result<Self, IdentityError> {
        let resource_group = resource_group.trim();
        if resource_group.is_empty() {
            return Err(IdentityError::EmptyResourceGroup);
        }

        let (app_name, slot_in_name) = parse_app_and_slot(name.trim());
        if app_name.is_empty() {
            return Err(IdentityError::EmptyAppName);
        }

        let explicit = slot.map(str::trim).filter(|s| !s.is_empty());
        let slot = match (slot_in_name, explicit) {
            (Some(in_name), Some(explicit)) => {
                if !names_match(&in_name, explicit) {
                    return Err(IdentityError::ConflictingSlot {
                        in_name,
                        explicit: explicit.to_string(),
                    });
                }
                Some(in_name)
            }
            (Some(in_name), None) => Some(in_name),
            (None, explicit) => explicit.map(|s| s.to_string()),
        };

        Ok(AppIdentity {
            resource_group: resource_group.to_string(),
            app_name,
            slot,
        })
    }

    /// The ARM path segments below `providers/Microsoft.Web`.
    pub fn site_segments(&self) -> Vec<&str> {
        let mut segments = vec!["sites", self.app_name.as_str()];
        if let Some(slot) = &self.slot {
            segments.push("slots");
            segments.push(slot);
        }
        segments
    }
}

impl fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => write!(f, "{}/{}", self.app_name, slot),
            None => write!(f, "{}", self.app_name),
        }
    }
}

/// The web app (usually a slot) that snapshot contents get written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetApp {
    pub resource_group: String,
    /// ARM form of the name: `app` or `app/slot`.
    pub name: String,
    pub location: String,
    pub id: String,
}

impl TargetApp {
    /// Derive a target from a site's resource id, e.g.
    /// `/subscriptions/{s}/resourceGroups/{rg}/providers/Microsoft.Web/sites/{app}/slots/{slot}`.
    pub fn from_resource_id(id: &str, location: &str) -> Result<Self, IdentityError> {
        let segments: Vec<&str> = id.split('/').filter(|s| !s.is_empty()).collect();

        let value_after = |key: &str| -> Option<String> {
            segments
                .iter()
                .position(|s| s.eq_ignore_ascii_case(key))
                .and_then(|i| segments.get(i + 1))
                .map(|s| s.to_string())
        };

        let invalid = || IdentityError::InvalidResourceId(id.to_string());
        let resource_group = value_after("resourceGroups").ok_or_else(invalid)?;
        let app = value_after("sites").ok_or_else(invalid)?;

        let name = match value_after("slots") {
            Some(slot) => format!("{}/{}", app, slot),
            None => app,
        };

        Ok(TargetApp {
            resource_group,
            name,
            location: location.to_string(),
            id: id.to_string(),
        })
    }

    pub fn app_name(&self) -> String {
        parse_app_and_slot(&self.name).0
    }
}

impl fmt::Display for TargetApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
