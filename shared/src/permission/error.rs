use thiserror::Error;

use crate::permission::permission_result::PermissionResult;

/// Why a permission check refused an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialKind {
    Denied,
    TooManyItems,
    TooManyItemsPerTimeframe,
    BoundsDenied,
}

impl DenialKind {
    /// The denial a result represents, or `None` if the action proceeds.
    pub fn from_result(result: PermissionResult) -> Option<Self> {
        match result {
            PermissionResult::Denied => Some(DenialKind::Denied),
            PermissionResult::TooManyItems => Some(DenialKind::TooManyItems),
            PermissionResult::TooManyItemsPerTimeframe => {
                Some(DenialKind::TooManyItemsPerTimeframe)
            }
            PermissionResult::BoundsDenied => Some(DenialKind::BoundsDenied),
            PermissionResult::BoundsAdjusted | PermissionResult::Allowed => None,
        }
    }
}

/// Errors that can occur while looking up or enforcing permissions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// A permission, user, group or session does not exist
    #[error("{item} '{name}' does not exist")]
    ItemNotFound { item: &'static str, name: String },

    /// A permission, user, group or session was added twice
    #[error("{item} '{name}' already exists")]
    DuplicateItem { item: &'static str, name: String },

    /// A permission check refused the action
    #[error("{name}: {reason} (at {location})")]
    PermissionDenied {
        kind: DenialKind,
        name: String,
        reason: String,
        location: String,
    },

    /// A counter was driven past its limits by the caller
    #[error("Permission '{name}' is in an invalid state: {context}")]
    InvalidState { name: String, context: String },
}

impl PermissionError {
    pub fn not_found(item: &'static str, name: impl Into<String>) -> Self {
        PermissionError::ItemNotFound {
            item,
            name: name.into(),
        }
    }

    pub fn duplicate(item: &'static str, name: impl Into<String>) -> Self {
        PermissionError::DuplicateItem {
            item,
            name: name.into(),
        }
    }

    /// The denial kind, if this error is a `PermissionDenied`.
    pub fn denial_kind(&self) -> Option<DenialKind> {
        match self {
            PermissionError::PermissionDenied { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
