/// Outcome of a single permission check. The first four variants are
/// denials, ranked in the order the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionResult {
    Denied,
    TooManyItems,
    TooManyItemsPerTimeframe,
    BoundsDenied,
    /// The action proceeds with the candidate value clamped to the bounds.
    BoundsAdjusted,
    Allowed,
}

impl PermissionResult {
    /// Only `Allowed` and `BoundsAdjusted` let the action proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, PermissionResult::Allowed | PermissionResult::BoundsAdjusted)
    }
}
