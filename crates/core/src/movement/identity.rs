//! Display names for person and commerce profiles.

use super::types::Identity;

impl Identity {
    /// Name shown in reports: `fullName`, else `name`, else empty.
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty(self.full_name.as_deref())
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// Display name of an optional profile. A missing profile has no name.
#[must_use]
pub fn display_name(identity: Option<&Identity>) -> String {
    identity.map(Identity::display_name).unwrap_or_default().to_string()
}

/// Ledger strings are often present but blank; those count as missing.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
