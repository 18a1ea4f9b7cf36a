//! Capability tokens gating ability invocation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The capability an ability requires of its invoking actor.
///
/// Most store operations require [`Permission::Manage`]; a small number of
/// read-only lookups are exposed under [`Permission::Read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read-only access to store data.
    Read,
    /// Full store management access.
    #[default]
    Manage,
}

impl Permission {
    /// Stable string form of the capability token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown permission string.
#[derive(Debug, Error)]
#[error("unknown permission: {0}")]
pub struct ParsePermissionError(pub String);

impl FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "manage" => Ok(Self::Manage),
            other => Err(ParsePermissionError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_default_is_manage() {
        assert_eq!(Permission::default(), Permission::Manage);
    }

    #[test]
    fn test_permission_roundtrip() {
        for p in [Permission::Read, Permission::Manage] {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
        }
    }

    #[test]
    fn test_permission_serde() {
        assert_eq!(
            serde_json::to_string(&Permission::Read).unwrap(),
            "\"read\""
        );
        let p: Permission = serde_json::from_str("\"manage\"").unwrap();
        assert_eq!(p, Permission::Manage);
    }
}
