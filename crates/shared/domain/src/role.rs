//! Restaurant membership roles.
//!
//! Every authenticated request is authorized against the `member` join table;
//! roles form a strict privilege order so checks are simple comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb_types::SurrealValue;

/// Role of a user within one restaurant. Order matters: later variants carry
/// every privilege of earlier ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, SurrealValue,
)]
#[serde(rename_all = "lowercase")]
#[surreal(crate = "surrealdb_types", rename_all = "lowercase")]
pub enum Role {
    Staff,
    Manager,
    Owner,
}

impl Role {
    /// Whether this role carries at least the privileges of `required`.
    #[must_use]
    pub fn grants(self, required: Self) -> bool {
        self >= required
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Manager => "manager",
            Self::Owner => "owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privilege_order() {
        assert!(Role::Owner.grants(Role::Manager));
        assert!(Role::Manager.grants(Role::Staff));
        assert!(!Role::Staff.grants(Role::Manager));
        assert!(Role::Staff.grants(Role::Staff));
    }

    #[test]
    fn wire_casing() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"owner\"");
        let r: Role = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(r, Role::Manager);
    }
}
