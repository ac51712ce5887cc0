//! Authenticated principals and role checks.
//!
//! Authentication itself (token issuance and verification) is the job of the
//! fronting identity layer; this module only models the principal it attaches
//! to each request and the role gate used by privileged operations.

use crate::error::Error;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role attached to an authenticated user.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Warehouse manager; may mutate order status and stock policy.
    Manager,
    /// Regular staff; read access plus order creation.
    Staff,
}

/// Roles permitted to mutate order status, cancel orders, and change stock
/// policy.
pub const MANAGER_ROLES: &[Role] = &[Role::Admin, Role::Manager];

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// An authenticated principal as supplied by the identity layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    /// The user's identity.
    pub id: UserId,
    /// The user's role.
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Checks that this principal holds one of the required roles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Forbidden`] when the principal's role is not in
    /// `required`.
    pub fn require(&self, required: &'static [Role]) -> Result<(), Error> {
        if required.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::Forbidden { required })
        }
    }
}
