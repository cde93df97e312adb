//! Permission bitmask and the authorization gate.
//!
//! Each bit of a [`Permissions`] mask grants one capability. `ADMIN`
//! satisfies any check. A principal may always act on resources it owns,
//! regardless of the bits it holds.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::User;

/// Path segment that addresses the authenticated principal.
pub const SELF_ALIAS: &str = "@me";

/// Permission-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The principal lacks the required permission on someone else's resource.
    #[error("missing permission {required} for resource owned by {owner}")]
    Forbidden { required: Permissions, owner: Uuid },

    /// The target path value is neither `@me` nor a UUID.
    #[error("invalid user id: {0}")]
    InvalidTarget(String),
}

/// A set of capabilities combined by bitwise OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct Permissions(i64);

impl Permissions {
    /// No capabilities.
    pub const NONE: Permissions = Permissions(0);
    /// Read another user's data.
    pub const VIEW_USER: Permissions = Permissions(1 << 0);
    /// Modify another user's data.
    pub const EDIT_USER: Permissions = Permissions(1 << 1);
    /// Delete another user's data.
    pub const DELETE_USER: Permissions = Permissions(1 << 2);
    /// Satisfies every check.
    pub const ADMIN: Permissions = Permissions(1 << 3);

    /// Build a mask from its raw integer value.
    pub const fn from_bits(bits: i64) -> Self {
        Permissions(bits)
    }

    /// Raw integer value of the mask.
    pub const fn bits(self) -> i64 {
        self.0
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Permissions) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Per-capability view of this mask.
    pub fn table(self) -> PermissionTable {
        PermissionTable::from(self)
    }
}

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Self) -> Self::Output {
        Permissions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Permissions travel as the decimal string of the mask.
impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Permissions {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Permissions)
    }
}

/// Check whether `held` satisfies `required`.
///
/// # Examples
///
/// ```
/// use college::auth::{has_permission, Permissions};
///
/// assert!(has_permission(Permissions::ADMIN, Permissions::DELETE_USER));
/// assert!(has_permission(
///     Permissions::VIEW_USER | Permissions::EDIT_USER,
///     Permissions::EDIT_USER
/// ));
/// assert!(!has_permission(Permissions::VIEW_USER, Permissions::EDIT_USER));
/// ```
pub fn has_permission(held: Permissions, required: Permissions) -> bool {
    held.contains(Permissions::ADMIN) || held.contains(required)
}

/// Boolean view of a mask, exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionTable {
    pub view_user: bool,
    pub edit_user: bool,
    pub delete_user: bool,
    pub admin: bool,
}

impl From<Permissions> for PermissionTable {
    fn from(p: Permissions) -> Self {
        Self {
            view_user: has_permission(p, Permissions::VIEW_USER),
            edit_user: has_permission(p, Permissions::EDIT_USER),
            delete_user: has_permission(p, Permissions::DELETE_USER),
            admin: p.contains(Permissions::ADMIN),
        }
    }
}

/// Decide whether `principal` may act on a resource owned by `target_owner`.
///
/// Owners always pass. Anyone else needs `required` (or `ADMIN`).
pub fn authorize(
    principal: &User,
    target_owner: Uuid,
    required: Permissions,
) -> Result<(), PermissionError> {
    if principal.id == target_owner {
        return Ok(());
    }
    if has_permission(principal.permissions, required) {
        return Ok(());
    }
    Err(PermissionError::Forbidden {
        required,
        owner: target_owner,
    })
}

/// Resolve a `{id}` path value to a user id.
///
/// `@me` names the principal itself; anything else must be a UUID.
pub fn resolve_target(principal: &User, raw: &str) -> Result<Uuid, PermissionError> {
    if raw == SELF_ALIAS {
        return Ok(principal.id);
    }
    Uuid::parse_str(raw).map_err(|_| PermissionError::InvalidTarget(raw.to_string()))
}

/// Resolve the path value and run the gate in one step.
pub fn authorize_path(
    principal: &User,
    raw: &str,
    required: Permissions,
) -> Result<Uuid, PermissionError> {
    let target = resolve_target(principal, raw)?;
    authorize(principal, target, required)?;
    Ok(target)
}
