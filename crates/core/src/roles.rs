//! Well-known role name constants.
//!
//! These must match the role values supplied by the authentication
//! collaborator in the `x-user-role` header.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STUDENT: &str = "student";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_STUDENT];
