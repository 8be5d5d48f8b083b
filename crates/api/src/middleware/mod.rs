//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user from a `Token` / `Bearer` header.
//! - [`auth::MaybeAuthUser`] -- the viewer on public endpoints, `None` when anonymous.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.

pub mod auth;
pub mod rbac;
