//! Domain rules for the Foodgram backend.
//!
//! Pure logic only: no database or HTTP types live here so the rules can be
//! unit-tested in isolation and shared by the `db` and `api` crates.

pub mod account;
pub mod error;
pub mod pagination;
pub mod recipe;
pub mod relation;
pub mod roles;
pub mod shopping_list;
pub mod tag;
pub mod types;
