//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts where the resource is writable

pub mod ingredient;
pub mod recipe;
pub mod session;
pub mod tag;
pub mod user;
