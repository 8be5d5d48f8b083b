//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod ingredient_repo;
pub mod recipe_repo;
pub mod relation_repo;
pub mod session_repo;
pub mod shopping_list_repo;
pub mod tag_repo;
pub mod user_repo;

pub use ingredient_repo::IngredientRepo;
pub use recipe_repo::RecipeRepo;
pub use relation_repo::RelationRepo;
pub use session_repo::SessionRepo;
pub use shopping_list_repo::ShoppingListRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
