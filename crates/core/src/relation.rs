//! The relation ledger: user-to-target membership tables.
//!
//! Favorite, Cart and Follow share one shape, `(user_id, target_id)` with a
//! unique constraint on the pair. [`RelationKind`] carries everything that
//! differs between them so the add/remove procedure is written once.

use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// User marked a recipe as favorite.
    Favorite,
    /// User put a recipe into the shopping cart.
    Cart,
    /// User follows another author.
    Follow,
}

impl RelationKind {
    /// Membership table name.
    pub fn table(self) -> &'static str {
        match self {
            RelationKind::Favorite => "favorites",
            RelationKind::Cart => "carts",
            RelationKind::Follow => "follows",
        }
    }

    /// Column holding the target id in [`Self::table`].
    pub fn target_column(self) -> &'static str {
        match self {
            RelationKind::Favorite | RelationKind::Cart => "recipe_id",
            RelationKind::Follow => "author_id",
        }
    }

    /// Table the target id points into.
    pub fn target_table(self) -> &'static str {
        match self {
            RelationKind::Favorite | RelationKind::Cart => "recipes",
            RelationKind::Follow => "users",
        }
    }

    /// Entity name used in not-found errors.
    pub fn target_entity(self) -> &'static str {
        match self {
            RelationKind::Favorite | RelationKind::Cart => "Recipe",
            RelationKind::Follow => "User",
        }
    }

    /// Whether a user may be related to themselves.
    pub fn allows_self(self) -> bool {
        !matches!(self, RelationKind::Follow)
    }

    pub fn already_exists_message(self) -> &'static str {
        match self {
            RelationKind::Favorite => "Recipe is already in favorites.",
            RelationKind::Cart => "Recipe is already in the shopping cart.",
            RelationKind::Follow => "You are already subscribed to this author.",
        }
    }

    pub fn missing_message(self) -> &'static str {
        match self {
            RelationKind::Favorite => "Recipe is not in favorites.",
            RelationKind::Cart => "Recipe is not in the shopping cart.",
            RelationKind::Follow => "You are not subscribed to this author.",
        }
    }

    /// Self-relation guard, applied before any duplicate check.
    pub fn check_self(self, user_id: DbId, target_id: DbId) -> Result<(), CoreError> {
        if !self.allows_self() && user_id == target_id {
            return Err(CoreError::Validation(
                "You cannot subscribe to yourself.".into(),
            ));
        }
        Ok(())
    }

    /// Map the outcome of an insert (`true` = row created) to a result.
    pub fn check_inserted(self, inserted: bool) -> Result<(), CoreError> {
        if inserted {
            Ok(())
        } else {
            Err(CoreError::Validation(self.already_exists_message().into()))
        }
    }

    /// Map the outcome of a delete (`true` = row removed) to a result.
    pub fn check_removed(self, removed: bool) -> Result<(), CoreError> {
        if removed {
            Ok(())
        } else {
            Err(CoreError::Validation(self.missing_message().into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn follow_forbids_self() {
        assert_matches!(
            RelationKind::Follow.check_self(3, 3),
            Err(CoreError::Validation(_))
        );
        assert!(RelationKind::Follow.check_self(3, 4).is_ok());
    }

    #[test]
    fn recipe_relations_allow_own_recipes() {
        // Target ids for favorites and carts are recipe ids, so equality
        // with the user id is meaningless.
        assert!(RelationKind::Favorite.check_self(5, 5).is_ok());
        assert!(RelationKind::Cart.check_self(5, 5).is_ok());
    }

    #[test]
    fn duplicate_insert_is_a_validation_error() {
        assert!(RelationKind::Cart.check_inserted(true).is_ok());
        let err = RelationKind::Cart.check_inserted(false).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref m) if m.contains("shopping cart"));
    }

    #[test]
    fn missing_row_on_remove_is_a_validation_error() {
        assert!(RelationKind::Follow.check_removed(true).is_ok());
        assert_matches!(
            RelationKind::Follow.check_removed(false),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn tables_and_columns() {
        assert_eq!(RelationKind::Favorite.table(), "favorites");
        assert_eq!(RelationKind::Cart.target_column(), "recipe_id");
        assert_eq!(RelationKind::Follow.target_table(), "users");
    }
}
