//! Shopping list aggregation over a user's cart.

use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::ingredient::ShoppingListRow;

pub struct ShoppingListRepo;

impl ShoppingListRepo {
    /// Sum ingredient amounts across every recipe in the user's cart.
    ///
    /// Lines are grouped by `(name, measurement_unit)`, so the same
    /// ingredient name in two units yields two lines. Ordered by name
    /// then unit.
    pub async fn aggregate(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ShoppingListRow>, sqlx::Error> {
        sqlx::query_as::<_, ShoppingListRow>(
            "SELECT i.name, i.measurement_unit, SUM(ri.amount)::bigint AS total \
             FROM carts c \
             JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id \
             JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE c.user_id = $1 \
             GROUP BY i.name, i.measurement_unit \
             ORDER BY i.name, i.measurement_unit",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
