//! Repository for the `users` table and follow-based views of it.

use std::collections::HashMap;

use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, first_name, last_name, password_hash, role, created_at";

/// Public profile columns. `$1` is the viewer id (NULL for anonymous).
const PROFILE_SELECT: &str = "\
    SELECT u.email, u.id, u.username, u.first_name, u.last_name, \
           EXISTS (SELECT 1 FROM follows f \
                   WHERE f.user_id = $1::bigint AND f.author_id = u.id) AS is_subscribed \
    FROM users u";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, first_name, last_name, password_hash, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Public profiles
    // -----------------------------------------------------------------------

    /// Public profile of one user as seen by `viewer`.
    pub async fn find_profile(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("{PROFILE_SELECT} WHERE u.id = $2");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Profiles for a set of user ids, keyed by id.
    pub async fn find_profiles(
        pool: &PgPool,
        ids: &[DbId],
        viewer: Option<DbId>,
    ) -> Result<HashMap<DbId, UserProfile>, sqlx::Error> {
        let query = format!("{PROFILE_SELECT} WHERE u.id = ANY($2)");
        let rows = sqlx::query_as::<_, UserProfile>(&query)
            .bind(viewer)
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|p| (p.id, p)).collect())
    }

    /// One page of all users, oldest account first.
    pub async fn list_profiles(
        pool: &PgPool,
        viewer: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!("{PROFILE_SELECT} ORDER BY u.id LIMIT $2 OFFSET $3");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(viewer)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of users.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// One page of the authors `user_id` follows, most recent follow first.
    pub async fn list_followed(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!(
            "{PROFILE_SELECT} \
             JOIN follows fl ON fl.author_id = u.id AND fl.user_id = $1 \
             ORDER BY fl.created_at DESC, fl.id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Return the subset of `ids` that exist.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Number of authors `user_id` follows.
    pub async fn count_followed(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
