//! Database repository for durable bearer tokens.
//!
//! A user gets exactly one token, issued together with the user row and
//! stable from then on. [`Tokens::get_or_create`] is the idempotent
//! retrieval path used at login; its insert is `ON CONFLICT DO NOTHING`
//! against the per-user uniqueness constraint, so even a racing pair of
//! first logins for a legacy row leaves a single surviving secret.

use crate::types::{abbrev_uuid, UserId};
use crate::{
    api::models::users::CurrentUser,
    crypto::generate_token_secret,
    db::errors::Result,
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Tokens<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Tokens<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Return the user's token secret, issuing one if this is their first
    /// login. The returned secret is stable across calls.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn get_or_create(&mut self, user_id: UserId) -> Result<String> {
        sqlx::query("INSERT INTO auth_tokens (user_id, secret) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .bind(generate_token_secret())
            .execute(&mut *self.db)
            .await?;

        let secret = sqlx::query_scalar::<_, String>("SELECT secret FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(secret)
    }

    /// Resolve a presented bearer secret to its user, if any.
    #[instrument(skip_all, err)]
    pub async fn find_user_by_secret(&mut self, secret: &str) -> Result<Option<CurrentUser>> {
        let user = sqlx::query_as::<_, CurrentUser>(
            r#"
            SELECT u.id, u.username, u.first_name, u.last_name, u.email, u.role
            FROM auth_tokens t
            INNER JOIN users u ON t.user_id = u.id
            WHERE t.secret = $1
            "#,
        )
        .bind(secret)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user)
    }
}
