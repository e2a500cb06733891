//! Administrative CLI commands.
//!
//! The API never elevates an account to `Admin` on its own, so the first
//! admin is bootstrapped here, directly against the database.

use sqlx::PgPool;

use crate::modules::users::model::Role;

pub mod seeder;

/// Create an admin account, or promote the existing account for the email.
///
/// `subject` is the identity-provider subject id the account will be tied
/// to. When the account does not exist yet a placeholder subject keyed on
/// the email is stored; the first create-or-update call with a verified
/// token refreshes the display fields.
pub async fn bootstrap_admin(
    db: &PgPool,
    email: &str,
    name: &str,
    subject: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let promoted = sqlx::query_scalar::<_, uuid::Uuid>(
        r#"
        UPDATE accounts
        SET role = $2, updated_at = NOW()
        WHERE email = LOWER($1)
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(Role::Admin)
    .fetch_optional(db)
    .await?;

    if promoted.is_some() {
        return Ok(false);
    }

    let subject = subject
        .map(str::to_string)
        .unwrap_or_else(|| format!("cli:{}", email.to_lowercase()));

    sqlx::query(
        r#"
        INSERT INTO accounts (email, display_name, photo_url, external_subject, role)
        VALUES (LOWER($1), $2, NULL, $3, $4)
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(&subject)
    .bind(Role::Admin)
    .execute(db)
    .await?;

    Ok(true)
}
