//! Role-based authorization extractors.
//!
//! [`RolePolicy`] is an explicit mapping from a route's requirement to
//! the set of roles that satisfy it; there are no ad hoc equality chains,
//! so "Admin also counts as Moderator" lives in exactly one place.
//!
//! Evaluation order is fixed and observable through HTTP statuses:
//!
//! 1. missing/invalid credential → 401 (verifier not configured → 503)
//! 2. verified identity with no account row → 404
//! 3. account role outside the policy → 403
//!
//! A passing check yields [`CurrentUser`], an immutable context value the
//! handler consumes; nothing is attached to mutable request state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::identity::VerifiedClaim;
use crate::middleware::auth::AuthUser;
use crate::modules::users::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Per-route role requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePolicy {
    /// Any registered account.
    AnyAccount,
    StudentOnly,
    ModeratorOrAdmin,
    AdminOnly,
}

impl RolePolicy {
    /// The set of roles that satisfy this policy.
    pub fn satisfying_roles(self) -> &'static [Role] {
        match self {
            RolePolicy::AnyAccount => &[Role::Student, Role::Moderator, Role::Admin],
            RolePolicy::StudentOnly => &[Role::Student],
            RolePolicy::ModeratorOrAdmin => &[Role::Moderator, Role::Admin],
            RolePolicy::AdminOnly => &[Role::Admin],
        }
    }

    pub fn is_satisfied_by(self, role: Role) -> bool {
        self.satisfying_roles().contains(&role)
    }
}

/// Verified identity plus resolved account, produced by a passing guard.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub claim: VerifiedClaim,
    pub account_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

/// Run the full guard chain for one request.
pub async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    policy: RolePolicy,
) -> Result<CurrentUser, AppError> {
    let AuthUser(claim) = AuthUser::from_request_parts(parts, state).await?;

    let account = state
        .store
        .find_account_by_email(&claim.email)
        .await?
        .ok_or_else(|| AppError::not_found("This account is not registered"))?;

    if !policy.is_satisfied_by(account.role) {
        return Err(AppError::forbidden(format!(
            "This action requires one of the roles {:?}, but your role is {}",
            policy.satisfying_roles(),
            account.role
        )));
    }

    Ok(CurrentUser {
        claim,
        account_id: account.id,
        email: account.email,
        display_name: account.display_name,
        role: account.role,
    })
}

macro_rules! require_role {
    ($name:ident, $policy:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub CurrentUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = authorize(parts, state, $policy).await?;
                Ok($name(user))
            }
        }
    };
}

require_role!(RequireAccount, RolePolicy::AnyAccount);
require_role!(RequireStudent, RolePolicy::StudentOnly);
require_role!(RequireModerator, RolePolicy::ModeratorOrAdmin);
require_role!(RequireAdmin, RolePolicy::AdminOnly);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_account_accepts_every_role() {
        for role in [Role::Student, Role::Moderator, Role::Admin] {
            assert!(RolePolicy::AnyAccount.is_satisfied_by(role));
        }
    }

    #[test]
    fn student_only_rejects_elevated_roles() {
        assert!(RolePolicy::StudentOnly.is_satisfied_by(Role::Student));
        assert!(!RolePolicy::StudentOnly.is_satisfied_by(Role::Moderator));
        assert!(!RolePolicy::StudentOnly.is_satisfied_by(Role::Admin));
    }

    #[test]
    fn admin_satisfies_moderator_policy() {
        assert!(RolePolicy::ModeratorOrAdmin.is_satisfied_by(Role::Admin));
        assert!(RolePolicy::ModeratorOrAdmin.is_satisfied_by(Role::Moderator));
        assert!(!RolePolicy::ModeratorOrAdmin.is_satisfied_by(Role::Student));
    }

    #[test]
    fn admin_only_admits_exactly_admin() {
        assert!(RolePolicy::AdminOnly.is_satisfied_by(Role::Admin));
        assert!(!RolePolicy::AdminOnly.is_satisfied_by(Role::Moderator));
        assert!(!RolePolicy::AdminOnly.is_satisfied_by(Role::Student));
    }
}
