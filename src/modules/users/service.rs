use tracing::{info, instrument};
use uuid::Uuid;

use crate::identity::VerifiedClaim;
use crate::metrics::track_account_created;
use crate::modules::users::model::{Account, NewAccount, Role, SyncAccountDto};
use crate::store::Store;
use crate::utils::errors::AppError;

pub struct UserService;

impl UserService {
    /// Create or refresh the account for a verified identity.
    ///
    /// Identity fields come from the claim, never from the body; new
    /// accounts always start as Student. Returns whether a row was
    /// created so the controller can answer 201 vs 200.
    #[instrument(skip(store, claim, dto), fields(email = %claim.email))]
    pub async fn sync_account(
        store: &dyn Store,
        claim: &VerifiedClaim,
        dto: SyncAccountDto,
    ) -> Result<(Account, bool), AppError> {
        let new = NewAccount {
            email: claim.email.clone(),
            display_name: dto.name,
            photo_url: dto.photo_url.or_else(|| claim.picture.clone()),
            external_subject: claim.subject.clone(),
            role: Role::Student,
        };

        let (account, created) = store.upsert_account(new).await?;

        if created {
            info!(account_id = %account.id, "Account registered");
            track_account_created();
        }

        Ok((account, created))
    }

    #[instrument(skip(store))]
    pub async fn get_accounts(store: &dyn Store) -> Result<Vec<Account>, AppError> {
        Ok(store.list_accounts().await?)
    }

    #[instrument(skip(store))]
    pub async fn get_accounts_by_role(
        store: &dyn Store,
        role: &str,
    ) -> Result<Vec<Account>, AppError> {
        let role: Role = role.parse().map_err(AppError::bad_request)?;
        Ok(store.list_accounts_by_role(role).await?)
    }

    /// Role for an email, defaulting to Student for unknown addresses.
    ///
    /// The public role probe treats authenticated-but-unregistered
    /// visitors as students, so absence is not an error here.
    #[instrument(skip(store))]
    pub async fn get_role_for_email(store: &dyn Store, email: &str) -> Result<Role, AppError> {
        let role = store
            .find_account_by_email(email)
            .await?
            .map(|account| account.role)
            .unwrap_or(Role::Student);

        Ok(role)
    }

    #[instrument(skip(store))]
    pub async fn get_account_by_email(
        store: &dyn Store,
        email: &str,
    ) -> Result<Account, AppError> {
        store
            .find_account_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))
    }

    #[instrument(skip(store))]
    pub async fn update_role(
        store: &dyn Store,
        id: Uuid,
        role: &str,
    ) -> Result<Account, AppError> {
        let role: Role = role.parse().map_err(AppError::bad_request)?;
        let account = store.set_account_role(id, role).await?;

        info!(account_id = %id, role = %account.role, "Account role changed by admin");

        Ok(account)
    }

    #[instrument(skip(store))]
    pub async fn delete_account(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
        store.delete_account(id).await?;
        Ok(())
    }
}
