use tracing::{info, instrument};
use uuid::Uuid;

use crate::metrics::{
    track_role_request_approved, track_role_request_created, track_role_request_rejected,
};
use crate::middleware::role::CurrentUser;
use crate::modules::role_requests::model::{
    CreateRoleRequestDto, NewRoleRequest, ReviewRoleRequestDto, RoleRequest,
};
use crate::modules::users::model::Role;
use crate::store::Store;
use crate::utils::errors::AppError;

pub struct RoleRequestService;

impl RoleRequestService {
    /// File a request for elevation.
    ///
    /// Only students have anywhere to go; an already elevated caller gets
    /// a 409, not a 403, because the request is well-formed and
    /// authorized but conflicts with the account's current state. A
    /// second pending request collapses to a 409 in the store even under
    /// concurrent creates.
    #[instrument(skip(store, user, dto), fields(email = %user.email))]
    pub async fn create_request(
        store: &dyn Store,
        user: &CurrentUser,
        dto: CreateRoleRequestDto,
    ) -> Result<RoleRequest, AppError> {
        if user.role != Role::Student {
            return Err(AppError::conflict(format!(
                "Your account already holds the {} role",
                user.role
            )));
        }

        let requested_role: Role = dto.requested_role.parse().map_err(AppError::bad_request)?;
        if requested_role == Role::Student {
            return Err(AppError::bad_request(
                "Requested role must be Moderator or Admin",
            ));
        }

        let new = NewRoleRequest {
            account_id: user.account_id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            current_role: user.role,
            requested_role,
            justification: dto.justification,
        };

        let request = store.insert_role_request(new).await?;

        info!(request_id = %request.id, requested_role = %requested_role, "Role request filed");
        track_role_request_created();

        Ok(request)
    }

    #[instrument(skip(store))]
    pub async fn get_requests_for(
        store: &dyn Store,
        account_id: Uuid,
    ) -> Result<Vec<RoleRequest>, AppError> {
        Ok(store.list_role_requests_for(account_id).await?)
    }

    #[instrument(skip(store))]
    pub async fn get_pending_requests(store: &dyn Store) -> Result<Vec<RoleRequest>, AppError> {
        Ok(store.list_pending_role_requests().await?)
    }

    #[instrument(skip(store))]
    pub async fn get_all_requests(store: &dyn Store) -> Result<Vec<RoleRequest>, AppError> {
        Ok(store.list_role_requests().await?)
    }

    /// Approve a pending request.
    ///
    /// The request flip and the account role change commit together in
    /// the store; a request that is no longer pending is a 409.
    #[instrument(skip(store, admin, dto), fields(reviewer = %admin.email))]
    pub async fn approve_request(
        store: &dyn Store,
        admin: &CurrentUser,
        id: Uuid,
        dto: ReviewRoleRequestDto,
    ) -> Result<RoleRequest, AppError> {
        let request = store
            .find_role_request(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role request not found"))?;

        let response = dto
            .admin_response
            .unwrap_or_else(|| format!("Approved to {}", request.requested_role));

        let request = store
            .approve_role_request(id, admin.account_id, response)
            .await?;

        info!(
            request_id = %id,
            account_id = %request.account_id,
            role = %request.requested_role,
            "Role request approved"
        );
        track_role_request_approved();

        Ok(request)
    }

    /// Reject a pending request. The account role is untouched.
    #[instrument(skip(store, admin, dto), fields(reviewer = %admin.email))]
    pub async fn reject_request(
        store: &dyn Store,
        admin: &CurrentUser,
        id: Uuid,
        dto: ReviewRoleRequestDto,
    ) -> Result<RoleRequest, AppError> {
        let response = dto
            .admin_response
            .unwrap_or_else(|| "Request rejected by admin".to_string());

        let request = store
            .reject_role_request(id, admin.account_id, response)
            .await?;

        info!(request_id = %id, "Role request rejected");
        track_role_request_rejected();

        Ok(request)
    }
}
