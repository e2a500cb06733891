use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::contacts::model::{
    Contact, ContactFilterParams, ContactPatch, ContactStats, ContactStatus, CreateContactDto,
    PaginatedContactsResponse, UpdateContactDto,
};
use crate::store::Store;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

pub struct ContactService;

impl ContactService {
    #[instrument(skip(store, dto))]
    pub async fn create_contact(
        store: &dyn Store,
        dto: CreateContactDto,
    ) -> Result<Contact, AppError> {
        let contact = store.insert_contact(dto).await?;

        info!(contact_id = %contact.id, "Contact message received");

        Ok(contact)
    }

    #[instrument(skip(store, params))]
    pub async fn get_contacts(
        store: &dyn Store,
        params: ContactFilterParams,
    ) -> Result<PaginatedContactsResponse, AppError> {
        let status = params
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<ContactStatus>().map_err(AppError::bad_request))
            .transpose()?;

        let limit = params.limit();
        let offset = params.offset();

        let (contacts, total) = store.list_contacts(status, limit, offset).await?;

        Ok(PaginatedContactsResponse {
            data: contacts,
            meta: PaginationMeta::new(total, limit, offset, Some(params.page.unwrap_or(1).max(1))),
        })
    }

    #[instrument(skip(store))]
    pub async fn get_contact_stats(store: &dyn Store) -> Result<ContactStats, AppError> {
        Ok(store.contact_stats().await?)
    }

    #[instrument(skip(store))]
    pub async fn get_contact(store: &dyn Store, id: Uuid) -> Result<Contact, AppError> {
        store
            .find_contact(id)
            .await?
            .ok_or_else(|| AppError::not_found("Contact message not found"))
    }

    #[instrument(skip(store, dto))]
    pub async fn update_contact(
        store: &dyn Store,
        id: Uuid,
        dto: UpdateContactDto,
    ) -> Result<Contact, AppError> {
        let status = dto
            .status
            .as_deref()
            .map(|s| s.parse::<ContactStatus>().map_err(AppError::bad_request))
            .transpose()?;

        let patch = ContactPatch {
            status,
            response: dto.response,
            responded_by: dto.responded_by,
        };

        Ok(store.update_contact(id, patch).await?)
    }

    #[instrument(skip(store))]
    pub async fn delete_contact(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
        store.delete_contact(id).await?;
        Ok(())
    }
}
