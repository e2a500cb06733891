use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::scholarships::model::{
    CreateScholarshipDto, PaginatedScholarshipsResponse, Scholarship, ScholarshipFilter,
    ScholarshipFilterParams, UpdateScholarshipDto,
};
use crate::store::Store;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

/// How many rows the "top scholarships" widget shows.
const TOP_SCHOLARSHIPS: i64 = 6;

pub struct ScholarshipService;

impl ScholarshipService {
    #[instrument(skip(store, dto))]
    pub async fn create_scholarship(
        store: &dyn Store,
        dto: CreateScholarshipDto,
        posted_by: &str,
    ) -> Result<Scholarship, AppError> {
        let scholarship = store.insert_scholarship(dto, posted_by).await?;

        info!(scholarship_id = %scholarship.id, "Scholarship posted");

        Ok(scholarship)
    }

    #[instrument(skip(store, params))]
    pub async fn get_scholarships(
        store: &dyn Store,
        params: ScholarshipFilterParams,
    ) -> Result<PaginatedScholarshipsResponse, AppError> {
        let category = params
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| c.parse().map_err(AppError::bad_request))
            .transpose()?;

        let limit = params.limit();
        let offset = params.offset();

        let filter = ScholarshipFilter {
            search: params.search.clone().filter(|s| !s.is_empty()),
            category,
            country: params.country.clone().filter(|c| !c.is_empty()),
            sort: params.sort(),
            ascending: params.ascending(),
            limit,
            offset,
        };

        let (scholarships, total) = store.list_scholarships(filter).await?;

        Ok(PaginatedScholarshipsResponse {
            data: scholarships,
            meta: PaginationMeta::new(total, limit, offset, Some(params.page.unwrap_or(1).max(1))),
        })
    }

    #[instrument(skip(store))]
    pub async fn get_top_scholarships(store: &dyn Store) -> Result<Vec<Scholarship>, AppError> {
        Ok(store.top_scholarships(TOP_SCHOLARSHIPS).await?)
    }

    #[instrument(skip(store))]
    pub async fn get_scholarship(store: &dyn Store, id: Uuid) -> Result<Scholarship, AppError> {
        store
            .find_scholarship(id)
            .await?
            .ok_or_else(|| AppError::not_found("Scholarship not found"))
    }

    #[instrument(skip(store, dto))]
    pub async fn update_scholarship(
        store: &dyn Store,
        id: Uuid,
        dto: UpdateScholarshipDto,
    ) -> Result<Scholarship, AppError> {
        Ok(store.update_scholarship(id, dto).await?)
    }

    #[instrument(skip(store))]
    pub async fn delete_scholarship(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
        store.delete_scholarship(id).await?;
        Ok(())
    }
}
