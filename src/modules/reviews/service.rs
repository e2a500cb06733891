use tracing::{info, instrument};
use uuid::Uuid;

use crate::middleware::role::{CurrentUser, RolePolicy};
use crate::modules::reviews::model::{CreateReviewDto, NewReview, Review, UpdateReviewDto};
use crate::store::Store;
use crate::utils::errors::AppError;

pub struct ReviewService;

impl ReviewService {
    #[instrument(skip(store, user, dto), fields(email = %user.email))]
    pub async fn create_review(
        store: &dyn Store,
        user: &CurrentUser,
        dto: CreateReviewDto,
    ) -> Result<Review, AppError> {
        let scholarship = store
            .find_scholarship(dto.scholarship_id)
            .await?
            .ok_or_else(|| AppError::not_found("Scholarship not found"))?;

        let new = NewReview {
            scholarship_id: scholarship.id,
            scholarship_name: scholarship.name,
            university_name: scholarship.university_name,
            author_email: user.email.clone(),
            author_name: user.display_name.clone(),
            author_photo: user.claim.picture.clone(),
            rating: dto.rating,
            comment: dto.comment,
        };

        let review = store.insert_review(new).await?;

        info!(review_id = %review.id, "Review posted");

        Ok(review)
    }

    #[instrument(skip(store))]
    pub async fn get_reviews(
        store: &dyn Store,
        author_email: Option<&str>,
    ) -> Result<Vec<Review>, AppError> {
        let reviews = match author_email {
            Some(email) => store.list_reviews_by_author(email).await?,
            None => store.list_reviews().await?,
        };

        Ok(reviews)
    }

    #[instrument(skip(store))]
    pub async fn get_reviews_for_scholarship(
        store: &dyn Store,
        scholarship_id: Uuid,
    ) -> Result<Vec<Review>, AppError> {
        Ok(store.list_reviews_for_scholarship(scholarship_id).await?)
    }

    /// Rating/comment edit, restricted to the review's author.
    #[instrument(skip(store, user, dto), fields(email = %user.email))]
    pub async fn update_review(
        store: &dyn Store,
        user: &CurrentUser,
        id: Uuid,
        dto: UpdateReviewDto,
    ) -> Result<Review, AppError> {
        let review = Self::find(store, id).await?;

        if review.author_email != user.email {
            return Err(AppError::forbidden("You can only edit your own reviews"));
        }

        Ok(store.update_review(id, dto).await?)
    }

    /// Delete by the author, or by a moderator/admin cleaning up.
    #[instrument(skip(store, user), fields(email = %user.email))]
    pub async fn delete_review(
        store: &dyn Store,
        user: &CurrentUser,
        id: Uuid,
    ) -> Result<(), AppError> {
        let review = Self::find(store, id).await?;

        let is_author = review.author_email == user.email;
        let is_staff = RolePolicy::ModeratorOrAdmin.is_satisfied_by(user.role);

        if !is_author && !is_staff {
            return Err(AppError::forbidden("You can only delete your own reviews"));
        }

        store.delete_review(id).await?;

        Ok(())
    }

    async fn find(store: &dyn Store, id: Uuid) -> Result<Review, AppError> {
        store
            .find_review(id)
            .await?
            .ok_or_else(|| AppError::not_found("Review not found"))
    }
}
