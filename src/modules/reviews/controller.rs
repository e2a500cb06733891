use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{RequireAccount, RequireStudent};
use crate::modules::reviews::model::{
    CreateReviewDto, Review, ReviewFilterParams, UpdateReviewDto,
};
use crate::modules::reviews::service::ReviewService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Review posted", body = Review),
        (status = 400, description = "Rating outside 1..=5 or empty comment"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students only"),
        (status = 404, description = "Scholarship not found")
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student, dto))]
pub async fn create_review(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CreateReviewDto>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let review = ReviewService::create_review(state.store.as_ref(), &student, dto).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    params(ReviewFilterParams),
    responses(
        (status = 200, description = "All reviews, optionally filtered by author", body = [Review])
    ),
    tag = "Reviews"
)]
#[instrument(skip(state))]
pub async fn get_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewFilterParams>,
) -> Result<Json<Vec<Review>>, AppError> {
    let reviews =
        ReviewService::get_reviews(state.store.as_ref(), params.email.as_deref()).await?;

    Ok(Json(reviews))
}

#[utoipa::path(
    get,
    path = "/api/reviews/scholarship/{id}",
    params(("id" = Uuid, Path, description = "Scholarship ID")),
    responses(
        (status = 200, description = "Reviews for the scholarship, newest first", body = [Review])
    ),
    tag = "Reviews"
)]
#[instrument(skip(state))]
pub async fn get_scholarship_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, AppError> {
    let reviews = ReviewService::get_reviews_for_scholarship(state.store.as_ref(), id).await?;

    Ok(Json(reviews))
}

#[utoipa::path(
    get,
    path = "/api/reviews/my-reviews",
    responses(
        (status = 200, description = "Caller's reviews", body = [Review]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not registered")
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_my_reviews(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
) -> Result<Json<Vec<Review>>, AppError> {
    let reviews = ReviewService::get_reviews(state.store.as_ref(), Some(&user.email)).await?;

    Ok(Json(reviews))
}

#[utoipa::path(
    patch,
    path = "/api/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewDto,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your review"),
        (status = 404, description = "Review not found")
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn update_review(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateReviewDto>,
) -> Result<Json<Review>, AppError> {
    let review = ReviewService::update_review(state.store.as_ref(), &user, id, dto).await?;

    Ok(Json(review))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your review"),
        (status = 404, description = "Review not found")
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn delete_review(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ReviewService::delete_review(state.store.as_ref(), &user, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
