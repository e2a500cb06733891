use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::applications::model::{
    Application, ApplicationDraft, ApplicationStatus, CreateApplicationDto, PaymentStatus,
    UpdatePaymentDto, UpdateStatusDto,
};
use crate::modules::contacts::model::{
    Contact, ContactStats, ContactStatus, ContactStatusCount, CreateContactDto,
    PaginatedContactsResponse, UpdateContactDto,
};
use crate::modules::payments::model::{
    CheckoutSessionResponse, ConfirmPaymentDto, ConfirmPaymentResponse, CreateCheckoutDto,
    SaveUnpaidDto,
};
use crate::modules::reviews::model::{CreateReviewDto, Review, UpdateReviewDto};
use crate::modules::role_requests::model::{
    CreateRoleRequestDto, RequestStatus, ReviewRoleRequestDto, RoleRequest,
};
use crate::modules::scholarships::model::{
    CreateScholarshipDto, Degree, PaginatedScholarshipsResponse, Scholarship, ScholarshipCategory,
    UpdateScholarshipDto,
};
use crate::modules::users::model::{Account, Role, RoleResponse, SyncAccountDto, UpdateRoleDto};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::sync_account,
        crate::modules::users::controller::get_accounts,
        crate::modules::users::controller::get_accounts_by_role,
        crate::modules::users::controller::get_role,
        crate::modules::users::controller::get_account,
        crate::modules::users::controller::update_role,
        crate::modules::users::controller::delete_account,
        crate::modules::scholarships::controller::get_scholarships,
        crate::modules::scholarships::controller::get_top_scholarships,
        crate::modules::scholarships::controller::get_scholarship,
        crate::modules::scholarships::controller::create_scholarship,
        crate::modules::scholarships::controller::update_scholarship,
        crate::modules::scholarships::controller::delete_scholarship,
        crate::modules::applications::controller::create_application,
        crate::modules::applications::controller::get_my_applications,
        crate::modules::applications::controller::get_applications,
        crate::modules::applications::controller::get_application,
        crate::modules::applications::controller::update_application_status,
        crate::modules::applications::controller::update_application_payment,
        crate::modules::applications::controller::delete_application,
        crate::modules::reviews::controller::create_review,
        crate::modules::reviews::controller::get_reviews,
        crate::modules::reviews::controller::get_scholarship_reviews,
        crate::modules::reviews::controller::get_my_reviews,
        crate::modules::reviews::controller::update_review,
        crate::modules::reviews::controller::delete_review,
        crate::modules::role_requests::controller::create_role_request,
        crate::modules::role_requests::controller::get_my_role_requests,
        crate::modules::role_requests::controller::get_pending_role_requests,
        crate::modules::role_requests::controller::get_all_role_requests,
        crate::modules::role_requests::controller::approve_role_request,
        crate::modules::role_requests::controller::reject_role_request,
        crate::modules::payments::controller::create_checkout,
        crate::modules::payments::controller::confirm_payment,
        crate::modules::payments::controller::save_unpaid,
        crate::modules::contacts::controller::create_contact,
        crate::modules::contacts::controller::get_contacts,
        crate::modules::contacts::controller::get_contact_stats,
        crate::modules::contacts::controller::get_contact,
        crate::modules::contacts::controller::update_contact,
        crate::modules::contacts::controller::delete_contact,
    ),
    components(
        schemas(
            Account,
            Role,
            SyncAccountDto,
            UpdateRoleDto,
            RoleResponse,
            Scholarship,
            ScholarshipCategory,
            Degree,
            CreateScholarshipDto,
            UpdateScholarshipDto,
            PaginatedScholarshipsResponse,
            Application,
            ApplicationDraft,
            ApplicationStatus,
            PaymentStatus,
            CreateApplicationDto,
            UpdateStatusDto,
            UpdatePaymentDto,
            Review,
            CreateReviewDto,
            UpdateReviewDto,
            RoleRequest,
            RequestStatus,
            CreateRoleRequestDto,
            ReviewRoleRequestDto,
            CreateCheckoutDto,
            CheckoutSessionResponse,
            ConfirmPaymentDto,
            ConfirmPaymentResponse,
            SaveUnpaidDto,
            Contact,
            ContactStatus,
            ContactStatusCount,
            ContactStats,
            CreateContactDto,
            UpdateContactDto,
            PaginatedContactsResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Account registration and role management"),
        (name = "Scholarships", description = "Scholarship catalog endpoints"),
        (name = "Applications", description = "Scholarship application lifecycle"),
        (name = "Reviews", description = "Scholarship reviews"),
        (name = "Role Requests", description = "Role elevation workflow"),
        (name = "Payments", description = "Checkout and payment confirmation"),
        (name = "Contacts", description = "Contact form and admin inbox")
    ),
    info(
        title = "ScholarStream API",
        version = "0.1.0",
        description = "A REST API for scholarship discovery and applications built with Rust, Axum, and PostgreSQL.",
        contact(
            name = "API Support",
            email = "support@scholarstream.app"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
