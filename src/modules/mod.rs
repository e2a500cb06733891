pub mod applications;
pub mod contacts;
pub mod payments;
pub mod reviews;
pub mod role_requests;
pub mod scholarships;
pub mod users;
