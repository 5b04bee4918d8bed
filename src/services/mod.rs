use sea_orm::{DbErr, SqlErr};

use crate::errors::ServiceError;

pub mod gallery;
pub mod offers;
pub mod orders;
pub mod products;
pub mod profile;
pub mod settings;

pub use gallery::GalleryService;
pub use offers::OfferService;
pub use orders::OrderService;
pub use products::ProductService;
pub use profile::ProfileService;
pub use settings::SettingsService;

/// Turns a unique-constraint violation into a 409 while leaving every other
/// database failure untouched. Used where two requests can race on the same
/// natural key, e.g. first orders from the same email.
pub(crate) fn conflict_on_unique(err: DbErr, message: &str) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(message.to_string()),
        _ => ServiceError::DatabaseError(err),
    }
}
