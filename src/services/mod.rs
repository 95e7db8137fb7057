pub mod auth_service;
pub mod list_item_service;
pub mod list_service;
pub mod user_list_service;

pub use auth_service::AuthService;
pub use list_item_service::ListItemService;
pub use list_service::ListService;
pub use user_list_service::UserListService;

use thiserror::Error;

use crate::stores::StoreError;

/// Outcome taxonomy shared by all services. The HTTP layer maps each variant
/// onto a status code; see `crate::error::ApiError`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Parse a string-encoded record id. `field` names the id in the error message.
pub fn parse_id(field: &str, raw: &str) -> ServiceResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServiceError::BadInput(format!("invalid {}", field))),
    }
}

/// Resolve the requesting user. Must succeed before any store is touched.
pub fn parse_caller(raw: Option<&str>) -> ServiceResult<i64> {
    match raw.map(str::trim) {
        None | Some("") => Err(ServiceError::BadInput(
            "missing user id on request".to_string(),
        )),
        Some(raw) => parse_id("user id", raw),
    }
}
