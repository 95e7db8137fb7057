// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// jwt_auth_middleware runs first on every route here and inserts AuthUser.
pub mod list_items;
pub mod lists;
pub mod user_lists;

use axum::Extension;

use crate::middleware::AuthUser;

/// Caller id in the form the services take. Absent only if the route was
/// mounted without the auth layer, in which case the service rejects it.
pub(crate) fn caller_of(auth_user: &Option<Extension<AuthUser>>) -> Option<String> {
    auth_user.as_ref().map(|Extension(user)| user.caller())
}
