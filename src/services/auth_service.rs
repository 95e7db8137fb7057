use std::sync::Arc;

use tracing::{error, info, warn};

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::config::SecurityConfig;
use crate::models::{LoginRequest, NewUser, SignUpRequest, User, UserRole};
use crate::stores::{StoreError, UserStore};

use super::{ServiceError, ServiceResult};

/// Sign-up and login. Tokens are signed with the configured JWT secret.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    security: SecurityConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, security: SecurityConfig) -> Self {
        Self { users, security }
    }

    pub async fn sign_up(&self, request: SignUpRequest) -> ServiceResult<User> {
        let email = request.email.trim().to_lowercase();
        if request.name.trim().is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(ServiceError::BadInput(
                "name, email and password are required".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(ServiceError::BadInput("invalid email".to_string()));
        }

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict(format!("email {} already registered", email)));
        }

        let password = request.password;
        let security = self.security.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&password, &security))
                .await
                .map_err(|e| internal("password hashing task failed", e))?
                .map_err(|e| internal("password hashing failed", e))?;

        // A concurrent sign-up can still win the race past the lookup above
        let user = self
            .users
            .create(NewUser {
                name: request.name.trim().to_string(),
                email: email.clone(),
                password_hash,
                role: request.role.unwrap_or(UserRole::User),
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    ServiceError::Conflict(format!("email {} already registered", email))
                }
                other => ServiceError::Store(other),
            })?;
        info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Returns a signed token for valid credentials.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<String> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() || request.password.is_empty() {
            return Err(ServiceError::BadInput("email and password are required".to_string()));
        }

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("email not found".to_string()))?;

        let password = request.password;
        let stored = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| internal("password check task failed", e))?
            .map_err(|e| {
                error!("Stored password hash for user {} is unreadable", user.id);
                internal("password check failed", e)
            })?;

        if !matches {
            warn!("Invalid password for user {}", user.id);
            return Err(ServiceError::Unauthorized("invalid credentials".to_string()));
        }

        generate_jwt(&Claims::new(&user, &self.security), &self.security).map_err(|e| {
            error!("Token generation failed for user {}: {}", user.id, e);
            ServiceError::Internal("failed to issue token".to_string())
        })
    }
}

fn internal(context: &str, err: impl std::fmt::Display) -> ServiceError {
    error!("{}: {}", context, err);
    ServiceError::Internal(context.to_string())
}
