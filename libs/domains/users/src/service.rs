use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::pagination::Page;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, RegisterRequest, Role, UpdateUser, User, UserFilter, UserResponse};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user with password hashing
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        self.validate_password(&input.password)?;

        let password_hash = self.hash_password(&input.password)?;
        let roles: Vec<Role> = input.roles.iter().filter_map(|r| r.parse().ok()).collect();

        let user = User::new(input.email, input.name, password_hash, roles);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    /// Register a new account. Registration never grants elevated roles;
    /// any role escalation goes through the admin update path.
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        self.create_user(CreateUser {
            email: input.email,
            name: input.name,
            password: input.password,
            roles: vec![],
        })
        .await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// List users with filters
    pub async fn list_users(&self, filter: UserFilter) -> UserResult<Page<UserResponse>> {
        let pagination = filter.pagination();
        let (users, total) = self.repository.list(filter).await?;
        let responses: Vec<UserResponse> = users.into_iter().map(|u| u.into()).collect();
        Ok(Page::new(responses, total, pagination))
    }

    /// Update a user
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let new_password_hash = match input.password {
            Some(ref password) => {
                self.validate_password(password)?;
                Some(self.hash_password(password)?)
            }
            None => None,
        };

        if let Some(ref new_email) = input.email {
            if new_email.to_lowercase() != user.email.to_lowercase()
                && self.repository.email_exists(new_email).await?
            {
                return Err(UserError::DuplicateEmail(new_email.clone()));
            }
        }

        user.apply_update(input, new_password_hash);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Delete a user
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }

    /// Verify user credentials (for login).
    ///
    /// Returns the full user so the caller can mint a token carrying roles.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<User> {
        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    // Email and name validation is handled by ValidatedJson<T> at the handler
    // level; the password policy cannot be expressed with field attributes.

    fn validate_password(&self, password: &str) -> UserResult<()> {
        if password.len() < 8 {
            return Err(UserError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if password.len() > 128 {
            return Err(UserError::Validation(
                "Password cannot exceed 128 characters".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(UserError::Validation(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(UserError::Validation(
                "Password must contain at least one lowercase letter".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_numeric()) {
            return Err(UserError::Validation(
                "Password must contain at least one digit".to_string(),
            ));
        }

        Ok(())
    }
}
