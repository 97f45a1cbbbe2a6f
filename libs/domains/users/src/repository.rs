use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserFilter};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by email
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// List users with optional filters; returns the page slice and total
    async fn list(&self, filter: UserFilter) -> UserResult<(Vec<User>, u64)>;

    /// Update an existing user
    async fn update(&self, user: User) -> UserResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Check if an email already exists
    async fn email_exists(&self, email: &str) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        let email_exists = users
            .values()
            .any(|u| u.email.to_lowercase() == user.email.to_lowercase());

        if email_exists {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.email.to_lowercase() == email.to_lowercase())
            .cloned();
        Ok(user)
    }

    async fn list(&self, filter: UserFilter) -> UserResult<(Vec<User>, u64)> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();

        let total = result.len() as u64;

        result.sort_by_key(|u| u.id);

        let pagination = filter.pagination();
        let result: Vec<User> = result
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok((result, total))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        let email_exists = users
            .values()
            .any(|u| u.id != user.id && u.email.to_lowercase() == user.email.to_lowercase());

        if email_exists {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        let exists = users
            .values()
            .any(|u| u.email.to_lowercase() == email.to_lowercase());
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(email: &str) -> User {
        User::new(
            email.to_string(),
            "Test User".to_string(),
            "hashed_password".to_string(),
            vec![Role::User],
        )
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(user("test@example.com")).await.unwrap();
        assert_eq!(created.email, "test@example.com");

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_get_by_email_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("test@example.com")).await.unwrap();

        assert!(repo.get_by_email("TEST@EXAMPLE.COM").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryUserRepository::new();

        repo.create(user("test@example.com")).await.unwrap();
        let result = repo.create(user("test@example.com")).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_list_filters_by_role() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("a@example.com")).await.unwrap();
        repo.create(User::new(
            "admin@example.com".to_string(),
            "Admin".to_string(),
            "hash".to_string(),
            vec![Role::Admin],
        ))
        .await
        .unwrap();

        let (admins, total) = repo
            .list(UserFilter {
                role: Some("admin".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(total, 1);
        assert_eq!(admins[0].email, "admin@example.com");
    }
}
