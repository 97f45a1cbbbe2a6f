use axum_helpers::pagination::{DEFAULT_PAGE_SIZE, Pagination};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// User roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// User email (unique)
    pub email: String,
    /// User display name
    pub name: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User roles
    pub roles: Vec<Role>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// User response DTO (without password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            roles: user.roles.iter().map(|r| r.to_string()).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user (admin path; registration uses RegisterRequest)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// DTO for updating an existing user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Query filters for listing users
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[serde(deny_unknown_fields)]
pub struct UserFilter {
    /// Substring email match (case-insensitive)
    pub email: Option<String>,
    /// Filter by role name
    pub role: Option<String>,
    /// 1-based page index
    #[serde(default = "default_page")]
    pub page: u64,
    /// Requested page size (clamped to the server maximum)
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            email: None,
            role: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl UserFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.page_size)
    }

    pub fn matches(&self, user: &User) -> bool {
        if let Some(ref email) = self.email {
            if !user.email.to_lowercase().contains(&email.to_lowercase()) {
                return false;
            }
        }
        if let Some(ref role) = self.role {
            if !user.roles.iter().any(|r| r.to_string() == *role) {
                return false;
            }
        }
        true
    }
}

/// DTO for user login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// DTO for user registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Response after successful login/register
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
}

impl User {
    /// Create a new user (password must already be hashed by the service layer)
    pub fn new(email: String, name: String, password_hash: String, roles: Vec<Role>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email,
            name,
            password_hash,
            roles: if roles.is_empty() {
                vec![Role::User]
            } else {
                roles
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates (password should already be hashed if provided)
    pub fn apply_update(&mut self, update: UpdateUser, new_password_hash: Option<String>) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(hash) = new_password_hash {
            self.password_hash = hash;
        }
        if let Some(roles) = update.roles {
            self.roles = roles.iter().filter_map(|r| r.parse().ok()).collect();
            if self.roles.is_empty() {
                self.roles = vec![Role::User];
            }
        }
        self.updated_at = Utc::now();
    }

    pub fn role_strings(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.to_string()).collect()
    }
}
