//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestDatabase`: PostgreSQL container with migrations applied and
//!   automatic cleanup
//! - `TestDataBuilder`: Deterministic test data generation
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! # async fn example() {
//! let db = TestDatabase::new().await;
//! let builder = TestDataBuilder::from_test_name("my_test");
//!
//! let user_id = builder.user_id();
//! let product_name = builder.name("product", "main");
//! # }
//! ```

use uuid::Uuid;

mod postgres;

pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a deterministic user ID for testing
    pub fn user_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a unique name for testing
    ///
    /// # Arguments
    ///
    /// * `prefix` - The type of resource (e.g., "product", "order")
    /// * `suffix` - A unique identifier within the test (e.g., "main", "backup")
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("product", "main");
    /// // Returns: "test-product-12345-main"
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Generate a unique email address for testing
    pub fn email(&self, suffix: &str) -> String {
        format!("test-{}-{}@example.com", self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    /// Assert that two UUIDs are equal with a nice error message
    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Unwrap an Option with a readable failure message
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        match value {
            Some(v) => v,
            None => panic!("{}: expected Some, got None", context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_is_deterministic() {
        let a = TestDataBuilder::from_test_name("same_test");
        let b = TestDataBuilder::from_test_name("same_test");

        assert_eq!(a.user_id(), b.user_id());
        assert_eq!(a.name("product", "x"), b.name("product", "x"));
    }

    #[test]
    fn test_builder_differs_across_tests() {
        let a = TestDataBuilder::from_test_name("test_one");
        let b = TestDataBuilder::from_test_name("test_two");

        assert_ne!(a.user_id(), b.user_id());
    }
}
