use axum_helpers::pagination::{DEFAULT_PAGE_SIZE, Pagination};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Custom validator: prices may be zero but never negative
fn validate_non_negative(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_negative() {
        return Err(validator::ValidationError::new("negative_price"));
    }
    Ok(())
}

/// Product entity - a catalog item available for ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price (decimal string on the wire, e.g. "9.99")
    pub price: Decimal,
    /// Units currently in stock
    pub stock: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_non_negative"))]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
}

/// DTO for replacing an existing product (PUT is a full replace).
///
/// `name` and `price` are declared as `Option` purely so that a missing
/// field surfaces as a field-keyed `required` validation error instead of a
/// bare deserialization failure; validation guarantees they are present.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(required, length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[validate(required, custom(function = "validate_non_negative"))]
    pub price: Option<Decimal>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
}

/// Allowed list orderings; anything else is rejected at the query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProductOrdering {
    #[serde(rename = "name")]
    NameAsc,
    #[serde(rename = "-name")]
    NameDesc,
    #[serde(rename = "price")]
    PriceAsc,
    #[serde(rename = "-price")]
    PriceDesc,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Query filters for listing products.
///
/// All supplied predicates are combined with AND. Unknown query keys
/// (e.g. an unsupported comparison operator) are rejected with 400.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[serde(deny_unknown_fields)]
pub struct ProductFilter {
    /// Exact name match
    pub name: Option<String>,
    /// Substring name match (case-sensitive)
    pub name_contains: Option<String>,
    /// Exact price match
    pub price: Option<Decimal>,
    /// Price strictly greater than
    pub price_gt: Option<Decimal>,
    /// Price strictly less than
    pub price_lt: Option<Decimal>,
    /// Inclusive lower bound of a price range
    pub price_min: Option<Decimal>,
    /// Inclusive upper bound of a price range
    pub price_max: Option<Decimal>,
    /// Case-insensitive term matched against name OR description
    pub search: Option<String>,
    /// Result ordering from the allow-list; default is insertion order
    pub ordering: Option<ProductOrdering>,
    /// 1-based page index
    #[serde(default = "default_page")]
    pub page: u64,
    /// Requested page size (clamped to the server maximum)
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            name: None,
            name_contains: None,
            price: None,
            price_gt: None,
            price_lt: None,
            price_min: None,
            price_max: None,
            search: None,
            ordering: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl ProductFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.page_size)
    }

    /// Whether a product satisfies every supplied predicate (AND semantics).
    ///
    /// This is the reference implementation of the filter language; the
    /// SQL-backed repository composes the equivalent WHERE clause.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref name) = self.name {
            if product.name != *name {
                return false;
            }
        }
        if let Some(ref sub) = self.name_contains {
            if !product.name.contains(sub.as_str()) {
                return false;
            }
        }
        if let Some(price) = self.price {
            if product.price != price {
                return false;
            }
        }
        if let Some(bound) = self.price_gt {
            if product.price <= bound {
                return false;
            }
        }
        if let Some(bound) = self.price_lt {
            if product.price >= bound {
                return false;
            }
        }
        if let Some(bound) = self.price_min {
            if product.price < bound {
                return false;
            }
        }
        if let Some(bound) = self.price_max {
            if product.price > bound {
                return false;
            }
        }
        if let Some(ref term) = self.search {
            let term = term.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&term);
            let in_description = product.description.to_lowercase().contains(&term);
            if !in_name && !in_description {
                return false;
            }
        }
        true
    }
}

/// Aggregate catalog view: the full product list with request-time
/// count and maximum price. Never cached.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductInfo {
    pub products: Vec<Product>,
    pub count: u64,
    pub max_price: Option<Decimal>,
}

impl Product {
    /// Create a new product from a CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a full replace from an UpdateProduct DTO.
    ///
    /// Callers validate the DTO first; `name`/`price` left as `None` by an
    /// unvalidated caller keep their previous values.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        self.description = update.description;
        if let Some(price) = update.price {
            self.price = price;
        }
        self.stock = update.stock;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn product(name: &str, description: &str, price: f64) -> Product {
        Product::new(CreateProduct {
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::from_f64(price).unwrap(),
            stock: 1,
        })
    }

    #[test]
    fn test_filter_price_gt_is_strict() {
        let filter = ProductFilter {
            price_gt: Some(Decimal::from(100)),
            ..Default::default()
        };

        assert!(!filter.matches(&product("a", "", 100.0)));
        assert!(filter.matches(&product("b", "", 100.01)));
    }

    #[test]
    fn test_filter_predicates_are_conjunctive() {
        let filter = ProductFilter {
            price_gt: Some(Decimal::from(100)),
            price_lt: Some(Decimal::from(200)),
            ..Default::default()
        };

        assert!(!filter.matches(&product("a", "", 99.0)));
        assert!(filter.matches(&product("b", "", 150.0)));
        assert!(!filter.matches(&product("c", "", 250.0)));
    }

    #[test]
    fn test_filter_price_range_is_inclusive() {
        let filter = ProductFilter {
            price_min: Some(Decimal::from(10)),
            price_max: Some(Decimal::from(20)),
            ..Default::default()
        };

        assert!(filter.matches(&product("a", "", 10.0)));
        assert!(filter.matches(&product("b", "", 20.0)));
        assert!(!filter.matches(&product("c", "", 20.01)));
    }

    #[test]
    fn test_filter_name_contains_is_case_sensitive() {
        let filter = ProductFilter {
            name_contains: Some("Widget".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&product("Super Widget", "", 1.0)));
        assert!(!filter.matches(&product("super widget", "", 1.0)));
    }

    #[test]
    fn test_search_is_case_insensitive_across_name_and_description() {
        let filter = ProductFilter {
            search: Some("KEYBOARD".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&product("Mechanical Keyboard", "", 1.0)));
        assert!(filter.matches(&product("Numpad", "pairs with any keyboard", 1.0)));
        assert!(!filter.matches(&product("Mouse", "wireless", 1.0)));
    }

    #[test]
    fn test_apply_update_replaces_all_fields() {
        let mut p = product("Old", "old text", 5.0);

        p.apply_update(UpdateProduct {
            name: Some("New".to_string()),
            description: String::new(),
            price: Some(Decimal::from(7)),
            stock: 3,
        });

        assert_eq!(p.name, "New");
        assert_eq!(p.description, "");
        assert_eq!(p.price, Decimal::from(7));
        assert_eq!(p.stock, 3);
    }

    #[test]
    fn test_update_requires_name_and_price() {
        let update = UpdateProduct::default();
        let err = update.validate().unwrap_err();
        let fields = err.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_negative_price_fails_validation() {
        let input = CreateProduct {
            name: "x".to_string(),
            description: String::new(),
            price: Decimal::from(-1),
            stock: 0,
        };

        assert!(input.validate().is_err());
    }
}
