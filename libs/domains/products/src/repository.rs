use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductFilter, ProductInfo, ProductOrdering, UpdateProduct};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Get several products by ID (missing ids are silently skipped)
    async fn get_by_ids(&self, ids: &[Uuid]) -> ProductResult<Vec<Product>>;

    /// List products matching the filter; returns the page slice and the
    /// total number of matches
    async fn list(&self, filter: ProductFilter) -> ProductResult<(Vec<Product>, u64)>;

    /// Replace an existing product
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product>;

    /// Delete a product by ID
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Aggregate view over the whole catalog, computed per call
    async fn info(&self) -> ProductResult<ProductInfo>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn sort_products(products: &mut [Product], ordering: Option<ProductOrdering>) {
    match ordering {
        Some(ProductOrdering::NameAsc) => products.sort_by(|a, b| a.name.cmp(&b.name)),
        Some(ProductOrdering::NameDesc) => products.sort_by(|a, b| b.name.cmp(&a.name)),
        Some(ProductOrdering::PriceAsc) => products.sort_by(|a, b| a.price.cmp(&b.price)),
        Some(ProductOrdering::PriceDesc) => products.sort_by(|a, b| b.price.cmp(&a.price)),
        // Ids are UUIDv7, so primary-key order is insertion order
        None => products.sort_by_key(|p| p.id),
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let product = Product::new(input);
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn list(&self, filter: ProductFilter) -> ProductResult<(Vec<Product>, u64)> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        let total = result.len() as u64;

        sort_products(&mut result, filter.ordering);

        let pagination = filter.pagination();
        let result: Vec<Product> = result
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok((result, total))
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let product = products
            .get_mut(&id)
            .ok_or(crate::error::ProductError::NotFound(id))?;

        product.apply_update(input);
        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn info(&self) -> ProductResult<ProductInfo> {
        let products = self.products.read().await;

        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by_key(|p| p.id);

        let count = all.len() as u64;
        let max_price = all.iter().map(|p| p.price).max();

        Ok(ProductInfo {
            products: all,
            count,
            max_price,
        })
    }
}
