use axum_helpers::pagination::Page;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductFilter, ProductInfo, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product with validation
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Get a product by ID
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// List products with filters, returning a page envelope
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Page<Product>> {
        let pagination = filter.pagination();
        let (items, total) = self.repository.list(filter).await?;
        Ok(Page::new(items, total, pagination))
    }

    /// Replace a product (full update)
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a product
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    /// Aggregate catalog view (count + max price), computed per request
    pub async fn product_info(&self) -> ProductResult<ProductInfo> {
        self.repository.info().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_repository() {
        // No expectations set: reaching the repository would panic
        let mock_repo = MockProductRepository::new();
        let service = ProductService::new(mock_repo);

        let input = CreateProduct {
            name: String::new(), // invalid
            description: String::new(),
            price: Decimal::from(1),
            stock: 0,
        };

        let result = service.create_product(input).await;
        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_get_by_id()
            .with(mockall::predicate::eq(id))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service.get_product(id).await;

        assert!(matches!(result, Err(ProductError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_delete()
            .with(mockall::predicate::eq(id))
            .returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let result = service.delete_product(id).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_builds_page_envelope() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo.expect_list().returning(|_| Ok((vec![], 42)));

        let service = ProductService::new(mock_repo);
        let page = service
            .list_products(ProductFilter {
                page: 2,
                page_size: 10,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 42);
        assert_eq!(page.page, 2);
        assert_eq!(page.next, Some(3));
        assert_eq!(page.previous, Some(1));
    }
}
