use models::product;
use tracing::{debug, info, warn};

use super::dto::{CreateProductRequest, DeleteProductRequest, ProductDto, ProductRequest, UpdateProductRequest};
use super::validation::{CreateProductValidator, Validator};
use crate::errors::ServiceError;
use crate::persistence::{Repository, SeaOrmRepository};
use crate::response::{BaseResponse, PagedResponse};

pub type ProductRepository = SeaOrmRepository<product::ActiveModel>;

/// Product use cases over any product repository.
pub struct ProductService<R> {
    repository: R,
    create_validator: CreateProductValidator,
}

impl<R> ProductService<R>
where
    R: Repository<product::Model, Id = i32>,
{
    pub fn new(repository: R) -> Self { Self { repository, create_validator: CreateProductValidator } }

    pub fn repository(&self) -> &R { &self.repository }

    /// Page metadata for the requested window. Items are not populated.
    pub async fn get_all(&mut self, request: &ProductRequest) -> BaseResponse<PagedResponse<ProductDto>> {
        let mut response = BaseResponse::new();
        match self.load_page(request).await {
            Ok(page) => response.result = Some(page),
            Err(ServiceError::Validation(message)) => response.add_error(message),
            Err(e) => {
                warn!(error = %e, "loading products failed");
                response.add_error(e.to_string());
            }
        }
        response
    }

    async fn load_page(&mut self, request: &ProductRequest) -> Result<PagedResponse<ProductDto>, ServiceError> {
        let index = request
            .index()
            .ok_or_else(|| ServiceError::Validation("'Limit' must be greater than 0.".into()))?;
        let loaded = self.repository.get_all().await?.len();
        debug!(loaded, index, page_size = request.limit, "product catalog loaded");
        Ok(PagedResponse::new(index, request.limit))
    }

    pub async fn get_by_id(&self, id: i32) -> BaseResponse<ProductDto> {
        debug!(id, "get product");
        BaseResponse::new()
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> BaseResponse<i32> {
        let mut response = BaseResponse::new();
        response.extend_errors(self.create_validator.validate(&request));
        if response.has_error() {
            info!(id = request.id, errors = response.errors.len(), "create product rejected");
        }
        response
    }

    pub async fn update_product(&self, id: i32, request: UpdateProductRequest) -> BaseResponse<ProductDto> {
        debug!(id, ?request, "update product");
        BaseResponse::new()
    }

    pub async fn delete_product(&self, request: DeleteProductRequest) -> BaseResponse<bool> {
        debug!(id = request.id, "delete product");
        BaseResponse::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{DbContext, RepositoryError, RepositoryResult};
    use crate::test_support::get_db;
    use async_trait::async_trait;
    use models::audit::Actor;

    async fn service() -> anyhow::Result<ProductService<ProductRepository>> {
        let db = get_db().await?;
        Ok(ProductService::new(DbContext::new(db, Actor::anonymous()).repository()))
    }

    /// Repository whose store is unreachable.
    struct OfflineRepository;

    fn offline<T>() -> RepositoryResult<T> { Err(RepositoryError::Db("connection refused".into())) }

    #[async_trait]
    impl Repository<product::Model> for OfflineRepository {
        type Id = i32;

        async fn get_by_id(&self, _id: i32) -> RepositoryResult<Option<product::Model>> { offline() }
        async fn insert<T>(&mut self, _entity: T) -> RepositoryResult<product::Model>
        where
            T: Into<Option<product::Model>> + Send,
        {
            offline()
        }
        async fn bulk_insert<T>(&mut self, _entities: T) -> RepositoryResult<Vec<product::Model>>
        where
            T: Into<Option<Vec<product::Model>>> + Send,
        {
            offline()
        }
        async fn update<T>(&mut self, _entity: T) -> RepositoryResult<product::Model>
        where
            T: Into<Option<product::Model>> + Send,
        {
            offline()
        }
        async fn bulk_update<T>(&mut self, _entities: T) -> RepositoryResult<Vec<product::Model>>
        where
            T: Into<Option<Vec<product::Model>>> + Send,
        {
            offline()
        }
        async fn delete<T>(&mut self, _entity: T) -> RepositoryResult<()>
        where
            T: Into<Option<product::Model>> + Send,
        {
            offline()
        }
        async fn bulk_delete<T>(&mut self, _entities: T) -> RepositoryResult<()>
        where
            T: Into<Option<Vec<product::Model>>> + Send,
        {
            offline()
        }
        async fn get_all(&mut self) -> RepositoryResult<Vec<product::Model>> { offline() }
        async fn get_all_as_no_tracking(&self) -> RepositoryResult<Vec<product::Model>> { offline() }
        async fn get_all_with_pagination(&self, _page_number: u64, _page_size: u64) -> RepositoryResult<Vec<product::Model>> {
            offline()
        }
        async fn save(&mut self) -> RepositoryResult<usize> { offline() }
    }

    #[tokio::test]
    async fn get_all_reports_page_window() -> anyhow::Result<()> {
        let mut svc = service().await?;
        let response = svc.get_all(&ProductRequest { offset: 20, limit: 10, order_by: None }).await;
        assert!(!response.has_error());
        let page = response.result.expect("page metadata");
        assert_eq!(page.index, 3);
        assert_eq!(page.page_size, 10);
        assert!(page.items.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_all_rejects_zero_limit() -> anyhow::Result<()> {
        let mut svc = service().await?;
        let response = svc.get_all(&ProductRequest { limit: 0, ..Default::default() }).await;
        assert_eq!(response.errors, vec!["'Limit' must be greater than 0.".to_string()]);
        assert!(response.result.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn get_all_surfaces_repository_failure() {
        let mut svc = ProductService::new(OfflineRepository);
        let response = svc.get_all(&ProductRequest::default()).await;
        assert_eq!(response.errors, vec!["database error: connection refused".to_string()]);
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn create_validates_id() {
        let svc = ProductService::new(OfflineRepository);
        let rejected = svc.create_product(CreateProductRequest { name: "Mug".into(), ..Default::default() }).await;
        assert_eq!(rejected.errors, vec!["'Id' must not be empty.".to_string()]);

        let accepted = svc.create_product(CreateProductRequest { id: 4, ..Default::default() }).await;
        assert!(!accepted.has_error());
        assert!(accepted.result.is_none());
    }

    #[tokio::test]
    async fn remaining_operations_return_empty_envelopes() {
        let svc = ProductService::new(OfflineRepository);
        let found = svc.get_by_id(1).await;
        assert!(!found.has_error() && found.result.is_none());
        let updated = svc.update_product(1, UpdateProductRequest::default()).await;
        assert!(!updated.has_error() && updated.result.is_none());
        let deleted = svc.delete_product(DeleteProductRequest { id: 1 }).await;
        assert!(!deleted.has_error() && deleted.result.is_none());
    }
}
