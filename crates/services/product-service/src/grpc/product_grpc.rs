//! gRPC implementation for ProductService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::service::ProductService;
use common::AppError;
use domain::{
    NewProduct, PaginationParams, Product, ProductPatch, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE,
};
use proto::product::{
    product_service_server::ProductService as ProductServiceProto, CreateProductRequest,
    FindAllProductsRequest, FindAllProductsResponse, FindOneProductRequest, PaginationMeta,
    ProductResponse, RemoveProductRequest, UpdateProductRequest, ValidateProductsRequest,
    ValidateProductsResponse,
};

/// gRPC service wrapper for ProductService.
///
/// Payload validation happens here, before the service runs; once an
/// operation is invoked its input is well-typed and well-formed.
pub struct ProductGrpcService {
    service: Arc<dyn ProductService>,
}

impl ProductGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn ProductService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl ProductServiceProto for ProductGrpcService {
    async fn create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();

        let input = NewProduct {
            name: req.name,
            price: req.price,
        };
        input
            .validate()
            .map_err(|e| Status::from(AppError::from(e)))?;

        let product = self
            .service
            .create_product(input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(product_to_proto(&product)))
    }

    async fn find_all_products(
        &self,
        request: Request<FindAllProductsRequest>,
    ) -> Result<Response<FindAllProductsResponse>, Status> {
        let req = request.into_inner();
        let params = parse_pagination(req.page, req.limit)?;

        let page = self
            .service
            .list_products(params)
            .await
            .map_err(Status::from)?;

        let data: Vec<ProductResponse> = page.data.iter().map(product_to_proto).collect();
        let meta = PaginationMeta {
            total: page.meta.total,
            page: page.meta.page,
            last_page: page.meta.last_page,
        };

        Ok(Response::new(FindAllProductsResponse {
            data,
            meta: Some(meta),
        }))
    }

    async fn find_one_product(
        &self,
        request: Request<FindOneProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();
        let id = parse_id(req.id)?;

        let product = self.service.get_product(id).await.map_err(Status::from)?;
        Ok(Response::new(product_to_proto(&product)))
    }

    async fn update_product(
        &self,
        request: Request<UpdateProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();
        let id = parse_id(req.id)?;

        // The patch type has no id field; an inbound id cannot leak into the
        // persisted update
        let patch = ProductPatch {
            name: req.name,
            price: req.price,
        };
        patch
            .validate()
            .map_err(|e| Status::from(AppError::from(e)))?;

        let product = self
            .service
            .update_product(id, patch)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(product_to_proto(&product)))
    }

    async fn remove_product(
        &self,
        request: Request<RemoveProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();
        let id = parse_id(req.id)?;

        let product = self
            .service
            .remove_product(id)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(product_to_proto(&product)))
    }

    async fn validate_products(
        &self,
        request: Request<ValidateProductsRequest>,
    ) -> Result<Response<ValidateProductsResponse>, Status> {
        let req = request.into_inner();
        for &id in &req.ids {
            parse_id(id)?;
        }

        let products = self
            .service
            .validate_products(req.ids)
            .await
            .map_err(Status::from)?;
        let products = products.iter().map(product_to_proto).collect();

        Ok(Response::new(ValidateProductsResponse { products }))
    }
}

/// Validate a store-assigned identifier.
fn parse_id(id: i32) -> Result<i32, Status> {
    if id < 1 {
        return Err(AppError::bad_request("Product id must be a positive integer").into());
    }
    Ok(id)
}

/// Resolve pagination values, applying defaults when absent.
fn parse_pagination(page: Option<u32>, limit: Option<u32>) -> Result<PaginationParams, Status> {
    if page == Some(0) {
        return Err(AppError::bad_request("page must be a positive integer").into());
    }
    if limit == Some(0) {
        return Err(AppError::bad_request("limit must be a positive integer").into());
    }

    Ok(PaginationParams {
        page: page.map(u64::from).unwrap_or(DEFAULT_PAGE_NUMBER),
        limit: limit.map(u64::from).unwrap_or(DEFAULT_PAGE_SIZE),
    })
}

/// Convert domain Product to proto ProductResponse.
fn product_to_proto(product: &Product) -> ProductResponse {
    ProductResponse {
        id: product.id,
        name: product.name.clone(),
        price: product.price,
        available: product.available,
        created_at: product.created_at.to_rfc3339(),
        updated_at: product.updated_at.to_rfc3339(),
    }
}
