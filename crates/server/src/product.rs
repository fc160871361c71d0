use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use service::product::{CreateProductRequest, DeleteProductRequest, ProductRequest, UpdateProductRequest};
use service::response::BaseResponse;
use tracing::info;

use crate::errors::ApiError;
use crate::state::{CurrentActor, ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateQuery {
    /// Product id
    pub id: i32,
}

/// `success` unless the envelope carries errors, then 400.
fn envelope<T: Serialize>(success: StatusCode, response: BaseResponse<T>) -> Response {
    let status = if response.has_error() { StatusCode::BAD_REQUEST } else { success };
    (status, Json(response)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/product",
    tag = "product",
    params(
        ("offset" = Option<u64>, Query, description = "Rows to skip"),
        ("limit" = Option<u64>, Query, description = "Page size, default 10"),
        ("order_by" = Option<String>, Query, description = "Ordering hint"),
    ),
    responses(
        (status = 200, description = "Page metadata", body = crate::openapi::ProductPageEnvelopeDoc),
        (status = 400, description = "Invalid request", body = crate::openapi::ProductPageEnvelopeDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    query: Result<Query<ProductRequest>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(request) = query?;
    let response = state.product_service(actor).get_all(&request).await;
    Ok(envelope(StatusCode::OK, response))
}

#[utoipa::path(
    get,
    path = "/api/v1/product/{id}",
    tag = "product",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product envelope", body = crate::openapi::ProductEnvelopeDoc),
        (status = 404, description = "Not found", body = crate::openapi::ProductEnvelopeDoc),
        (status = 400, description = "Invalid request", body = crate::openapi::ProductEnvelopeDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let response = state.product_service(actor).get_by_id(id).await;
    Ok(envelope(StatusCode::OK, response))
}

#[utoipa::path(
    post,
    path = "/api/v1/product",
    tag = "product",
    request_body = crate::openapi::CreateProductRequestDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::IdEnvelopeDoc),
        (status = 400, description = "Validation failed", body = crate::openapi::IdEnvelopeDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let response = state.product_service(actor).create_product(request).await;
    Ok(envelope(StatusCode::CREATED, response))
}

#[utoipa::path(
    put,
    path = "/api/v1/product",
    tag = "product",
    params(UpdateQuery),
    request_body = crate::openapi::UpdateProductRequestDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductEnvelopeDoc),
        (status = 400, description = "Invalid request", body = crate::openapi::ProductEnvelopeDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    query: Result<Query<UpdateQuery>, QueryRejection>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let Json(request) = body?;
    let response = state.product_service(actor).update_product(query.id, request).await;
    Ok(envelope(StatusCode::OK, response))
}

#[utoipa::path(
    patch,
    path = "/api/v1/product",
    tag = "product",
    responses((status = 202, description = "Accepted"))
)]
pub async fn patch() -> StatusCode { StatusCode::ACCEPTED }

#[utoipa::path(
    delete,
    path = "/api/v1/product/{id}",
    tag = "product",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = crate::openapi::IdEnvelopeDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let response = state.product_service(actor).delete_product(DeleteProductRequest { id }).await;
    info!(id, %actor, has_error = response.has_error(), "delete product");
    Ok(StatusCode::NO_CONTENT)
}
