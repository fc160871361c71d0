use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ProductDtoDoc {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

#[derive(ToSchema)]
pub struct CreateProductRequestDoc {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

#[derive(ToSchema)]
pub struct UpdateProductRequestDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[derive(ToSchema)]
pub struct ProductPageDoc {
    pub index: u64,
    pub page_size: u64,
    pub total: Option<u64>,
    pub items: Vec<ProductDtoDoc>,
    pub first: Option<String>,
    pub next: Option<String>,
    pub prev: Option<String>,
    pub last: Option<String>,
}

#[derive(ToSchema)]
pub struct ProductPageEnvelopeDoc {
    pub has_error: bool,
    pub errors: Vec<String>,
    pub total: i64,
    pub result: Option<ProductPageDoc>,
}

#[derive(ToSchema)]
pub struct ProductEnvelopeDoc {
    pub has_error: bool,
    pub errors: Vec<String>,
    pub total: i64,
    pub result: Option<ProductDtoDoc>,
}

#[derive(ToSchema)]
pub struct IdEnvelopeDoc {
    pub has_error: bool,
    pub errors: Vec<String>,
    pub total: i64,
    pub result: Option<i32>,
}

#[derive(ToSchema)]
pub struct BoolEnvelopeDoc {
    pub has_error: bool,
    pub errors: Vec<String>,
    pub total: i64,
    pub result: Option<bool>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::product::list,
        crate::product::get,
        crate::product::create,
        crate::product::update,
        crate::product::patch,
        crate::product::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDtoDoc,
            CreateProductRequestDoc,
            UpdateProductRequestDoc,
            ProductPageDoc,
            ProductPageEnvelopeDoc,
            ProductEnvelopeDoc,
            IdEnvelopeDoc,
            BoolEnvelopeDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "product")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_product_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/v1/product", "/api/v1/product/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("ProductEnvelopeDoc"));
    }
}
