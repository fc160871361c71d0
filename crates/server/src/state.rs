use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use configs::AppConfig;
use models::audit::Actor;
use sea_orm::DatabaseConnection;
use service::cache::{CacheService, MemoryCacheService};
use service::mail::{MailService, SendGridMailService};
use service::persistence::DbContext;
use service::product::{ProductRepository, ProductService};
use tracing::debug;
use uuid::Uuid;

/// Header carrying the acting principal's id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Shared handles cloned into every handler.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub cache: Arc<dyn CacheService>,
    pub mail: Arc<dyn MailService>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db,
            cache: Arc::new(MemoryCacheService::new(&config.cache)),
            mail: Arc::new(SendGridMailService::new(config.mail.clone())),
        }
    }

    /// Request-scoped persistence context for `actor`.
    pub fn db_context(&self, actor: Actor) -> DbContext { DbContext::new(self.db.clone(), actor) }

    pub fn product_service(&self, actor: Actor) -> ProductService<ProductRepository> {
        ProductService::new(self.db_context(actor).repository())
    }
}

/// The principal named by the `x-actor-id` header; anonymous when the header
/// is absent or not a UUID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentActor(pub Actor);

pub fn actor_from_headers(headers: &HeaderMap) -> Actor {
    let parsed = headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok());
    match parsed {
        Some(id) => Actor::new(id),
        None => {
            debug!("no usable actor header; acting anonymously");
            Actor::anonymous()
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(actor_from_headers(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn valid_header_names_the_actor() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(ACTOR_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(actor_from_headers(&headers), Actor::new(id));
    }

    #[test]
    fn missing_or_malformed_header_is_anonymous() {
        assert!(actor_from_headers(&HeaderMap::new()).is_anonymous());
        let mut headers = HeaderMap::new();
        headers.insert(ACTOR_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(actor_from_headers(&headers).is_anonymous());
    }
}
