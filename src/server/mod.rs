use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{BuilderError, BuilderResult};
use crate::store::DocumentStore;

pub mod designs;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/designs/:seller_id",
            get(designs::get_design)
                .put(designs::put_design)
                .delete(designs::delete_design),
        )
        .route("/storefronts", get(designs::list_storefronts))
        .route("/catalog/presets", get(designs::list_presets))
        .route("/catalog/templates", get(designs::list_templates))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn run_http_server(config: &ServerConfig, store: Arc<dyn DocumentStore>) -> BuilderResult<()> {
    let app = create_router(AppState { store });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|err| BuilderError::Internal(format!("invalid server address: {err}")))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| BuilderError::Internal(format!("failed to bind server: {err}")))?;

    tracing::info!(%addr, "design gateway listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| BuilderError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, SectionType, StoreSection};
    use crate::store::InMemoryDocumentStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let router = create_router(AppState {
            store: store.clone(),
        });
        (router, store)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn put(uri: &str, body: &Document) -> Request<Body> {
        Request::put(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn design(seller: &str) -> Document {
        let mut doc = Document::new(seller);
        doc.sections = vec![
            StoreSection::new(SectionType::Hero, 0),
            StoreSection::new(SectionType::About, 1),
        ];
        doc
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = app();
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_then_get_design() {
        let (router, _) = app();
        let (status, body) = send(router.clone(), put("/designs/seller-1", &design("seller-1"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["id"].is_string());

        let (status, body) = send(
            router,
            Request::get("/designs/seller-1").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["seller_id"], "seller-1");
        assert_eq!(body["sections"].as_array().unwrap().len(), 2);
        assert_eq!(body["sections"][0]["type"], "hero");
    }

    #[tokio::test]
    async fn test_missing_design_is_404() {
        let (router, _) = app();
        let (status, body) = send(
            router,
            Request::get("/designs/nobody").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nobody"));
    }

    #[tokio::test]
    async fn test_put_rejects_foreign_seller_and_bad_order() {
        let (router, store) = app();
        let (status, _) = send(router.clone(), put("/designs/seller-1", &design("seller-2"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut broken = design("seller-1");
        broken.sections[1].order = 9;
        let (status, _) = send(router, put("/designs/seller-1", &broken)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_storefronts_hide_invisible_sections() {
        let (router, store) = app();
        let mut doc = design("seller-1");
        doc.is_active = true;
        doc.sections[1].visible = false;
        store.save(&doc).await.unwrap();
        store.save(&design("seller-2")).await.unwrap();

        let (status, body) = send(
            router,
            Request::get("/storefronts").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["sections"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_design() {
        let (router, store) = app();
        store.save(&design("seller-1")).await.unwrap();
        let request = || Request::delete("/designs/seller-1").body(Body::empty()).unwrap();

        let (status, _) = send(router.clone(), request()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(router, request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_catalog_routes() {
        let (router, _) = app();
        let (status, body) = send(
            router.clone(),
            Request::get("/catalog/presets").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().iter().any(|p| p["id"] == "neon"));

        let (_, body) = send(
            router,
            Request::get("/catalog/templates").body(Body::empty()).unwrap(),
        )
        .await;
        assert!(body.as_array().unwrap().iter().any(|t| t["id"] == "hero-sale"));
    }
}
