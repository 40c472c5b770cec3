//! # HTTP Server
//!
//! Combines the user and health routers behind CORS and request tracing.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::service::DirectoryService;

use super::config::HttpServerConfig;
use super::routes::{health_routes, user_routes, UserState};

/// HTTP server for the user directory
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server around an already-selected directory service
    pub fn new(config: HttpServerConfig, service: DirectoryService) -> Self {
        let router = Self::build_router(&config, service);
        Self { config, router }
    }

    fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
        let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

        if config.cors_origins.is_empty() {
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(methods)
                .allow_headers(Any);
        }

        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers(Any)
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, service: DirectoryService) -> Router {
        let state = Arc::new(UserState::new(service));

        Router::new()
            .merge(health_routes(state.clone()))
            .nest("/api/users", user_routes(state))
            .layer(TraceLayer::new_for_http())
            .layer(Self::cors_layer(config))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr.as_str()).await?;

        info!(addr = %addr, "user directory listening");
        axum::serve(listener, self.router).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::VolatileStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn server(config: HttpServerConfig) -> HttpServer {
        HttpServer::new(config, DirectoryService::new(Arc::new(VolatileStore::new())))
    }

    #[test]
    fn test_socket_addr() {
        assert_eq!(
            server(HttpServerConfig::with_port(8080)).socket_addr(),
            "0.0.0.0:8080"
        );
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = server(HttpServerConfig::default()).router();

        let response = app
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_cors_omits_unknown_origin() {
        let app = server(HttpServerConfig::default()).router();

        let response = app
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://evil.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }
}
