use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let request_logging = state.config.api.enable_request_logging;
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(api_routes(state.clone()))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    if request_logging {
        router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    } else {
        router
    }
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(protected::posts::post_list).post(protected::posts::post_create))
        .route(
            "/api/posts/:id",
            get(protected::posts::post_get)
                .put(protected::posts::post_update)
                .delete(protected::posts::post_delete),
        )
        .route(
            "/api/profile/photo",
            put(protected::profile::photo_put).delete(protected::profile::photo_delete),
        )
        .route("/api/profile", delete(protected::profile::account_delete))
        .route("/api/media/signature", post(protected::media::signature_post))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// CORS from configuration; `*` in the origin list allows any origin
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if security.cors_origins.iter().any(|origin| origin == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(layer.allow_origin(origins))
}
