//! Route definitions for the API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers;
use crate::auth::require_admin;
use crate::AppState;

/// Maximum accepted request body, sized for image uploads.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login,
        handlers::get_current_admin,
        handlers::create_admin,
        handlers::update_admin,
        handlers::list_menu_items,
        handlers::create_menu_item,
        handlers::update_menu_item,
        handlers::delete_menu_item,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::LoginForm,
        crate::api::types::LoginResponse,
        crate::api::types::AdminForm,
        crate::api::types::AdminResponse,
        crate::api::types::MenuItemResponse,
        crate::api::types::MessageResponse,
        crate::api::types::HealthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Admin authentication"),
        (name = "admins", description = "Admin account management"),
        (name = "menu", description = "Menu item management and listing"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Bistro Core API",
        version = "0.1.0",
        description = "Restaurant menu backend - admin authentication, menu management, public menu listing",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the API router.
///
/// Every mutating route sits behind the auth gate; the login, public
/// menu listing, and health endpoints do not.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected_routes = Router::new()
        .route("/api/admin/me", get(handlers::get_current_admin))
        .route("/api/admins", post(handlers::create_admin))
        .route("/api/admins/:id", put(handlers::update_admin))
        .route("/api/menu", post(handlers::create_menu_item))
        .route(
            "/api/menu/:id",
            put(handlers::update_menu_item).delete(handlers::delete_menu_item),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/menu-items", get(handlers::list_menu_items))
        .route("/api/health", get(handlers::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state.clone());

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .nest_service("/images", ServeDir::new(state.images.dir()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
