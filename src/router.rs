use crate::handlers::{
    characters::{get_character, get_characters},
    favourites::{
        add_character_favourite, add_planet_favourite, create_favourite, delete_favourite,
        delete_user_favourite, get_favourite, get_favourites, remove_character_favourite,
        remove_planet_favourite,
    },
    health::health_check,
    planets::{get_planet, get_planets},
    users::{get_user, get_user_favourites, get_users},
};
use crate::error::ApiError;
use crate::schemas::{ApiDoc, AppState};
use axum::{
    http::{Method, Uri},
    routing::{delete, get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, normalize_path::NormalizePath,
    timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route matches {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} is not allowed on {}", method, uri.path()))
}

/// Create application router with all routes and middleware
///
/// `/users/` and `/users` reach the same handler. Unmatched paths and
/// methods answer with an [`ErrorResponse`](crate::schemas::ErrorResponse).
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Users
        .route("/users", get(get_users))
        .route("/user/:user_id", get(get_user).post(create_favourite))
        .route("/user/:user_id/favourites", get(get_user_favourites))
        // Legacy aliases kept for existing clients
        .route("/users/favourites", get(get_users))
        .route("/user/favourites/:user_id", get(get_user))
        // Targeted favourite routes
        .route(
            "/user/:user_id/favourites/people/:people_id",
            post(add_character_favourite).delete(remove_character_favourite),
        )
        .route(
            "/user/:user_id/favourites/planet/:planet_id",
            post(add_planet_favourite).delete(remove_planet_favourite),
        )
        .route(
            "/user/:user_id/favourites/:favourite_id",
            delete(delete_user_favourite),
        )
        // Catalogue
        .route("/characters", get(get_characters))
        .route("/characters/:character_id", get(get_character))
        .route("/planets", get(get_planets))
        .route("/planets/:planet_id", get(get_planet))
        // Favourites
        .route("/favourites", get(get_favourites))
        .route(
            "/favourites/:favourite_id",
            get(get_favourite).delete(delete_favourite),
        )
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state);

    // Trailing slashes are trimmed before the API routes are matched. Swagger
    // UI stays outside, it redirects `/swagger-ui` to `/swagger-ui/`.
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(NormalizePath::trim_trailing_slash(api))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
}
