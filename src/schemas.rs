use crate::handlers::{
    characters::CharacterResponse, favourites::CreateFavouriteRequest,
    favourites::FavouriteResponse, planets::PlanetResponse, users::UserResponse,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response payload
    pub results: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(results: T, message: impl Into<String>) -> Self {
        Self {
            results,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::get_user_favourites,
        crate::handlers::characters::get_characters,
        crate::handlers::characters::get_character,
        crate::handlers::planets::get_planets,
        crate::handlers::planets::get_planet,
        crate::handlers::favourites::get_favourites,
        crate::handlers::favourites::get_favourite,
        crate::handlers::favourites::delete_favourite,
        crate::handlers::favourites::create_favourite,
        crate::handlers::favourites::add_character_favourite,
        crate::handlers::favourites::add_planet_favourite,
        crate::handlers::favourites::remove_character_favourite,
        crate::handlers::favourites::remove_planet_favourite,
        crate::handlers::favourites::delete_user_favourite,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            UserResponse,
            CharacterResponse,
            PlanetResponse,
            FavouriteResponse,
            CreateFavouriteRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User endpoints"),
        (name = "characters", description = "Character catalogue endpoints"),
        (name = "planets", description = "Planet catalogue endpoints"),
        (name = "favourites", description = "Favourite management endpoints"),
    ),
    info(
        title = "Holonet API",
        description = "Star Wars catalogue favourites tracker",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
