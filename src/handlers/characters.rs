use crate::error::{ApiError, ApiResult};
use crate::extract::AppPath;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, response::Json};
use model::entities::character;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

/// Character response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CharacterResponse {
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub mass: String,
    pub height: String,
}

impl From<character::Model> for CharacterResponse {
    fn from(model: character::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            gender: model.gender,
            mass: model.mass,
            height: model.height,
        }
    }
}

/// Get all characters
#[utoipa::path(
    get,
    path = "/characters",
    tag = "characters",
    responses(
        (status = 200, description = "Characters retrieved successfully", body = ApiResponse<Vec<CharacterResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_characters(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<CharacterResponse>>>> {
    debug!("Fetching all characters from database");

    let characters = character::Entity::find().all(&state.db).await?;
    info!("Successfully retrieved {} characters", characters.len());

    let results = characters.into_iter().map(CharacterResponse::from).collect();
    Ok(Json(ApiResponse::new(results, "Characters retrieved successfully")))
}

/// Get a specific character by ID
#[utoipa::path(
    get,
    path = "/characters/{character_id}",
    tag = "characters",
    params(
        ("character_id" = i32, Path, description = "Character ID"),
    ),
    responses(
        (status = 200, description = "Character retrieved successfully", body = ApiResponse<CharacterResponse>),
        (status = 404, description = "Character not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_character(
    AppPath(character_id): AppPath<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<CharacterResponse>>> {
    debug!("Fetching character with ID: {}", character_id);

    let Some(character_model) = character::Entity::find_by_id(character_id).one(&state.db).await? else {
        warn!("Character with ID {} not found", character_id);
        return Err(ApiError::not_found("Character", character_id));
    };

    Ok(Json(ApiResponse::new(
        CharacterResponse::from(character_model),
        "Character retrieved successfully",
    )))
}
