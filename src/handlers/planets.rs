use crate::error::{ApiError, ApiResult};
use crate::extract::AppPath;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, response::Json};
use model::entities::planet;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

/// Planet response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanetResponse {
    pub id: i32,
    pub name: String,
    pub population: String,
    pub terrain: String,
}

impl From<planet::Model> for PlanetResponse {
    fn from(model: planet::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            population: model.population,
            terrain: model.terrain,
        }
    }
}

/// Get all planets
#[utoipa::path(
    get,
    path = "/planets",
    tag = "planets",
    responses(
        (status = 200, description = "Planets retrieved successfully", body = ApiResponse<Vec<PlanetResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_planets(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<PlanetResponse>>>> {
    debug!("Fetching all planets from database");

    let planets = planet::Entity::find().all(&state.db).await?;
    info!("Successfully retrieved {} planets", planets.len());

    let results = planets.into_iter().map(PlanetResponse::from).collect();
    Ok(Json(ApiResponse::new(results, "Planets retrieved successfully")))
}

/// Get a specific planet by ID
#[utoipa::path(
    get,
    path = "/planets/{planet_id}",
    tag = "planets",
    params(
        ("planet_id" = i32, Path, description = "Planet ID"),
    ),
    responses(
        (status = 200, description = "Planet retrieved successfully", body = ApiResponse<PlanetResponse>),
        (status = 404, description = "Planet not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_planet(
    AppPath(planet_id): AppPath<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<PlanetResponse>>> {
    debug!("Fetching planet with ID: {}", planet_id);

    match planet::Entity::find_by_id(planet_id).one(&state.db).await? {
        Some(planet_model) => Ok(Json(ApiResponse::new(
            PlanetResponse::from(planet_model),
            "Planet retrieved successfully",
        ))),
        None => {
            warn!("Planet with ID {} not found", planet_id);
            Err(ApiError::not_found("Planet", planet_id))
        }
    }
}
