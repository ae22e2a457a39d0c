use crate::error::{ApiError, ApiResult};
use crate::extract::{AppPath, AppQuery};
use crate::handlers::favourites::FavouriteResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, response::Json};
use model::entities::{favourite, user};
use sea_orm::{ConnectionTrait, EntityTrait, LoaderTrait, ModelTrait, PaginatorTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for user endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Embed the user's favourites in the response (default: true)
    pub favourites: Option<bool>,
}

impl UserQuery {
    fn embed_favourites(&self) -> bool {
        self.favourites.unwrap_or(true)
    }
}

/// User response model. The password column is never exposed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Omitted when the request asked for `favourites=false`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favourites: Option<Vec<FavouriteResponse>>,
}

impl UserResponse {
    fn new(model: user::Model, favourites: Option<Vec<favourite::Model>>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            favourites: favourites
                .map(|rows| rows.into_iter().map(FavouriteResponse::from).collect()),
        }
    }
}

/// Fails with [`ApiError::NotFound`] unless the user row exists.
pub(crate) async fn ensure_user_exists<C: ConnectionTrait>(db: &C, user_id: i32) -> ApiResult<()> {
    trace!("Checking that user {} exists", user_id);
    if user::Entity::find_by_id(user_id).count(db).await? == 0 {
        warn!("User with ID {} not found", user_id);
        return Err(ApiError::not_found("User", user_id));
    }
    Ok(())
}

/// Get all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(UserQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserQuery>,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    debug!("Fetching all users from database");

    let users = user::Entity::find().all(&state.db).await?;
    let user_count = users.len();

    let results: Vec<UserResponse> = if query.embed_favourites() {
        // One batched query for every user's favourites
        let favourites = users.load_many(favourite::Entity, &state.db).await?;
        users
            .into_iter()
            .zip(favourites)
            .map(|(user_model, rows)| UserResponse::new(user_model, Some(rows)))
            .collect()
    } else {
        users
            .into_iter()
            .map(|user_model| UserResponse::new(user_model, None))
            .collect()
    };

    info!("Successfully retrieved {} users", user_count);
    Ok(Json(ApiResponse::new(results, "Users retrieved successfully")))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        UserQuery,
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    AppPath(user_id): AppPath<i32>,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserQuery>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    debug!("Fetching user with ID: {}", user_id);

    let Some(user_model) = user::Entity::find_by_id(user_id).one(&state.db).await? else {
        warn!("User with ID {} not found", user_id);
        return Err(ApiError::not_found("User", user_id));
    };

    let favourites = if query.embed_favourites() {
        Some(user_model.find_related(favourite::Entity).all(&state.db).await?)
    } else {
        None
    };

    info!("Successfully retrieved user with ID: {}", user_model.id);
    Ok(Json(ApiResponse::new(
        UserResponse::new(user_model, favourites),
        "User retrieved successfully",
    )))
}

/// Get the favourites of a user
#[utoipa::path(
    get,
    path = "/user/{user_id}/favourites",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Favourites retrieved successfully", body = ApiResponse<Vec<FavouriteResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_favourites(
    AppPath(user_id): AppPath<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<FavouriteResponse>>>> {
    debug!("Fetching favourites of user {}", user_id);

    ensure_user_exists(&state.db, user_id).await?;
    let favourites = favourite::Entity::find_by_user(user_id).all(&state.db).await?;

    info!("User {} has {} favourites", user_id, favourites.len());
    let results = favourites.into_iter().map(FavouriteResponse::from).collect();
    Ok(Json(ApiResponse::new(results, "Favourites retrieved successfully")))
}
