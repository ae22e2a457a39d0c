use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppPath};
use crate::handlers::users::ensure_user_exists;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::favourite::{self, FavouriteTarget};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Select, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for the generic favourite creation route
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateFavouriteRequest {
    /// Owner of the favourite; must match the user in the path when given
    #[validate(range(min = 1))]
    pub user_id: Option<i32>,
    /// Character to favourite (mutually exclusive with `planets_id`)
    #[validate(range(min = 1))]
    pub characters_id: Option<i32>,
    /// Planet to favourite (mutually exclusive with `characters_id`)
    #[validate(range(min = 1))]
    pub planets_id: Option<i32>,
}

/// Favourite response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FavouriteResponse {
    pub id: i32,
    pub user_id: i32,
    pub characters_id: Option<i32>,
    pub planets_id: Option<i32>,
}

impl From<favourite::Model> for FavouriteResponse {
    fn from(model: favourite::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            characters_id: model.characters_id,
            planets_id: model.planets_id,
        }
    }
}

/// Get all favourites
#[utoipa::path(
    get,
    path = "/favourites",
    tag = "favourites",
    responses(
        (status = 200, description = "Favourites retrieved successfully", body = ApiResponse<Vec<FavouriteResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_favourites(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<FavouriteResponse>>>> {
    debug!("Fetching all favourites from database");

    let favourites = favourite::Entity::find().all(&state.db).await?;
    info!("Successfully retrieved {} favourites", favourites.len());

    let results = favourites.into_iter().map(FavouriteResponse::from).collect();
    Ok(Json(ApiResponse::new(results, "Favourites retrieved successfully")))
}

/// Get a specific favourite by ID
#[utoipa::path(
    get,
    path = "/favourites/{favourite_id}",
    tag = "favourites",
    params(
        ("favourite_id" = i32, Path, description = "Favourite ID"),
    ),
    responses(
        (status = 200, description = "Favourite retrieved successfully", body = ApiResponse<FavouriteResponse>),
        (status = 404, description = "Favourite not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_favourite(
    AppPath(favourite_id): AppPath<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    debug!("Fetching favourite with ID: {}", favourite_id);

    let favourite_model = favourite::Entity::find_by_id(favourite_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Favourite", favourite_id))?;

    Ok(Json(ApiResponse::new(
        FavouriteResponse::from(favourite_model),
        "Favourite retrieved successfully",
    )))
}

/// Delete a favourite by its own ID
#[utoipa::path(
    delete,
    path = "/favourites/{favourite_id}",
    tag = "favourites",
    params(
        ("favourite_id" = i32, Path, description = "Favourite ID"),
    ),
    responses(
        (status = 200, description = "Favourite was removed", body = ApiResponse<FavouriteResponse>),
        (status = 404, description = "Favourite not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_favourite(
    AppPath(favourite_id): AppPath<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    delete_one(
        &state,
        favourite::Entity::find_by_id(favourite_id),
        ApiError::not_found("Favourite", favourite_id),
    )
    .await
}

/// Add a favourite from a request body
#[utoipa::path(
    post,
    path = "/user/{user_id}",
    tag = "favourites",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = CreateFavouriteRequest,
    responses(
        (status = 201, description = "Favourite was successfully added", body = ApiResponse<FavouriteResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User or target not found", body = ErrorResponse),
        (status = 409, description = "Favourite already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_favourite(
    AppPath(user_id): AppPath<i32>,
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateFavouriteRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FavouriteResponse>>)> {
    request.validate()?;

    if let Some(body_user_id) = request.user_id {
        if body_user_id != user_id {
            warn!("Body user_id {} does not match path user {}", body_user_id, user_id);
            return Err(ApiError::Validation(format!(
                "user_id {body_user_id} does not match user {user_id} in the path"
            )));
        }
    }

    let target = FavouriteTarget::from_columns(request.characters_id, request.planets_id)
        .ok_or_else(|| {
            ApiError::Validation(
                "Exactly one of characters_id or planets_id must be set".to_string(),
            )
        })?;

    ensure_user_exists(&state.db, user_id).await?;
    ensure_target_exists(&state.db, target).await?;

    // Duplicates are rejected by the unique index and surface as 409
    let saved = target.new_favourite(user_id).insert(&state.db).await?;
    info!("Favourite {} created for user {}", saved.id, user_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            FavouriteResponse::from(saved),
            "Favourite was successfully added",
        )),
    ))
}

/// Favourite a character for a user
#[utoipa::path(
    post,
    path = "/user/{user_id}/favourites/people/{people_id}",
    tag = "favourites",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("people_id" = i32, Path, description = "Character ID"),
    ),
    responses(
        (status = 200, description = "Favourite added, or it already existed", body = ApiResponse<FavouriteResponse>),
        (status = 404, description = "User or character not found", body = ErrorResponse),
        (status = 409, description = "Favourite created concurrently", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_character_favourite(
    AppPath((user_id, people_id)): AppPath<(i32, i32)>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    add_favourite(&state, user_id, FavouriteTarget::Character(people_id)).await
}

/// Favourite a planet for a user
#[utoipa::path(
    post,
    path = "/user/{user_id}/favourites/planet/{planet_id}",
    tag = "favourites",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("planet_id" = i32, Path, description = "Planet ID"),
    ),
    responses(
        (status = 200, description = "Favourite added, or it already existed", body = ApiResponse<FavouriteResponse>),
        (status = 404, description = "User or planet not found", body = ErrorResponse),
        (status = 409, description = "Favourite created concurrently", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_planet_favourite(
    AppPath((user_id, planet_id)): AppPath<(i32, i32)>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    add_favourite(&state, user_id, FavouriteTarget::Planet(planet_id)).await
}

/// Remove a character from a user's favourites
#[utoipa::path(
    delete,
    path = "/user/{user_id}/favourites/people/{people_id}",
    tag = "favourites",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("people_id" = i32, Path, description = "Character ID"),
    ),
    responses(
        (status = 200, description = "Favourite was removed", body = ApiResponse<FavouriteResponse>),
        (status = 404, description = "Favourite not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_character_favourite(
    AppPath((user_id, people_id)): AppPath<(i32, i32)>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    remove_favourite(&state, user_id, FavouriteTarget::Character(people_id)).await
}

/// Remove a planet from a user's favourites
#[utoipa::path(
    delete,
    path = "/user/{user_id}/favourites/planet/{planet_id}",
    tag = "favourites",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("planet_id" = i32, Path, description = "Planet ID"),
    ),
    responses(
        (status = 200, description = "Favourite was removed", body = ApiResponse<FavouriteResponse>),
        (status = 404, description = "Favourite not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_planet_favourite(
    AppPath((user_id, planet_id)): AppPath<(i32, i32)>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    remove_favourite(&state, user_id, FavouriteTarget::Planet(planet_id)).await
}

/// Delete one of a user's favourites by the favourite's ID
#[utoipa::path(
    delete,
    path = "/user/{user_id}/favourites/{favourite_id}",
    tag = "favourites",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("favourite_id" = i32, Path, description = "Favourite ID"),
    ),
    responses(
        (status = 200, description = "Favourite was removed", body = ApiResponse<FavouriteResponse>),
        (status = 404, description = "Favourite not found for this user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user_favourite(
    AppPath((user_id, favourite_id)): AppPath<(i32, i32)>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    let select = favourite::Entity::find_by_id(favourite_id)
        .filter(favourite::Column::UserId.eq(user_id));

    delete_one(
        &state,
        select,
        ApiError::NotFound(format!(
            "Favourite with id {favourite_id} not found for user {user_id}"
        )),
    )
    .await
}

async fn ensure_target_exists<C: sea_orm::ConnectionTrait>(
    db: &C,
    target: FavouriteTarget,
) -> ApiResult<()> {
    if !target.exists(db).await? {
        warn!("{} with ID {} not found", target.kind(), target.id());
        return Err(ApiError::not_found(target.kind(), target.id()));
    }
    Ok(())
}

/// Check-then-insert inside one transaction. An existing favourite is
/// returned as is, so repeating the call never stores a second row.
async fn add_favourite(
    state: &AppState,
    user_id: i32,
    target: FavouriteTarget,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    debug!("Adding {:?} to favourites of user {}", target, user_id);

    // Dropping the transaction on an early return rolls it back
    let txn = state.db.begin().await?;

    ensure_user_exists(&txn, user_id).await?;
    ensure_target_exists(&txn, target).await?;

    if let Some(existing) = favourite::Entity::find_by_user_and_target(user_id, target)
        .one(&txn)
        .await?
    {
        info!("Favourite {} already exists for user {}", existing.id, user_id);
        return Ok(Json(ApiResponse::new(
            FavouriteResponse::from(existing),
            "Favourite already exists",
        )));
    }

    trace!("No existing favourite, inserting");
    let saved = target.new_favourite(user_id).insert(&txn).await?;
    txn.commit().await?;

    info!(
        "Favourite {} added: user {} -> {} {}",
        saved.id,
        user_id,
        target.kind(),
        target.id()
    );
    Ok(Json(ApiResponse::new(
        FavouriteResponse::from(saved),
        "Favourite added",
    )))
}

async fn remove_favourite(
    state: &AppState,
    user_id: i32,
    target: FavouriteTarget,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    debug!("Removing {:?} from favourites of user {}", target, user_id);

    delete_one(
        state,
        favourite::Entity::find_by_user_and_target(user_id, target),
        ApiError::NotFound(format!(
            "Favourite {} {} not found for user {}",
            target.kind().to_lowercase(),
            target.id(),
            user_id
        )),
    )
    .await
}

/// Find-then-delete inside one transaction. Fails with `not_found` and
/// leaves the store untouched when `select` matches nothing.
async fn delete_one(
    state: &AppState,
    select: Select<favourite::Entity>,
    not_found: ApiError,
) -> ApiResult<Json<ApiResponse<FavouriteResponse>>> {
    let txn = state.db.begin().await?;

    let Some(existing) = select.one(&txn).await? else {
        warn!("{}", not_found);
        return Err(not_found);
    };

    let response = FavouriteResponse::from(existing.clone());
    let result = existing.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Favourite {} removed ({} rows affected)",
        response.id, result.rows_affected
    );
    Ok(Json(ApiResponse::new(response, "Favourite was removed")))
}
