// User resource handlers

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::Json;
use tracing::info;

use crate::error::ApiError;
use crate::models::user::{User, UserPayload};
use crate::pipeline::schemas::SchemaId;
use crate::pipeline::{self, Pipeline, PipelineRequest, RequestContext};
use crate::state::AppState;
use crate::store::ListQuery;

// Stage lists, one per route. Listing is the only route that requires a
// credential; the loader runs wherever the path carries an id, and update
// is the only id route whose schema re-checks the id shape.
const LIST: Pipeline = Pipeline::new().authenticated();
const CREATE: Pipeline = Pipeline::new().validated(SchemaId::CreateUser);
const GET: Pipeline = Pipeline::new().loads_user();
const UPDATE: Pipeline = Pipeline::new()
    .validated(SchemaId::UpdateUser)
    .loads_user();
const REMOVE: Pipeline = Pipeline::new().loads_user();

/// GET /users - list one page of users, newest first
pub async fn list(
    State(state): State<AppState>,
    req: PipelineRequest,
) -> Result<Json<Vec<User>>, ApiError> {
    let ctx = LIST.run(&state, req, HashMap::new()).await?;
    let users = state.store.list(page_query(&ctx)).await?;
    Ok(Json(users))
}

/// POST /users - create a user from the validated body
pub async fn create(
    State(state): State<AppState>,
    req: PipelineRequest,
) -> Result<Json<User>, ApiError> {
    let ctx = CREATE.run(&state, req, HashMap::new()).await?;

    let payload: UserPayload = ctx.body_as()?;
    let user = state.store.save(User::new(payload)).await?;

    info!(user_id = %user.id, "user created");
    Ok(Json(user))
}

/// GET /users/:userId - the record resolved by the loader, verbatim
pub async fn get(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    req: PipelineRequest,
) -> Result<Json<User>, ApiError> {
    let ctx = GET
        .run(&state, req, pipeline::user_id_param(user_id))
        .await?;
    Ok(Json(ctx.loaded_user()?))
}

/// PUT /users/:userId - full replace of the mutable fields
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    req: PipelineRequest,
) -> Result<Json<User>, ApiError> {
    let ctx = UPDATE
        .run(&state, req, pipeline::user_id_param(user_id))
        .await?;

    let payload: UserPayload = ctx.body_as()?;
    let mut user = ctx.loaded_user()?;
    user.apply(payload);
    let user = state.store.save(user).await?;

    info!(user_id = %user.id, "user updated");
    Ok(Json(user))
}

/// DELETE /users/:userId - delete and return the removed record
pub async fn remove(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    req: PipelineRequest,
) -> Result<Json<User>, ApiError> {
    let ctx = REMOVE
        .run(&state, req, pipeline::user_id_param(user_id))
        .await?;

    let user = ctx.loaded_user()?;
    state.store.remove(&user).await?;

    info!(user_id = %user.id, "user removed");
    Ok(Json(user))
}

/// `limit` and `skip` from the query string. Values that fail to parse or
/// are negative fall back to the defaults rather than erroring.
fn page_query(ctx: &RequestContext) -> ListQuery {
    let defaults = ListQuery::default();
    ListQuery {
        limit: page_param(ctx.query.get("limit"), defaults.limit),
        skip: page_param(ctx.query.get("skip"), defaults.skip),
    }
}

fn page_param(raw: Option<&String>, default: i64) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .unwrap_or(default)
}
