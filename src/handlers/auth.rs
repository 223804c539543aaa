// Login handler

use std::collections::HashMap;

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::pipeline::schemas::SchemaId;
use crate::pipeline::{Pipeline, PipelineRequest};
use crate::state::AppState;

const LOGIN: Pipeline = Pipeline::new().validated(SchemaId::Login);

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
}

/// POST /auth/login - check the configured credential and mint a bearer
/// token with the email as subject
pub async fn login(
    State(state): State<AppState>,
    req: PipelineRequest,
) -> Result<Json<LoginResponse>, ApiError> {
    let ctx = LOGIN.run(&state, req, HashMap::new()).await?;
    let payload: LoginPayload = ctx.body_as()?;

    let security = &state.config.security;
    if payload.email != security.login_email || payload.password != security.login_password {
        warn!(email = %payload.email, "login rejected");
        return Err(ApiError::unauthorized("Authentication error"));
    }

    let claims = Claims::new(payload.email.as_str(), security.jwt_expiry_hours);
    let token = auth::sign(security, &claims).map_err(ApiError::internal)?;

    info!(email = %payload.email, "login succeeded");
    Ok(Json(LoginResponse {
        token,
        email: payload.email,
    }))
}
