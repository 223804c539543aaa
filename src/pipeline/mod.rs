// Request-processing pipeline: authenticate -> validate -> load
//
// Each route declares which stages it needs as a const `Pipeline`. The
// stages always execute in the same order and the first failure ends the
// request with that stage's error; the handler body only ever sees a
// context whose preconditions all hold.

pub mod authenticate;
pub mod load;
pub mod schemas;
pub mod validate;

use std::collections::HashMap;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::user::User;
use crate::state::AppState;
use schemas::SchemaId;

/// Name of the path parameter carrying a user identifier.
pub const USER_ID_PARAM: &str = "userId";

/// Raw material for one pipeline run, pulled off the request before any
/// stage executes: headers, the query string as a map, and the unparsed
/// body. Body parsing is deferred so that authentication failures win over
/// malformed JSON on protected routes.
pub struct PipelineRequest {
    pub headers: HeaderMap,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

#[async_trait]
impl FromRequest<AppState> for PipelineRequest {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let query = req.uri().query().map(parse_query).unwrap_or_default();
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|err| ApiError::bad_request(format!("Failed to read request body: {err}")))?;

        Ok(Self { headers, query, body })
    }
}

fn parse_query(raw: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}

/// Params map for routes whose path carries the user id.
pub fn user_id_param(value: String) -> HashMap<String, String> {
    HashMap::from([(USER_ID_PARAM.to_string(), value)])
}

/// Per-request state threaded through the stages: the request inputs plus
/// the slots later stages fill in. Owned by one request task, dropped when
/// the response goes out.
#[derive(Debug)]
pub struct RequestContext {
    pub headers: HeaderMap,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub raw_body: Bytes,
    /// JSON body, `Null` until the validation stage parses it.
    pub body: Value,
    /// Subject of the verified bearer credential, set by authentication.
    pub subject: Option<String>,
    /// Record resolved from the `userId` parameter, set by the loader.
    pub user: Option<User>,
}

impl RequestContext {
    fn new(req: PipelineRequest, params: HashMap<String, String>) -> Self {
        Self {
            headers: req.headers,
            params,
            query: req.query,
            raw_body: req.body,
            body: Value::Null,
            subject: None,
            user: None,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Parse the raw body as JSON. An empty body stays `Null`.
    fn parse_body(&mut self) -> Result<(), ApiError> {
        if self.raw_body.is_empty() {
            return Ok(());
        }
        self.body = serde_json::from_slice(&self.raw_body)
            .map_err(|err| ApiError::invalid_json(format!("Invalid JSON body: {err}")))?;
        Ok(())
    }

    /// Typed view of the validated body. Runs after the schema stage has
    /// passed, so a failure here is a server bug, not client input.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone()).map_err(ApiError::internal)
    }

    /// The record attached by the loader stage. Routes that declare the
    /// loader always run it, so absence here means a miswired route table.
    pub fn loaded_user(self) -> Result<User, ApiError> {
        match self.user {
            Some(user) => Ok(user),
            None => Err(ApiError::internal("handler reached without a loaded user")),
        }
    }
}

/// Stage list for one route. Built as consts next to the handlers, so the
/// route table reads as data: which routes authenticate, which validate,
/// which load.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    authenticate: bool,
    schema: Option<SchemaId>,
    load_user: bool,
}

impl Pipeline {
    pub const fn new() -> Self {
        Self {
            authenticate: false,
            schema: None,
            load_user: false,
        }
    }

    /// Require a verified bearer credential before anything else runs.
    pub const fn authenticated(mut self) -> Self {
        self.authenticate = true;
        self
    }

    /// Check body and params against a declared schema.
    pub const fn validated(mut self, schema: SchemaId) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Resolve the `userId` parameter into a stored record before the
    /// handler runs.
    pub const fn loads_user(mut self) -> Self {
        self.load_user = true;
        self
    }

    /// Run the declared stages in order. The first failing stage ends the
    /// request; the error type already knows its HTTP shape.
    pub async fn run(
        &self,
        state: &AppState,
        req: PipelineRequest,
        params: HashMap<String, String>,
    ) -> Result<RequestContext, ApiError> {
        let mut ctx = RequestContext::new(req, params);

        if self.authenticate {
            let subject = authenticate::verify_bearer(&state.config.security, &ctx.headers)?;
            tracing::debug!(subject = %subject, "request authenticated");
            ctx.subject = Some(subject);
        }

        if let Some(id) = self.schema {
            ctx.parse_body()?;
            schemas::get(id).check(&ctx)?;
        }

        if self.load_user {
            let user =
                load::load_user(state.store.as_ref(), ctx.param(USER_ID_PARAM)).await?;
            tracing::debug!(user_id = %user.id, "user loaded");
            ctx.user = Some(user);
        }

        Ok(ctx)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
