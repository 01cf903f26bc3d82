use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use estate_console::catalog::{
    Agent, AgentDraft, AgentId, AgentPatch, CatalogService, DerivedStats, Listing, ListingDraft,
    ListingId, ListingPatch,
};
use estate_console::error::AppError;
use estate_console::remote::{
    object_path, AuthError, AuthProvider, Envelope, MediaError, MediaStore, RemoteStore,
    UserProfile,
};

use crate::infra::AppState;

/// Shared handle to the collaborators every route needs. The catalog service
/// owns the collections, so it sits behind one lock: a single writer per
/// collection, matching the one-controller ownership rule.
pub(crate) struct ConsoleState<S, M, A> {
    pub(crate) catalog: Arc<Mutex<CatalogService<S>>>,
    pub(crate) media: Arc<M>,
    pub(crate) auth: Arc<A>,
}

impl<S, M, A> Clone for ConsoleState<S, M, A> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            media: self.media.clone(),
            auth: self.auth.clone(),
        }
    }
}

pub(crate) fn console_router<S, M, A>(state: ConsoleState<S, M, A>) -> Router
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    Router::new()
        .route("/api/v1/listings", get(list_listings_handler::<S, M, A>))
        .route("/api/v1/listings", post(create_listing_handler::<S, M, A>))
        .route(
            "/api/v1/listings/stats",
            get(listing_stats_handler::<S, M, A>),
        )
        .route("/api/v1/listings/:id", put(edit_listing_handler::<S, M, A>))
        .route(
            "/api/v1/listings/:id",
            delete(delete_listing_handler::<S, M, A>),
        )
        .route(
            "/api/v1/listings/:id/delist",
            post(delist_handler::<S, M, A>),
        )
        .route(
            "/api/v1/listings/:id/relist",
            post(relist_handler::<S, M, A>),
        )
        .route("/api/v1/agents", get(list_agents_handler::<S, M, A>))
        .route("/api/v1/agents", post(create_agent_handler::<S, M, A>))
        .route("/api/v1/agents/:id", put(edit_agent_handler::<S, M, A>))
        .route(
            "/api/v1/agents/:id",
            delete(delete_agent_handler::<S, M, A>),
        )
        .route("/api/v1/media", post(upload_media_handler::<S, M, A>))
        .route("/api/v1/auth/sign-in", post(sign_in_handler::<S, M, A>))
        .route("/api/v1/auth/sign-up", post(sign_up_handler::<S, M, A>))
        .route("/api/v1/session", get(session_handler::<S, M, A>))
        .with_state(state)
}

pub(crate) fn with_console_routes<S, M, A>(state: ConsoleState<S, M, A>) -> Router
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    console_router(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ProjectionName {
    Active,
    Inactive,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingsQuery {
    pub(crate) projection: Option<ProjectionName>,
}

pub(crate) async fn list_listings_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Query(query): Query<ListingsQuery>,
) -> Json<Envelope<Vec<Listing>>>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let catalog = state.catalog.lock().expect("catalog mutex poisoned");
    let rows: Vec<Listing> = match query.projection {
        Some(ProjectionName::Active) => {
            catalog.active_listings().into_iter().cloned().collect()
        }
        Some(ProjectionName::Inactive) => {
            catalog.inactive_listings().into_iter().cloned().collect()
        }
        None => catalog.listings().to_vec(),
    };
    Json(Envelope::ok("listings fetched", rows))
}

pub(crate) async fn listing_stats_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
) -> Json<DerivedStats>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let catalog = state.catalog.lock().expect("catalog mutex poisoned");
    Json(catalog.stats())
}

pub(crate) async fn create_listing_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Json(draft): Json<ListingDraft>,
) -> Result<(StatusCode, Json<Listing>), AppError>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let mut catalog = state.catalog.lock().expect("catalog mutex poisoned");
    let stored = catalog.create_listing(draft)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub(crate) async fn edit_listing_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Path(id): Path<String>,
    Json(patch): Json<ListingPatch>,
) -> Result<Json<Listing>, AppError>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let mut catalog = state.catalog.lock().expect("catalog mutex poisoned");
    let updated = catalog.edit_listing(&ListingId(id), patch)?;
    Ok(Json(updated))
}

pub(crate) async fn delist_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let mut catalog = state.catalog.lock().expect("catalog mutex poisoned");
    let changed = catalog.delist(&ListingId(id))?;
    Ok(Json(json!({
        "success": true,
        "changed": changed,
        "message": if changed { "listing delisted" } else { "listing already inactive" },
    })))
}

pub(crate) async fn relist_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let mut catalog = state.catalog.lock().expect("catalog mutex poisoned");
    let changed = catalog.relist(&ListingId(id))?;
    Ok(Json(json!({
        "success": true,
        "changed": changed,
        "message": if changed { "listing relisted" } else { "listing already active" },
    })))
}

pub(crate) async fn delete_listing_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let mut catalog = state.catalog.lock().expect("catalog mutex poisoned");
    catalog.delete_listing(&ListingId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_agents_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
) -> Json<Envelope<Vec<Agent>>>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let catalog = state.catalog.lock().expect("catalog mutex poisoned");
    Json(Envelope::ok("agents fetched", catalog.agents().to_vec()))
}

pub(crate) async fn create_agent_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Json(draft): Json<AgentDraft>,
) -> Result<(StatusCode, Json<Agent>), AppError>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let mut catalog = state.catalog.lock().expect("catalog mutex poisoned");
    let stored = catalog.create_agent(draft)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub(crate) async fn edit_agent_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Path(id): Path<String>,
    Json(patch): Json<AgentPatch>,
) -> Result<Json<Agent>, AppError>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let mut catalog = state.catalog.lock().expect("catalog mutex poisoned");
    let updated = catalog.edit_agent(&AgentId(id), patch)?;
    Ok(Json(updated))
}

pub(crate) async fn delete_agent_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let mut catalog = state.catalog.lock().expect("catalog mutex poisoned");
    catalog.delete_agent(&AgentId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaUploadRequest {
    pub(crate) file_name: String,
    pub(crate) content: String,
}

pub(crate) async fn upload_media_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Json(request): Json<MediaUploadRequest>,
) -> Response
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let mime = mime_guess::from_path(&request.file_name).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        let payload = json!({
            "success": false,
            "error": format!("'{}' is not an image upload", request.file_name),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    let path = object_path(Utc::now(), &request.file_name);
    match state.media.upload(&path, request.content.as_bytes()) {
        Ok(url) => {
            let payload = json!({ "success": true, "path": path, "url": url });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => media_error_response(err),
    }
}

fn media_error_response(err: MediaError) -> Response {
    let status = match &err {
        MediaError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MediaError::Unavailable(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "success": false, "error": err.to_string() });
    (status, Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CredentialsRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignUpRequest {
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) first_name: String,
    pub(crate) surname: String,
    #[serde(default)]
    pub(crate) image: Option<String>,
}

pub(crate) async fn sign_in_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Json(credentials): Json<CredentialsRequest>,
) -> Response
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    match state.auth.sign_in(&credentials.email, &credentials.password) {
        Ok(user) => {
            let payload = json!({ "success": true, "user": user });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => auth_error_response(err),
    }
}

pub(crate) async fn sign_up_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
    Json(request): Json<SignUpRequest>,
) -> Response
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    let profile = UserProfile {
        first_name: request.first_name,
        surname: request.surname,
        image: request.image,
    };
    match state
        .auth
        .sign_up(&request.email, &request.password, profile)
    {
        Ok(user) => {
            let payload = json!({ "success": true, "user": user });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => auth_error_response(err),
    }
}

pub(crate) async fn session_handler<S, M, A>(
    State(state): State<ConsoleState<S, M, A>>,
) -> Response
where
    S: RemoteStore + 'static,
    M: MediaStore + 'static,
    A: AuthProvider + 'static,
{
    match state.auth.current_user() {
        Ok(Some(user)) => {
            let profile = state.auth.profile(&user.id).ok().flatten();
            let payload = json!({ "user": user, "profile": profile });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok(None) => {
            let payload = json!({ "user": serde_json::Value::Null });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => auth_error_response(err),
    }
}

fn auth_error_response(err: AuthError) -> Response {
    let status = match &err {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::AlreadyRegistered(_) => StatusCode::CONFLICT,
        AuthError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({ "success": false, "error": err.to_string() });
    (status, Json(payload)).into_response()
}
