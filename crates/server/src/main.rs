// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    extract::{Query, Request, State as AxumState},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

use dealroom_api::{
    add_comment, create_data_room, create_invitation, create_operator, create_organization,
    create_task, create_user, delete_file, disable_operator, download_file, get_content,
    grant_permission, list_activity, list_merge_logs, list_notifications, list_operators,
    list_invitations, list_versions, login, logout, perform_merge, restore_version,
    revert_merge, revoke_invitation, run_reminder_sweep, run_revert_sweep, save_as_version,
    save_content, send_message, set_file_restriction, update_file_status, upload_file, ApiError,
};
use dealroom_persistence::Persistence;

mod session;

use session::{bearer_token, SessionOperator};

/// DealRoom Server - HTTP server for the guest data room system.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an
    /// in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Interval in seconds between scheduled sweep runs (merge reverts,
    /// task reminders, session cleanup).
    #[arg(long, default_value_t = 300)]
    sweep_interval: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer, serialized behind a mutex.
    pub persistence: Arc<Mutex<Persistence>>,
}

/// The JSON error envelope: `{ "error": string }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. }
            | ApiError::DomainRuleViolation { .. }
            | ApiError::PasswordPolicyViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Headers the permissive CORS policy allows on preflighted requests.
const CORS_ALLOWED_HEADERS: &str = "authorization, content-type, apikey, x-client-info";

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static(CORS_ALLOWED_HEADERS),
    );
}

/// Answers `OPTIONS` preflights and stamps CORS headers on every
/// response.
async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response: Response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response: Response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

// ============================================================================
// Guest handlers
// ============================================================================

async fn handle_guest_verify(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::VerifyGuestRequest>,
) -> Result<Json<dealroom_api::VerifyGuestResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(dealroom_api::GuestAccess::verify_guest(
        &mut persistence,
        &req,
    )?))
}

async fn handle_guest_sign_nda(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::SignNdaRequest>,
) -> Result<Json<dealroom_api::SignNdaResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(dealroom_api::GuestAccess::sign_nda(
        &mut persistence,
        &req,
    )?))
}

async fn handle_guest_upload(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::UploadFileRequest>,
) -> Result<Json<dealroom_api::UploadFileResponse>, HttpError> {
    info!(data_room_id = req.data_room_id, "Handling guest upload");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(upload_file(&mut persistence, &req)?))
}

async fn handle_guest_update_status(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::UpdateFileStatusRequest>,
) -> Result<Json<dealroom_api::UpdateFileStatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_file_status(&mut persistence, &req)?))
}

async fn handle_guest_comment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::AddCommentRequest>,
) -> Result<Json<dealroom_api::AddCommentResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(add_comment(&mut persistence, &req)?))
}

async fn handle_guest_get_content(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::GetContentRequest>,
) -> Result<Json<dealroom_api::GetContentResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_content(&mut persistence, &req)?))
}

async fn handle_guest_save_content(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::SaveContentRequest>,
) -> Result<Json<dealroom_api::SaveContentResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(save_content(&mut persistence, &req)?))
}

async fn handle_guest_download(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::DownloadFileRequest>,
) -> Result<Json<dealroom_api::DownloadFileResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(download_file(&mut persistence, &req)?))
}

async fn handle_guest_list_versions(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::ListVersionsRequest>,
) -> Result<Json<dealroom_api::ListVersionsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_versions(&mut persistence, &req)?))
}

async fn handle_guest_save_as_version(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::SaveAsVersionRequest>,
) -> Result<Json<dealroom_api::SaveAsVersionResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(save_as_version(&mut persistence, &req)?))
}

async fn handle_guest_restore_version(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::RestoreVersionRequest>,
) -> Result<Json<dealroom_api::RestoreVersionResponse>, HttpError> {
    info!(version_id = req.version_id, "Handling guest version restore");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(restore_version(&mut persistence, &req)?))
}

async fn handle_guest_message(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::GuestMessageRequest>,
) -> Result<Json<dealroom_api::GuestMessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(send_message(&mut persistence, &req)?))
}

// ============================================================================
// Operator handlers
// ============================================================================

async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<dealroom_api::LoginRequest>,
) -> Result<Json<dealroom_api::LoginResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling login");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(login(&mut persistence, &req)?))
}

async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<dealroom_api::AckResponse>, HttpError> {
    let token: String = bearer_token(&headers).map_err(|_| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: String::from("Missing or invalid Authorization header"),
    })?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(logout(&mut persistence, &token)?))
}

/// Operator creation allows a missing session only while the system has
/// no operators at all (initial bootstrap).
async fn handle_create_operator(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<dealroom_api::CreateOperatorRequest>,
) -> Result<Json<dealroom_api::CreateOperatorResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;

    let actor = match bearer_token(&headers) {
        Ok(token) => Some(
            dealroom_api::AuthenticationService::validate_session(&mut persistence, &token)
                .map_err(ApiError::from)?
                .0,
        ),
        Err(_) => None,
    };

    Ok(Json(create_operator(&mut persistence, actor.as_ref(), &req)?))
}

async fn handle_list_operators(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
) -> Result<Json<dealroom_api::ListOperatorsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_operators(&mut persistence, &actor)?))
}

async fn handle_disable_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<dealroom_api::DisableOperatorRequest>,
) -> Result<Json<dealroom_api::AckResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(disable_operator(
        &mut persistence,
        &actor,
        &operator,
        &req,
    )?))
}

async fn handle_create_organization(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::CreateOrganizationRequest>,
) -> Result<Json<dealroom_api::CreateOrganizationResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_organization(&mut persistence, &actor, &req)?))
}

async fn handle_create_data_room(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::CreateDataRoomRequest>,
) -> Result<Json<dealroom_api::CreateDataRoomResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_data_room(&mut persistence, &actor, &req)?))
}

async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::CreateUserRequest>,
) -> Result<Json<dealroom_api::CreateUserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_user(&mut persistence, &actor, &req)?))
}

async fn handle_create_task(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::CreateTaskRequest>,
) -> Result<Json<dealroom_api::CreateTaskResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_task(&mut persistence, &actor, &req)?))
}

async fn handle_create_invitation(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::CreateInvitationRequest>,
) -> Result<Json<dealroom_api::CreateInvitationResponse>, HttpError> {
    info!(data_room_id = req.data_room_id, "Handling guest invitation");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_invitation(&mut persistence, &actor, &req)?))
}

/// Query parameters for the invitation listing.
#[derive(Debug, Deserialize)]
struct InvitationsQuery {
    data_room_id: i64,
}

async fn handle_list_invitations(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Query(query): Query<InvitationsQuery>,
) -> Result<Json<dealroom_api::ListInvitationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_invitations(
        &mut persistence,
        &actor,
        query.data_room_id,
    )?))
}

async fn handle_revoke_invitation(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::RevokeInvitationRequest>,
) -> Result<Json<dealroom_api::AckResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(revoke_invitation(&mut persistence, &actor, &req)?))
}

async fn handle_restrict_file(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::SetFileRestrictionRequest>,
) -> Result<Json<dealroom_api::AckResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(set_file_restriction(&mut persistence, &actor, &req)?))
}

async fn handle_grant_permission(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::GrantPermissionRequest>,
) -> Result<Json<dealroom_api::AckResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(grant_permission(&mut persistence, &actor, &req)?))
}

async fn handle_delete_file(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::DeleteFileRequest>,
) -> Result<Json<dealroom_api::AckResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(delete_file(&mut persistence, &actor, &req)?))
}

/// Query parameters for the activity feed.
#[derive(Debug, Deserialize)]
struct ActivityQuery {
    data_room_id: i64,
}

async fn handle_activity(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<dealroom_api::ActivityFeedResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_activity(
        &mut persistence,
        &actor,
        query.data_room_id,
    )?))
}

async fn handle_perform_merge(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<dealroom_api::PerformMergeRequest>,
) -> Result<Json<dealroom_api::PerformMergeResponse>, HttpError> {
    info!(
        source_user_id = req.source_user_id,
        target_user_id = req.target_user_id,
        "Handling merge request"
    );
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(perform_merge(
        &mut persistence,
        &actor,
        &operator,
        &req,
    )?))
}

async fn handle_revert_merge(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<dealroom_api::RevertMergeRequest>,
) -> Result<Json<dealroom_api::RevertMergeResponse>, HttpError> {
    info!(merge_log_id = req.merge_log_id, "Handling manual revert");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(revert_merge(&mut persistence, &actor, &req)?))
}

/// Query parameters for the merge log listing.
#[derive(Debug, Deserialize)]
struct MergeLogsQuery {
    organization_id: i64,
}

async fn handle_merge_logs(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Query(query): Query<MergeLogsQuery>,
) -> Result<Json<dealroom_api::ListMergeLogsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_merge_logs(
        &mut persistence,
        &actor,
        query.organization_id,
    )?))
}

async fn handle_notifications(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, operator): SessionOperator,
) -> Result<Json<dealroom_api::ListNotificationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_notifications(&mut persistence, &operator)?))
}

// ============================================================================
// Router & scheduled sweeps
// ============================================================================

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/guest/verify", post(handle_guest_verify))
        .route("/guest/nda/sign", post(handle_guest_sign_nda))
        .route("/guest/files/upload", post(handle_guest_upload))
        .route("/guest/files/status", post(handle_guest_update_status))
        .route("/guest/files/comment", post(handle_guest_comment))
        .route("/guest/files/content", post(handle_guest_get_content))
        .route("/guest/files/content/save", post(handle_guest_save_content))
        .route("/guest/files/download", post(handle_guest_download))
        .route("/guest/files/versions", post(handle_guest_list_versions))
        .route(
            "/guest/files/versions/save",
            post(handle_guest_save_as_version),
        )
        .route(
            "/guest/files/versions/restore",
            post(handle_guest_restore_version),
        )
        .route("/guest/messages", post(handle_guest_message))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/operators", post(handle_create_operator))
        .route("/operators", get(handle_list_operators))
        .route("/operators/disable", post(handle_disable_operator))
        .route("/organizations", post(handle_create_organization))
        .route("/rooms", post(handle_create_data_room))
        .route("/users", post(handle_create_user))
        .route("/tasks", post(handle_create_task))
        .route("/invitations", post(handle_create_invitation))
        .route("/invitations", get(handle_list_invitations))
        .route("/invitations/revoke", post(handle_revoke_invitation))
        .route("/files/restrict", post(handle_restrict_file))
        .route("/files/grant", post(handle_grant_permission))
        .route("/files/delete", post(handle_delete_file))
        .route("/activity", get(handle_activity))
        .route("/merge", post(handle_perform_merge))
        .route("/merge/revert", post(handle_revert_merge))
        .route("/merge/logs", get(handle_merge_logs))
        .route("/notifications", get(handle_notifications))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(app_state)
}

/// Runs the scheduled sweeps forever at the configured interval.
///
/// Per-entry failures are isolated inside the sweeps themselves; a
/// sweep-level failure is logged and the next tick tries again.
async fn sweep_loop(app_state: AppState, interval_secs: u64) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    // The first tick fires immediately; skip it so startup stays quiet.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let mut persistence = app_state.persistence.lock().await;

        if let Err(e) = run_revert_sweep(&mut persistence) {
            error!(error = %e, "Revert sweep failed");
        }
        if let Err(e) = run_reminder_sweep(&mut persistence) {
            error!(error = %e, "Reminder sweep failed");
        }
        if let Err(e) = persistence.delete_expired_sessions() {
            error!(error = %e, "Session cleanup failed");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing DealRoom Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    tokio::spawn(sweep_loop(app_state.clone(), args.sweep_interval));

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode as HttpStatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    async fn send_json(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let mut builder = HttpRequest::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    /// Creates the initial admin through the API and returns a session
    /// token.
    async fn bootstrap_admin(app: &Router) -> String {
        let (status, _) = send_json(
            app,
            "POST",
            "/operators",
            None,
            Some(json!({
                "login_name": "admin",
                "display_name": "Admin One",
                "password": "Adm1n-Passw0rd!",
                "password_confirmation": "Adm1n-Passw0rd!",
                "role": "Admin",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send_json(
            app,
            "POST",
            "/login",
            None,
            Some(json!({
                "login_name": "admin",
                "password": "Adm1n-Passw0rd!",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["session_token"].as_str().unwrap().to_string()
    }

    /// Creates an org, a room, and an invitation for alice@example.com
    /// with password Secret1 expiring in one hour; returns the room id.
    async fn seed_guest_room(app: &Router, token: &str) -> i64 {
        let (status, body) = send_json(
            app,
            "POST",
            "/organizations",
            Some(token),
            Some(json!({"name": "Acme Holdings"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let organization_id: i64 = body["organization_id"].as_i64().unwrap();

        let (status, body) = send_json(
            app,
            "POST",
            "/rooms",
            Some(token),
            Some(json!({"organization_id": organization_id, "name": "Series B diligence"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let data_room_id: i64 = body["data_room_id"].as_i64().unwrap();

        let expires_at: String = dealroom_domain::render_timestamp(
            time::OffsetDateTime::now_utc() + time::Duration::hours(1),
        )
        .unwrap();
        let (status, _) = send_json(
            app,
            "POST",
            "/invitations",
            Some(token),
            Some(json!({
                "data_room_id": data_room_id,
                "email": "alice@example.com",
                "guest_name": "Alice Guest",
                "password": "Secret1",
                "expires_at": expires_at,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        data_room_id
    }

    #[tokio::test]
    async fn test_options_preflight_gets_permissive_cors_headers() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("OPTIONS")
                    .uri("/guest/verify")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers.get("Access-Control-Allow-Origin").unwrap(), "*");
        assert_eq!(
            headers.get("Access-Control-Allow-Headers").unwrap(),
            CORS_ALLOWED_HEADERS
        );
    }

    #[tokio::test]
    async fn test_regular_responses_carry_cors_headers() {
        let app: Router = build_router(create_test_app_state());

        let (_, _) = send_json(&app, "POST", "/login", None, Some(json!({}))).await;
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/notifications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_guest_flow_end_to_end() {
        let app: Router = build_router(create_test_app_state());
        let token: String = bootstrap_admin(&app).await;
        let data_room_id: i64 = seed_guest_room(&app, &token).await;

        // Case-insensitive credentials, with `token` as the password
        // alias.
        let (status, body) = send_json(
            &app,
            "POST",
            "/guest/verify",
            None,
            Some(json!({
                "email": "Alice@Example.com",
                "token": "secret1",
                "data_room_id": data_room_id,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["data_room_id"].as_i64().unwrap(), data_room_id);

        // Wrong password: 401 with the JSON error envelope.
        let (status, body) = send_json(
            &app,
            "POST",
            "/guest/verify",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret2",
                "data_room_id": data_room_id,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().contains("Invalid password"));

        // Upload a file.
        let (status, body) = send_json(
            &app,
            "POST",
            "/guest/files/upload",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "data_room_id": data_room_id,
                "name": "report.pdf",
                "size_bytes": 2048,
                "mime_type": "application/pdf",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let file_id: i64 = body["file_id"].as_i64().unwrap();
        assert_eq!(body["version"].as_i64().unwrap(), 1);

        // A status outside the fixed vocabulary is a 400.
        let (status, _) = send_json(
            &app,
            "POST",
            "/guest/files/status",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "file_id": file_id,
                "status": "approved",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);

        // A valid one succeeds.
        let (status, _) = send_json(
            &app,
            "POST",
            "/guest/files/status",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "file_id": file_id,
                "status": "in_review",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        // Save as version, then restore version 1.
        let (status, _) = send_json(
            &app,
            "POST",
            "/guest/files/versions/save",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "file_id": file_id,
                "size_bytes": 4096,
                "mime_type": "application/pdf",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send_json(
            &app,
            "POST",
            "/guest/files/versions/restore",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "version_id": file_id,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["new_version"].as_i64().unwrap(), 3);

        let (status, body) = send_json(
            &app,
            "POST",
            "/guest/files/versions",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "file_id": file_id,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["versions"].as_array().unwrap().len(), 3);

        // The activity feed saw the guest actions.
        let (status, body) = send_json(
            &app,
            "GET",
            &format!("/activity?data_room_id={data_room_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let actions: Vec<String> = body["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["action"].as_str().unwrap().to_string())
            .collect();
        assert!(actions.contains(&String::from("file_upload")));
        assert!(actions.contains(&String::from("status_change")));
        assert!(actions.contains(&String::from("version_restore")));
    }

    #[tokio::test]
    async fn test_admin_endpoints_require_a_session() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send_json(
            &app,
            "POST",
            "/organizations",
            None,
            Some(json!({"name": "Acme"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());

        let (status, _) = send_json(
            &app,
            "POST",
            "/organizations",
            Some("not-a-real-token"),
            Some(json!({"name": "Acme"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_second_operator_requires_admin_session() {
        let app: Router = build_router(create_test_app_state());
        let _token: String = bootstrap_admin(&app).await;

        let (status, _) = send_json(
            &app,
            "POST",
            "/operators",
            None,
            Some(json!({
                "login_name": "intruder",
                "display_name": "Intruder",
                "password": "Str0ng-Enough!",
                "password_confirmation": "Str0ng-Enough!",
                "role": "Admin",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invitation_to_unknown_room_is_not_found() {
        let app: Router = build_router(create_test_app_state());
        let token: String = bootstrap_admin(&app).await;

        let expires_at: String = dealroom_domain::render_timestamp(
            time::OffsetDateTime::now_utc() + time::Duration::hours(1),
        )
        .unwrap();
        let (status, _) = send_json(
            &app,
            "POST",
            "/invitations",
            Some(&token),
            Some(json!({
                "data_room_id": 999,
                "email": "alice@example.com",
                "password": "Secret1",
                "expires_at": expires_at,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_restricted_file_permissions_over_http() {
        let app: Router = build_router(create_test_app_state());
        let token: String = bootstrap_admin(&app).await;
        let data_room_id: i64 = seed_guest_room(&app, &token).await;

        let (_, body) = send_json(
            &app,
            "POST",
            "/guest/files/upload",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "data_room_id": data_room_id,
                "name": "sensitive.docx",
                "size_bytes": 1024,
                "mime_type": "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            })),
        )
        .await;
        let file_id: i64 = body["file_id"].as_i64().unwrap();

        let (status, _) = send_json(
            &app,
            "POST",
            "/files/restrict",
            Some(&token),
            Some(json!({"file_id": file_id, "restricted": true})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        // No grant yet: 403.
        let (status, _) = send_json(
            &app,
            "POST",
            "/guest/files/content",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "file_id": file_id,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);

        // Grant view: reads work, content saves stay forbidden.
        let (status, _) = send_json(
            &app,
            "POST",
            "/files/grant",
            Some(&token),
            Some(json!({"file_id": file_id, "invitation_id": 1, "level": "view"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send_json(
            &app,
            "POST",
            "/guest/files/content",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "file_id": file_id,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send_json(
            &app,
            "POST",
            "/guest/files/content/save",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "Secret1",
                "file_id": file_id,
                "body": "attempted edit",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_merge_flow_over_http() {
        let app: Router = build_router(create_test_app_state());
        let token: String = bootstrap_admin(&app).await;

        let (_, body) = send_json(
            &app,
            "POST",
            "/organizations",
            Some(&token),
            Some(json!({"name": "Acme Holdings"})),
        )
        .await;
        let organization_id: i64 = body["organization_id"].as_i64().unwrap();

        let (_, body) = send_json(
            &app,
            "POST",
            "/users",
            Some(&token),
            Some(json!({
                "organization_id": organization_id,
                "display_name": "Sam Source",
                "email": "sam@acme.test",
            })),
        )
        .await;
        let source_user_id: i64 = body["user_id"].as_i64().unwrap();

        let (_, body) = send_json(
            &app,
            "POST",
            "/users",
            Some(&token),
            Some(json!({
                "organization_id": organization_id,
                "display_name": "Tara Target",
                "email": "tara@acme.test",
            })),
        )
        .await;
        let target_user_id: i64 = body["user_id"].as_i64().unwrap();

        let (_, body) = send_json(
            &app,
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({
                "organization_id": organization_id,
                "title": "Close the books",
                "project": "Q3 close",
                "due_date": "2026-09-30",
                "priority": "high",
                "assignee_user_id": source_user_id,
            })),
        )
        .await;
        let task_id: i64 = body["task_id"].as_i64().unwrap();

        let (status, body) = send_json(
            &app,
            "POST",
            "/merge",
            Some(&token),
            Some(json!({
                "organization_id": organization_id,
                "source_user_id": source_user_id,
                "target_user_id": target_user_id,
                "task_ids": [task_id],
                "merge_type": "temporary",
                "temporary_end_date": "2026-12-31",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let merge_log_id: i64 = body["merge_log_id"].as_i64().unwrap();
        assert_eq!(body["status"].as_str().unwrap(), "pending_revert");

        let (status, body) = send_json(
            &app,
            "POST",
            "/merge/revert",
            Some(&token),
            Some(json!({"merge_log_id": merge_log_id})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["status"].as_str().unwrap(), "reverted");
        assert_eq!(
            body["reverted_task_ids"].as_array().unwrap()[0]
                .as_i64()
                .unwrap(),
            task_id
        );

        let (status, body) = send_json(
            &app,
            "GET",
            &format!("/merge/logs?organization_id={organization_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["merge_logs"].as_array().unwrap().len(), 1);
        assert_eq!(
            body["merge_logs"][0]["status"].as_str().unwrap(),
            "reverted"
        );
    }

    #[tokio::test]
    async fn test_nda_signing_is_idempotent_over_http() {
        let app: Router = build_router(create_test_app_state());
        let token: String = bootstrap_admin(&app).await;
        let data_room_id: i64 = seed_guest_room(&app, &token).await;

        let request_body = json!({
            "email": "alice@example.com",
            "password": "Secret1",
            "data_room_id": data_room_id,
        });

        let (status, body) = send_json(
            &app,
            "POST",
            "/guest/nda/sign",
            None,
            Some(request_body.clone()),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert!(!body["already_signed"].as_bool().unwrap());

        // Already-signed is a 200, not an error.
        let (status, body) =
            send_json(&app, "POST", "/guest/nda/sign", None, Some(request_body)).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert!(body["already_signed"].as_bool().unwrap());
    }
}
