use crate::config::AppConfig;
use crate::models::{
    AdminCredentials, CreateSessionRequest, LoginResponse, PhaseToggleRequest, ResultsToggleRequest,
    ServiceError, Session, SessionView, TransitionResponse,
};
use crate::services::{phase_controller, results_aggregator};
use crate::utils::session_storage::SessionStore;
use crate::utils::{jwt, password, require_admin};
use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info, warn};
use serde_json::json;

const RECENT_SESSIONS_LIMIT: usize = 5;

fn timer_minutes(body: &PhaseToggleRequest) -> Result<Option<i64>, ServiceError> {
    body.timer_duration_minutes
        .as_ref()
        .map(|input| {
            input.to_minutes().ok_or_else(|| {
                ServiceError::Validation("Timer duration must be a whole number of minutes".to_string())
            })
        })
        .transpose()
}

// "Submission opened with a 15 minute timer", "Voting closed", ...
fn toggle_message(phase: &str, open: bool, minutes: Option<i64>) -> String {
    let mut message = format!("{} {}", phase, if open { "opened" } else { "closed" });
    if let Some(minutes) = minutes.filter(|m| open && *m > 0) {
        message.push_str(&format!(" with a {} minute timer", minutes));
    }
    message
}

fn transition_response(message: String, session: Session) -> HttpResponse {
    HttpResponse::Ok().json(TransitionResponse {
        message,
        session: SessionView::at(session, Utc::now()),
    })
}

// Admin login
#[post("/api/admin/login")]
async fn login(
    config: web::Data<AppConfig>,
    credentials: web::Json<AdminCredentials>,
) -> Result<HttpResponse, ServiceError> {
    info!("🔑 Admin login request for: {}", credentials.username);

    let Some(password_hash) = config.admin_password_hash.as_deref() else {
        warn!("⚠️ Admin login attempted but no admin password is configured");
        return Err(ServiceError::Unauthorized);
    };

    if credentials.username != config.admin_username
        || !password::verify_password(&credentials.password, password_hash)?
    {
        error!("❌ Invalid admin credentials for: {}", credentials.username);
        return Err(ServiceError::Unauthorized);
    }

    let token = jwt::generate_admin_token(&config.admin_username, &config.jwt_secret)?;
    info!("✅ Admin logged in: {}", config.admin_username);

    Ok(HttpResponse::Ok()
        .append_header(("Authorization", format!("Bearer {}", token)))
        .json(LoginResponse { token }))
}

// Create a session, deactivating any other
#[post("/api/admin/session")]
async fn create_session(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    body: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, ServiceError> {
    require_admin(&req)?;
    info!("📝 Creating session: {}", body.session_name);

    let session = phase_controller::create_session(&store, &body.session_name).await?;
    Ok(HttpResponse::Ok().json(json!({ "session": SessionView::at(session, Utc::now()) })))
}

#[patch("/api/admin/session/{id}/end")]
async fn end_session(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    require_admin(&req)?;
    let session_id = path.into_inner();
    info!("🛑 Ending session: {}", session_id);

    let session = phase_controller::end_session(&store, &session_id).await?;
    Ok(transition_response("Session ended.".to_string(), session))
}

// Delete a session and all of its teams and votes
#[delete("/api/admin/session/{id}")]
async fn delete_session(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    require_admin(&req)?;
    let session_id = path.into_inner();
    info!("🗑️ Deleting session: {}", session_id);

    let deleted = phase_controller::delete_session(&store, &session_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Session and all related data deleted.",
        "sessionId": session_id,
        "deletedTeams": deleted.teams,
        "deletedVotes": deleted.votes,
    })))
}

// Open/close submissions with optional timer
#[post("/api/admin/session/{id}/submission")]
async fn toggle_submission(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    path: web::Path<String>,
    body: web::Json<PhaseToggleRequest>,
) -> Result<HttpResponse, ServiceError> {
    require_admin(&req)?;
    let session_id = path.into_inner();
    let minutes = timer_minutes(&body)?;
    info!("🔄 Submission open={} for session: {} (timer: {:?})", body.open, session_id, minutes);

    let session = if body.open {
        phase_controller::open_submission(&store, &session_id, minutes).await?
    } else {
        phase_controller::close_submission(&store, &session_id).await?
    };

    Ok(transition_response(toggle_message("Submission", body.open, minutes), session))
}

// Open/close voting with optional timer
#[post("/api/admin/session/{id}/voting")]
async fn toggle_voting(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    path: web::Path<String>,
    body: web::Json<PhaseToggleRequest>,
) -> Result<HttpResponse, ServiceError> {
    require_admin(&req)?;
    let session_id = path.into_inner();
    let minutes = timer_minutes(&body)?;
    info!("🔄 Voting open={} for session: {} (timer: {:?})", body.open, session_id, minutes);

    let session = if body.open {
        phase_controller::open_voting(&store, &session_id, minutes).await?
    } else {
        phase_controller::close_voting(&store, &session_id).await?
    };

    Ok(transition_response(toggle_message("Voting", body.open, minutes), session))
}

// Publish/unpublish results. Deliberately open to unauthenticated callers.
#[post("/api/admin/session/{id}/results")]
async fn toggle_results(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
    body: web::Json<ResultsToggleRequest>,
) -> Result<HttpResponse, ServiceError> {
    let session_id = path.into_inner();
    info!("📣 Results published={} for session: {}", body.published, session_id);

    let session = if body.published {
        phase_controller::publish_results(&store, &session_id).await?
    } else {
        phase_controller::unpublish_results(&store, &session_id).await?
    };

    let message = format!("Results {}", if body.published { "published" } else { "unpublished" });
    Ok(transition_response(message, session))
}

#[get("/api/admin/sessions/recent")]
async fn recent_sessions(store: web::Data<SessionStore>) -> Result<HttpResponse, ServiceError> {
    let sessions = phase_controller::recent_active_sessions(&store, RECENT_SESSIONS_LIMIT).await?;
    Ok(HttpResponse::Ok().json(json!({ "sessions": sessions })))
}

#[get("/api/admin/sessions/all")]
async fn all_sessions(store: web::Data<SessionStore>) -> Result<HttpResponse, ServiceError> {
    let sessions = phase_controller::list_sessions(&store).await?;
    info!("📋 Listing {} sessions", sessions.len());
    Ok(HttpResponse::Ok().json(json!({ "sessions": sessions })))
}

#[get("/api/admin/session/{id}/details")]
async fn session_details(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let session = phase_controller::get_session(&store, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "session": SessionView::at(session, Utc::now()) })))
}

#[get("/api/admin/sessions/{id}/metrics")]
async fn session_metrics(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    require_admin(&req)?;
    let metrics = results_aggregator::session_metrics(&store, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(metrics))
}

// Register all admin routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(create_session)
        .service(end_session)
        .service(delete_session)
        .service(toggle_submission)
        .service(toggle_voting)
        .service(toggle_results)
        .service(recent_sessions)
        .service(all_sessions)
        .service(session_details)
        .service(session_metrics);
}
