// src/routes/session_routes.rs
// Read-only routes polled by team, voter and results pages.
use crate::models::{ServiceError, SessionView, TeamsResponse};
use crate::services::{phase_controller, results_aggregator, submission_gate};
use crate::utils::session_storage::SessionStore;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::debug;
use serde_json::json;

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().body("Icebreaker backend is running!")
}

// The session teams should submit to right now
#[get("/api/session/active")]
async fn get_active_session(store: web::Data<SessionStore>) -> Result<HttpResponse, ServiceError> {
    let session = phase_controller::active_session(&store).await?;
    Ok(HttpResponse::Ok().json(json!({ "session": SessionView::at(session, Utc::now()) })))
}

// Get session info by ID
#[get("/api/session/{id}")]
async fn get_session(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let session_id = path.into_inner();
    debug!("Polling session: {}", session_id);

    let session = phase_controller::get_session(&store, &session_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "session": SessionView::at(session, Utc::now()) })))
}

// List all teams in a session
#[get("/api/session/{id}/teams")]
async fn get_teams(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let teams = submission_gate::list_teams(&store, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TeamsResponse { teams }))
}

// Results for a session
#[get("/api/session/{id}/results")]
async fn get_results(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let results = results_aggregator::compute_results(&store, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(results))
}

// "/api/session/active" must be registered before "/api/session/{id}"
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(get_active_session)
        .service(get_session)
        .service(get_teams)
        .service(get_results);
}
