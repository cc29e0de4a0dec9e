use crate::models::{ServiceError, SubmissionResponse, TeamSubmission};
use crate::services::submission_gate;
use crate::utils::session_storage::SessionStore;
use actix_web::{post, web, HttpResponse};
use log::{error, info};

// Team submission route, always targets the active session
#[post("/api/team/submit")]
async fn submit_team(
    store: web::Data<SessionStore>,
    submission: web::Json<TeamSubmission>,
) -> Result<HttpResponse, ServiceError> {
    let submission = submission.into_inner();
    info!("📝 Submission from team: {:?}", submission.team_name);

    let team = submission_gate::submit_team(&store, submission).await.map_err(|e| {
        error!("❌ Submission rejected: {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(SubmissionResponse {
        message: "Submission received".to_string(),
        team,
    }))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_team);
}
