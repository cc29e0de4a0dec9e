use crate::models::{ServiceError, VoteRequest, VoteResponse};
use crate::services::vote_gate;
use crate::utils::session_storage::SessionStore;
use actix_web::{post, web, HttpResponse};
use log::{error, info};

// Voting route
#[post("/api/vote")]
async fn cast_vote(
    store: web::Data<SessionStore>,
    ballot: web::Json<VoteRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!(
        "🗳️ Vote from {} ({}) in session {}",
        ballot.voter_name, ballot.voter_team, ballot.session_id
    );

    let vote = vote_gate::cast_vote(&store, &ballot).await.map_err(|e| {
        error!("❌ Vote rejected: {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(VoteResponse {
        message: "Vote submitted".to_string(),
        vote_id: vote.id,
    }))
}

// Register all vote routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(cast_vote);
}
