// src/services/submission_gate.rs
use crate::models::{ServiceError, Team, TeamSubmission};
use crate::utils::session_storage::SessionStore;
use chrono::Utc;
use log::info;
use uuid::Uuid;

// Required fields after trimming and member normalisation
struct ValidSubmission {
    team_name: String,
    team_members: Vec<String>,
    solution: String,
}

// Trimmed text, with blank strings treated as absent
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn validate(submission: &TeamSubmission) -> Result<ValidSubmission, ServiceError> {
    let (Some(team_name), Some(members), Some(solution)) = (
        non_blank(&submission.team_name),
        submission.team_members.as_ref(),
        non_blank(&submission.solution),
    ) else {
        return Err(ServiceError::Validation("Missing required fields".to_string()));
    };

    let team_members = members.normalize();
    if team_members.is_empty() {
        return Err(ServiceError::Validation(
            "Team members must be a non-empty list".to_string(),
        ));
    }

    Ok(ValidSubmission { team_name, team_members, solution })
}

// Register a team in the active session. The target is always the session that
// is active when the update runs, never one picked by the client.
pub async fn submit_team(store: &SessionStore, submission: TeamSubmission) -> Result<Team, ServiceError> {
    let validated = validate(&submission);

    let team = store
        .update(|data| {
            let session = data.active_session().ok_or_else(|| {
                ServiceError::PhaseClosed(
                    "No active session found. Please ask the admin to create one.".to_string(),
                )
            })?;

            if let Some(requested) = submission.session_id.as_deref() {
                if !requested.is_empty() && requested != session.id {
                    return Err(ServiceError::PhaseClosed(
                        "This session is no longer accepting submissions".to_string(),
                    ));
                }
            }
            if !session.submission_open {
                return Err(ServiceError::PhaseClosed("Submissions are closed".to_string()));
            }

            let fields = validated?;
            let team = Team {
                id: Uuid::new_v4().to_string(),
                session_id: session.id.clone(),
                team_name: fields.team_name,
                team_members: fields.team_members,
                persona_card: non_blank(&submission.persona_card),
                mdb_card_used: non_blank(&submission.mdb_card_used),
                ai_card_used: non_blank(&submission.ai_card_used),
                wild_card_used: non_blank(&submission.wild_card_used),
                product_title: non_blank(&submission.product_title),
                solution: fields.solution,
                total_votes: 0,
                submission_timestamp: Utc::now(),
            };
            data.teams.push(team.clone());
            Ok(team)
        })
        .await?;

    info!("✅ Team submitted: {} ({}) in session {}", team.team_name, team.id, team.session_id);
    Ok(team)
}

pub async fn list_teams(store: &SessionStore, session_id: &str) -> Result<Vec<Team>, ServiceError> {
    store
        .read(|data| {
            data.session(session_id)
                .map(|_| data.teams_for_session(session_id))
        })
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Session not found: {}", session_id)))
}
