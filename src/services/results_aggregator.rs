// src/services/results_aggregator.rs
use crate::models::{ServiceError, SessionMetrics, SessionResults, Team};
use crate::utils::session_storage::SessionStore;

// Order teams by votes, highest first. The sort is stable, so ties keep
// submission order.
pub fn rank_teams(mut teams: Vec<Team>) -> Vec<Team> {
    teams.sort_by(|a, b| b.total_votes.cmp(&a.total_votes));
    teams
}

// Every team tied at the top, or nobody when no votes were cast
pub fn winners(ranked: &[Team]) -> Vec<Team> {
    let max_votes = ranked.iter().map(|t| t.total_votes).max().unwrap_or(0);
    if max_votes == 0 {
        return Vec::new();
    }
    ranked
        .iter()
        .filter(|t| t.total_votes == max_votes)
        .cloned()
        .collect()
}

pub async fn compute_results(store: &SessionStore, session_id: &str) -> Result<SessionResults, ServiceError> {
    let (results_published, teams) = store
        .read(|data| {
            data.session(session_id)
                .map(|s| (s.results_published, data.teams_for_session(session_id)))
        })
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Session not found: {}", session_id)))?;

    let teams = rank_teams(teams);
    let winners = winners(&teams);

    Ok(SessionResults {
        session_id: session_id.to_string(),
        results_published,
        teams,
        winners,
    })
}

pub async fn session_metrics(store: &SessionStore, session_id: &str) -> Result<SessionMetrics, ServiceError> {
    store
        .read(|data| {
            data.session(session_id).map(|_| SessionMetrics {
                submitted_teams_count: data.teams_for_session(session_id).len(),
                total_votes_cast: data.votes_for_session(session_id),
            })
        })
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Session not found: {}", session_id)))
}
