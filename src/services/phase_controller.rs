// src/services/phase_controller.rs
//
// Session lifecycle: pending -> submitting -> voting -> published -> ended.
// Submission, voting and results are independent flags; the rules below keep
// them consistent. Timers are advisory and never close a phase by themselves.

use crate::models::{ServiceError, Session, MAX_TIMER_MINUTES};
use crate::utils::session_storage::SessionStore;
use chrono::{DateTime, Utc};
use log::{debug, info};

// Records removed by a cascading session delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedCounts {
    pub teams: usize,
    pub votes: usize,
}

fn session_not_found(session_id: &str) -> ServiceError {
    ServiceError::NotFound(format!("Session not found: {}", session_id))
}

fn validate_timer(duration_minutes: Option<i64>) -> Result<Option<i64>, ServiceError> {
    match duration_minutes {
        Some(minutes) if minutes > MAX_TIMER_MINUTES => Err(ServiceError::Validation(format!(
            "Timer duration must be at most {} minutes",
            MAX_TIMER_MINUTES
        ))),
        other => Ok(other),
    }
}

// Apply one transition to a session inside a single store update
async fn transition<F>(store: &SessionStore, session_id: &str, apply: F) -> Result<Session, ServiceError>
where
    F: FnOnce(&mut Session, DateTime<Utc>) -> Result<(), ServiceError>,
{
    store
        .update(|data| {
            let session = data
                .session_mut(session_id)
                .ok_or_else(|| session_not_found(session_id))?;
            apply(session, Utc::now())?;
            Ok(session.clone())
        })
        .await
}

// Create a new active session, deactivating every other one in the same update
pub async fn create_session(store: &SessionStore, name: &str) -> Result<Session, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("Session name is required".to_string()));
    }

    let session = store
        .update(|data| {
            let mut deactivated = 0;
            for existing in data.sessions.iter_mut().filter(|s| s.is_active) {
                existing.is_active = false;
                deactivated += 1;
            }
            debug!("Deactivated {} previously active sessions", deactivated);

            let session = Session::new(name.to_string(), Utc::now());
            data.sessions.push(session.clone());
            Ok(session)
        })
        .await?;

    info!("✅ Session created: {} ({})", session.name, session.id);
    Ok(session)
}

pub async fn open_submission(
    store: &SessionStore,
    session_id: &str,
    duration_minutes: Option<i64>,
) -> Result<Session, ServiceError> {
    let duration_minutes = validate_timer(duration_minutes)?;
    transition(store, session_id, |session, now| {
        if !session.is_active {
            return Err(ServiceError::PhaseClosed("Session has ended".to_string()));
        }
        if session.voting_open {
            return Err(ServiceError::PhaseClosed(
                "Voting is open; close voting before reopening submissions".to_string(),
            ));
        }
        session.submission_open = true;
        session.submission_timer.arm(duration_minutes, now);
        Ok(())
    })
    .await
}

pub async fn close_submission(store: &SessionStore, session_id: &str) -> Result<Session, ServiceError> {
    transition(store, session_id, |session, _| {
        session.submission_open = false;
        session.submission_timer.clear();
        Ok(())
    })
    .await
}

// Opening voting always closes submission
pub async fn open_voting(
    store: &SessionStore,
    session_id: &str,
    duration_minutes: Option<i64>,
) -> Result<Session, ServiceError> {
    let duration_minutes = validate_timer(duration_minutes)?;
    transition(store, session_id, |session, now| {
        if !session.is_active {
            return Err(ServiceError::PhaseClosed("Session has ended".to_string()));
        }
        session.submission_open = false;
        session.submission_timer.clear();
        session.voting_open = true;
        session.voting_timer.arm(duration_minutes, now);
        Ok(())
    })
    .await
}

pub async fn close_voting(store: &SessionStore, session_id: &str) -> Result<Session, ServiceError> {
    transition(store, session_id, |session, _| {
        session.voting_open = false;
        session.voting_timer.clear();
        Ok(())
    })
    .await
}

// Not gated by is_active: results may be published after the event ends
pub async fn set_results_published(
    store: &SessionStore,
    session_id: &str,
    published: bool,
) -> Result<Session, ServiceError> {
    transition(store, session_id, |session, _| {
        session.results_published = published;
        Ok(())
    })
    .await
}

pub async fn publish_results(store: &SessionStore, session_id: &str) -> Result<Session, ServiceError> {
    set_results_published(store, session_id, true).await
}

pub async fn unpublish_results(store: &SessionStore, session_id: &str) -> Result<Session, ServiceError> {
    set_results_published(store, session_id, false).await
}

// Phase flags are left as they were so the results view keeps working
pub async fn end_session(store: &SessionStore, session_id: &str) -> Result<Session, ServiceError> {
    let session = transition(store, session_id, |session, _| {
        session.is_active = false;
        Ok(())
    })
    .await?;

    info!("✅ Session ended: {}", session_id);
    Ok(session)
}

// Remove a session together with its teams and votes
pub async fn delete_session(store: &SessionStore, session_id: &str) -> Result<DeletedCounts, ServiceError> {
    let counts = store
        .update(|data| {
            let before = data.sessions.len();
            data.sessions.retain(|s| s.id != session_id);
            if data.sessions.len() == before {
                return Err(session_not_found(session_id));
            }

            let teams_before = data.teams.len();
            data.teams.retain(|t| t.session_id != session_id);
            let votes_before = data.votes.len();
            data.votes.retain(|v| v.session_id != session_id);

            Ok(DeletedCounts {
                teams: teams_before - data.teams.len(),
                votes: votes_before - data.votes.len(),
            })
        })
        .await?;

    info!(
        "🗑️ Deleted session {} with {} teams and {} votes",
        session_id, counts.teams, counts.votes
    );
    Ok(counts)
}

pub async fn get_session(store: &SessionStore, session_id: &str) -> Result<Session, ServiceError> {
    store
        .read(|data| data.session(session_id).cloned())
        .await?
        .ok_or_else(|| session_not_found(session_id))
}

pub async fn active_session(store: &SessionStore) -> Result<Session, ServiceError> {
    store
        .read(|data| data.active_session().cloned())
        .await?
        .ok_or_else(|| ServiceError::NotFound("No active session".to_string()))
}

// All sessions, newest first
pub async fn list_sessions(store: &SessionStore) -> Result<Vec<Session>, ServiceError> {
    let mut sessions = store.read(|data| data.sessions.clone()).await?;
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(sessions)
}

// Most recent active sessions, newest first
pub async fn recent_active_sessions(store: &SessionStore, limit: usize) -> Result<Vec<Session>, ServiceError> {
    let sessions = list_sessions(store).await?;
    Ok(sessions
        .into_iter()
        .filter(|s| s.is_active)
        .take(limit)
        .collect())
}
