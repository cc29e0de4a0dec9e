// src/models/session.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// Longest timer an admin may set on a phase (one day)
pub const MAX_TIMER_MINUTES: i64 = 24 * 60;

// Advisory deadline for a phase. Clients count down from `end_time`;
// the server never closes a phase on its own when it lapses.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTimer {
    pub enabled: bool,
    pub duration_minutes: Option<i64>,
    pub end_time: Option<DateTime<Utc>>,
}

impl PhaseTimer {
    // Start the timer when a positive duration is given, otherwise leave it open-ended
    pub fn arm(&mut self, duration_minutes: Option<i64>, now: DateTime<Utc>) {
        match duration_minutes {
            Some(minutes) if minutes > 0 => {
                self.enabled = true;
                self.duration_minutes = Some(minutes);
                self.end_time = Some(now + Duration::minutes(minutes));
            }
            _ => self.clear(),
        }
    }

    pub fn clear(&mut self) {
        self.enabled = false;
        self.end_time = None;
    }

    // Whole seconds left before the deadline; None when no timer is running
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        if !self.enabled {
            return None;
        }
        self.end_time
            .map(|end| (end - now).num_seconds().max(0))
    }

    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        matches!(self.remaining_seconds(now), Some(0))
    }
}

// Lifecycle position derived from the phase flags
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Pending,
    Submitting,
    Voting,
    Published,
    Ended,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(rename = "sessionName")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub submission_open: bool,
    pub voting_open: bool,
    pub results_published: bool,
    pub submission_timer: PhaseTimer,
    pub voting_timer: PhaseTimer,
}

impl Session {
    // New sessions start active with every phase closed
    pub fn new(name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            created_at: now,
            is_active: true,
            submission_open: false,
            voting_open: false,
            results_published: false,
            submission_timer: PhaseTimer::default(),
            voting_timer: PhaseTimer::default(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.is_active {
            SessionPhase::Ended
        } else if self.results_published {
            SessionPhase::Published
        } else if self.voting_open {
            SessionPhase::Voting
        } else if self.submission_open {
            SessionPhase::Submitting
        } else {
            SessionPhase::Pending
        }
    }
}

// Session as served to polling clients
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub phase: SessionPhase,
    pub server_time: DateTime<Utc>,
    pub submission_seconds_remaining: Option<i64>,
    pub voting_seconds_remaining: Option<i64>,
}

impl SessionView {
    pub fn at(session: Session, now: DateTime<Utc>) -> Self {
        Self {
            phase: session.phase(),
            server_time: now,
            submission_seconds_remaining: session.submission_timer.remaining_seconds(now),
            voting_seconds_remaining: session.voting_timer.remaining_seconds(now),
            session,
        }
    }
}

// Request to create a new session
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default, alias = "name")]
    pub session_name: String,
}

// Timer duration as sent by admin consoles: a number or a numeric string
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MinutesInput {
    Whole(i64),
    Fractional(f64),
    Text(String),
}

impl MinutesInput {
    pub fn to_minutes(&self) -> Option<i64> {
        match self {
            MinutesInput::Whole(minutes) => Some(*minutes),
            MinutesInput::Fractional(minutes) if minutes.is_finite() => Some(minutes.trunc() as i64),
            MinutesInput::Fractional(_) => None,
            MinutesInput::Text(text) if text.trim().is_empty() => Some(0),
            MinutesInput::Text(text) => text.trim().parse().ok(),
        }
    }
}

// Open/close request for the submission and voting phases
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PhaseToggleRequest {
    #[serde(alias = "submissionOpen", alias = "votingOpen")]
    pub open: bool,
    #[serde(default, alias = "timerDuration")]
    pub timer_duration_minutes: Option<MinutesInput>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResultsToggleRequest {
    #[serde(alias = "resultsPublished")]
    pub published: bool,
}

// Response for phase transitions
#[derive(Serialize, Debug)]
pub struct TransitionResponse {
    pub message: String,
    pub session: SessionView,
}
