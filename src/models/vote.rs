use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub session_id: String,
    pub voter_name: String,
    pub voter_team: String,
    pub voted_for_team_id: String,
    pub timestamp: DateTime<Utc>,
}

impl Vote {
    pub fn new(session_id: String, voter_name: String, voter_team: String, voted_for_team_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id,
            voter_name,
            voter_team,
            voted_for_team_id,
            timestamp: Utc::now(),
        }
    }

    // A voter is identified by the name and team they claim
    pub fn is_cast_by(&self, session_id: &str, voter_name: &str, voter_team: &str) -> bool {
        self.session_id == session_id && self.voter_name == voter_name && self.voter_team == voter_team
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub voter_name: String,
    #[serde(default)]
    pub voter_team: String,
    #[serde(default)]
    pub voted_for_team_id: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub message: String,
    pub vote_id: String,
}
