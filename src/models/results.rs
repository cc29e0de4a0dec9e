use crate::models::Team;
use serde::{Deserialize, Serialize};

// Ranked teams and the winner set for one session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResults {
    pub session_id: String,
    pub results_published: bool,
    pub teams: Vec<Team>,
    pub winners: Vec<Team>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    pub submitted_teams_count: usize,
    pub total_votes_cast: usize,
}
