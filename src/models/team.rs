use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub session_id: String,
    pub team_name: String, // not unique
    pub team_members: Vec<String>,
    pub persona_card: Option<String>,
    pub mdb_card_used: Option<String>,
    pub ai_card_used: Option<String>,
    pub wild_card_used: Option<String>,
    pub product_title: Option<String>,
    pub solution: String,
    pub total_votes: u32,
    pub submission_timestamp: DateTime<Utc>,
}

// Members arrive either as a list or as one comma-separated string
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MembersInput {
    List(Vec<String>),
    Text(String),
}

impl MembersInput {
    pub fn normalize(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            MembersInput::List(names) => names.iter().map(String::as_str).collect(),
            MembersInput::Text(text) => text.split(',').collect(),
        };

        raw.into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// Team submission payload
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamSubmission {
    // Only used to detect clients still looking at an older session
    pub session_id: Option<String>,
    pub team_name: Option<String>,
    #[serde(alias = "members")]
    pub team_members: Option<MembersInput>,
    pub persona_card: Option<String>,
    pub mdb_card_used: Option<String>,
    pub ai_card_used: Option<String>,
    pub wild_card_used: Option<String>,
    pub product_title: Option<String>,
    pub solution: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SubmissionResponse {
    pub message: String,
    pub team: Team,
}

#[derive(Serialize, Debug)]
pub struct TeamsResponse {
    pub teams: Vec<Team>,
}
