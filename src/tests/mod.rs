// Shared helpers for the service and route tests
use crate::models::{MembersInput, TeamSubmission, VoteRequest};
use crate::utils::session_storage::SessionStore;
use std::time::Duration;

mod gate_tests;

pub fn test_store() -> SessionStore {
    SessionStore::in_memory(Duration::from_secs(5))
}

pub fn submission(team_name: &str, members: &str) -> TeamSubmission {
    TeamSubmission {
        team_name: Some(team_name.to_string()),
        team_members: Some(MembersInput::Text(members.to_string())),
        persona_card: Some("Busy parent".to_string()),
        mdb_card_used: Some("Atlas Search".to_string()),
        ai_card_used: Some("Vector Search".to_string()),
        product_title: Some(format!("{} product", team_name)),
        solution: Some("An app that plans the week".to_string()),
        ..Default::default()
    }
}

pub fn ballot(session_id: &str, voter_name: &str, voter_team: &str, team_id: &str) -> VoteRequest {
    VoteRequest {
        session_id: session_id.to_string(),
        voter_name: voter_name.to_string(),
        voter_team: voter_team.to_string(),
        voted_for_team_id: team_id.to_string(),
    }
}
