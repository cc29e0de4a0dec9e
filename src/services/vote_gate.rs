// src/services/vote_gate.rs
use crate::models::{ServiceError, Vote, VoteRequest};
use crate::utils::session_storage::SessionStore;
use log::{debug, info};

// Record one ballot and bump the target's tally in a single store update.
//
// Checks run in order and the first failure wins: voting open, voter fields
// present, not a self-vote, not a repeat ballot, target team exists.
pub async fn cast_vote(store: &SessionStore, request: &VoteRequest) -> Result<Vote, ServiceError> {
    let session_id = request.session_id.trim();
    let voter_name = request.voter_name.trim();
    let voter_team = request.voter_team.trim();
    let target_id = request.voted_for_team_id.trim();

    let vote = store
        .update(|data| {
            let voting_open = data.session(session_id).map_or(false, |s| s.voting_open);
            if !voting_open {
                return Err(ServiceError::PhaseClosed(
                    "Voting is not open for this session.".to_string(),
                ));
            }

            if voter_name.is_empty() || voter_team.is_empty() {
                return Err(ServiceError::Validation(
                    "Voter name and team are required".to_string(),
                ));
            }
            if target_id.is_empty() {
                return Err(ServiceError::Validation("A team to vote for is required".to_string()));
            }

            // Voters are not registered, so a self-vote is spotted by the
            // claimed team name matching the target team's name.
            let self_vote = data.teams.iter().any(|t| {
                t.session_id == session_id && t.id == target_id && t.team_name == voter_team
            });
            if self_vote {
                return Err(ServiceError::SelfVote);
            }

            if data.votes.iter().any(|v| v.is_cast_by(session_id, voter_name, voter_team)) {
                return Err(ServiceError::DuplicateVote);
            }

            let target = data
                .team_in_session_mut(session_id, target_id)
                .ok_or_else(|| ServiceError::NotFound(format!("Team not found: {}", target_id)))?;
            target.total_votes += 1;
            debug!("Team {} now has {} votes", target.id, target.total_votes);

            let vote = Vote::new(
                session_id.to_string(),
                voter_name.to_string(),
                voter_team.to_string(),
                target_id.to_string(),
            );
            data.votes.push(vote.clone());
            Ok(vote)
        })
        .await?;

    info!("🗳️ Vote recorded for team {} in session {}", vote.voted_for_team_id, vote.session_id);
    Ok(vote)
}
