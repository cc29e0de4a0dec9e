use super::{ballot, submission, test_store};
use crate::models::{MembersInput, ServiceError, TeamSubmission};
use crate::services::{phase_controller, results_aggregator, submission_gate, vote_gate};
use crate::utils::session_storage::SessionStore;

async fn session_with_submissions_open(store: &SessionStore) -> String {
    let session = phase_controller::create_session(store, "Icebreaker").await.unwrap();
    phase_controller::open_submission(store, &session.id, None).await.unwrap();
    session.id
}

#[actix_rt::test]
async fn submission_rejected_while_closed_on_active_session() {
    let store = test_store();
    let session = phase_controller::create_session(&store, "Icebreaker").await.unwrap();
    assert!(session.is_active);

    let err = submission_gate::submit_team(&store, submission("T1", "Ann, Bo")).await.unwrap_err();
    assert!(matches!(err, ServiceError::PhaseClosed(_)));
}

#[actix_rt::test]
async fn submission_rejected_without_active_session() {
    let store = test_store();
    let err = submission_gate::submit_team(&store, submission("T1", "Ann")).await.unwrap_err();
    assert!(matches!(err, ServiceError::PhaseClosed(_)));
}

#[actix_rt::test]
async fn phase_check_wins_over_validation() {
    let store = test_store();
    phase_controller::create_session(&store, "Icebreaker").await.unwrap();

    let err = submission_gate::submit_team(&store, TeamSubmission::default()).await.unwrap_err();
    assert!(matches!(err, ServiceError::PhaseClosed(_)));
}

#[actix_rt::test]
async fn stale_session_id_is_rejected() {
    let store = test_store();
    let old_id = session_with_submissions_open(&store).await;
    session_with_submissions_open(&store).await;

    let mut payload = submission("T1", "Ann");
    payload.session_id = Some(old_id);
    let err = submission_gate::submit_team(&store, payload).await.unwrap_err();
    assert!(matches!(err, ServiceError::PhaseClosed(_)));
}

#[actix_rt::test]
async fn submission_targets_active_session_and_splits_members() {
    let store = test_store();
    let session_id = session_with_submissions_open(&store).await;

    let team = submission_gate::submit_team(&store, submission("T1", "Ann, Bo")).await.unwrap();
    assert_eq!(team.session_id, session_id);
    assert_eq!(team.team_members, vec!["Ann", "Bo"]);
    assert_eq!(team.total_votes, 0);
    assert_eq!(team.wild_card_used, None);

    let teams = submission_gate::list_teams(&store, &session_id).await.unwrap();
    assert_eq!(teams, vec![team]);
}

#[actix_rt::test]
async fn member_list_form_is_accepted() {
    let store = test_store();
    session_with_submissions_open(&store).await;

    let mut payload = submission("T1", "");
    payload.team_members = Some(MembersInput::List(vec![" Cy ".to_string(), "".to_string(), "Di".to_string()]));
    let team = submission_gate::submit_team(&store, payload).await.unwrap();
    assert_eq!(team.team_members, vec!["Cy", "Di"]);
}

#[actix_rt::test]
async fn missing_fields_are_validation_errors() {
    let store = test_store();
    session_with_submissions_open(&store).await;

    let mut no_solution = submission("T1", "Ann");
    no_solution.solution = None;
    let err = submission_gate::submit_team(&store, no_solution).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = submission_gate::submit_team(&store, submission("T1", " , ")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[actix_rt::test]
async fn duplicate_team_names_are_allowed() {
    let store = test_store();
    let session_id = session_with_submissions_open(&store).await;

    let first = submission_gate::submit_team(&store, submission("Same", "Ann")).await.unwrap();
    let second = submission_gate::submit_team(&store, submission("Same", "Bo")).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(submission_gate::list_teams(&store, &session_id).await.unwrap().len(), 2);
}

#[actix_rt::test]
async fn list_teams_for_unknown_session_is_not_found() {
    let store = test_store();
    let err = submission_gate::list_teams(&store, "missing").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

// Session in voting with teams Alpha and Beta; returns (session, alpha, beta)
async fn voting_session(store: &SessionStore) -> (String, String, String) {
    let session_id = session_with_submissions_open(store).await;
    let alpha = submission_gate::submit_team(store, submission("Alpha", "Ann")).await.unwrap();
    let beta = submission_gate::submit_team(store, submission("Beta", "Bo")).await.unwrap();
    phase_controller::open_voting(store, &session_id, None).await.unwrap();
    (session_id, alpha.id, beta.id)
}

async fn votes_for(store: &SessionStore, session_id: &str, team_id: &str) -> u32 {
    submission_gate::list_teams(store, session_id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.id == team_id)
        .map(|t| t.total_votes)
        .unwrap()
}

#[actix_rt::test]
async fn vote_rejected_when_voting_closed_or_session_missing() {
    let store = test_store();
    let session_id = session_with_submissions_open(&store).await;
    let alpha = submission_gate::submit_team(&store, submission("Alpha", "Ann")).await.unwrap();

    let err = vote_gate::cast_vote(&store, &ballot(&session_id, "Bo", "Beta", &alpha.id)).await.unwrap_err();
    assert!(matches!(err, ServiceError::PhaseClosed(_)));

    let err = vote_gate::cast_vote(&store, &ballot("missing", "Bo", "Beta", &alpha.id)).await.unwrap_err();
    assert!(matches!(err, ServiceError::PhaseClosed(_)));
}

#[actix_rt::test]
async fn vote_requires_voter_name_and_team() {
    let store = test_store();
    let (session_id, alpha, _) = voting_session(&store).await;

    let err = vote_gate::cast_vote(&store, &ballot(&session_id, "", "Beta", &alpha)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    let err = vote_gate::cast_vote(&store, &ballot(&session_id, "Bo", "  ", &alpha)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[actix_rt::test]
async fn self_vote_is_rejected() {
    let store = test_store();
    let (session_id, alpha, _) = voting_session(&store).await;

    let err = vote_gate::cast_vote(&store, &ballot(&session_id, "Ann", "Alpha", &alpha)).await.unwrap_err();
    assert_eq!(err, ServiceError::SelfVote);
    assert_eq!(votes_for(&store, &session_id, &alpha).await, 0);
}

#[actix_rt::test]
async fn second_ballot_from_same_voter_is_duplicate() {
    let store = test_store();
    let (session_id, alpha, beta) = voting_session(&store).await;

    vote_gate::cast_vote(&store, &ballot(&session_id, "Cy", "Gamma", &alpha)).await.unwrap();
    let err = vote_gate::cast_vote(&store, &ballot(&session_id, "Cy", "Gamma", &alpha)).await.unwrap_err();
    assert_eq!(err, ServiceError::DuplicateVote);

    // A different target does not get around the one-ballot rule
    let err = vote_gate::cast_vote(&store, &ballot(&session_id, "Cy", "Gamma", &beta)).await.unwrap_err();
    assert_eq!(err, ServiceError::DuplicateVote);

    assert_eq!(votes_for(&store, &session_id, &alpha).await, 1);
    assert_eq!(votes_for(&store, &session_id, &beta).await, 0);
}

#[actix_rt::test]
async fn self_vote_is_reported_before_duplicate() {
    let store = test_store();
    let (session_id, alpha, beta) = voting_session(&store).await;

    vote_gate::cast_vote(&store, &ballot(&session_id, "Ann", "Alpha", &beta)).await.unwrap();
    let err = vote_gate::cast_vote(&store, &ballot(&session_id, "Ann", "Alpha", &alpha)).await.unwrap_err();
    assert_eq!(err, ServiceError::SelfVote);
}

#[actix_rt::test]
async fn vote_for_unknown_team_records_nothing() {
    let store = test_store();
    let (session_id, _, _) = voting_session(&store).await;

    let err = vote_gate::cast_vote(&store, &ballot(&session_id, "Cy", "Gamma", "no-such-team")).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let metrics = results_aggregator::session_metrics(&store, &session_id).await.unwrap();
    assert_eq!(metrics.total_votes_cast, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_votes_are_all_counted() {
    let store = test_store();
    let (session_id, alpha, _) = voting_session(&store).await;

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let store = store.clone();
            let request = ballot(&session_id, &format!("Voter {}", i), "Beta", &alpha);
            tokio::spawn(async move { vote_gate::cast_vote(&store, &request).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(votes_for(&store, &session_id, &alpha).await, 50);
    let metrics = results_aggregator::session_metrics(&store, &session_id).await.unwrap();
    assert_eq!(metrics.total_votes_cast, 50);
    assert_eq!(metrics.submitted_teams_count, 2);
}

#[actix_rt::test]
async fn full_round_trip_produces_winner() {
    let store = test_store();
    let session = phase_controller::create_session(&store, "Round trip").await.unwrap();
    phase_controller::open_submission(&store, &session.id, Some(15)).await.unwrap();
    let t1 = submission_gate::submit_team(&store, submission("T1", "Ann, Bo")).await.unwrap();
    phase_controller::open_voting(&store, &session.id, None).await.unwrap();
    vote_gate::cast_vote(&store, &ballot(&session.id, "Cy", "T2", &t1.id)).await.unwrap();
    phase_controller::publish_results(&store, &session.id).await.unwrap();

    let results = results_aggregator::compute_results(&store, &session.id).await.unwrap();
    assert!(results.results_published);
    assert_eq!(results.teams.len(), 1);
    assert_eq!(results.teams[0].id, t1.id);
    assert_eq!(results.teams[0].total_votes, 1);
    assert_eq!(results.winners.len(), 1);
    assert_eq!(results.winners[0].id, t1.id);

    // No intervening votes, same answer
    let again = results_aggregator::compute_results(&store, &session.id).await.unwrap();
    assert_eq!(again, results);
}

#[actix_rt::test]
async fn results_for_unknown_session_are_not_found() {
    let store = test_store();
    let err = results_aggregator::compute_results(&store, "missing").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
