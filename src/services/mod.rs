pub mod phase_controller;
pub mod results_aggregator;
pub mod submission_gate;
pub mod vote_gate;
