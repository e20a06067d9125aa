//! Per-form submission state with a stale-response guard
//!
//! Calls are never cancelled, so a reply may arrive after the form was reset
//! or resubmitted. Each submission is stamped with the form's generation and
//! its outcome is applied only if that generation is still current.

use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::models::PredictionResult;

pub type Outcome = Result<PredictionResult, PredictionError>;

/// Proof of which form generation a submission belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionTicket {
    generation: u64,
}

impl SubmissionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// State of one prediction form
#[derive(Debug, Clone, Default)]
pub struct FormState {
    generation: u64,
    in_flight: bool,
    outcome: Option<Outcome>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission; supersedes any submission still in flight
    pub fn begin(&mut self) -> SubmissionTicket {
        self.generation += 1;
        self.in_flight = true;
        self.outcome = None;
        SubmissionTicket {
            generation: self.generation,
        }
    }

    /// Clear the form; replies to earlier submissions will be ignored
    pub fn reset(&mut self) {
        self.generation += 1;
        self.in_flight = false;
        self.outcome = None;
    }

    /// Store an outcome if its ticket is current. Returns whether it was applied.
    pub fn apply(&mut self, ticket: SubmissionTicket, outcome: Outcome) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.in_flight = false;
        self.outcome = Some(outcome);
        true
    }

    pub fn is_current(&self, ticket: SubmissionTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
