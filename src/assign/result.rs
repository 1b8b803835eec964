use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::Priority;
use crate::scoring::LeadScore;

/// One successful lead-to-assignee pairing, carrying the recomputed score
/// and priority the caller should write back alongside the assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub lead_id: String,
    pub assignee_id: String,
    pub score: LeadScore,
    pub priority: Priority,
}

/// One lead the batch could not place, with a reason the admin UI can
/// surface for manual assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentFailure {
    pub lead_id: String,
    pub reason: String,
}

/// Output of one batch assignment run.
///
/// Per-lead outcomes are independent: every input lead lands in exactly
/// one of `assignments` or `failures`, so `success + failed` always equals
/// the input batch size.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssignmentResult {
    pub assignments: Vector<Assignment>,
    pub failures: Vector<AssignmentFailure>,
    pub success: usize,
    pub failed: usize,
}

impl AssignmentResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of leads this run processed.
    pub fn total(&self) -> usize {
        self.success + self.failed
    }

    /// Look up which assignee a lead landed on, if any.
    pub fn assignee_for(&self, lead_id: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.lead_id == lead_id)
            .map(|a| a.assignee_id.as_str())
    }

    pub(crate) fn record_success(
        &mut self,
        lead_id: String,
        assignee_id: String,
        score: LeadScore,
        priority: Priority,
    ) {
        self.assignments.push_back(Assignment {
            lead_id,
            assignee_id,
            score,
            priority,
        });
        self.success += 1;
    }

    pub(crate) fn record_failure(&mut self, lead_id: String, reason: impl Into<String>) {
        self.failures.push_back(AssignmentFailure {
            lead_id,
            reason: reason.into(),
        });
        self.failed += 1;
    }
}
