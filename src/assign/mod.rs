//! Batch lead assignment.
//!
//! One-shot batch transform: given a batch of leads, a roster snapshot,
//! and a strategy, produce a lead-to-assignee mapping with per-lead
//! success/failure bookkeeping. The engine holds no state between calls;
//! the rotation cursor and in-run workload counters live only for the
//! duration of one [`assign`] call, so concurrent batches on separate
//! roster snapshots are safe.
//!
//! Later leads' placement depends on earlier assignments in the same
//! batch (cursor position, in-run workload), so the loop is intentionally
//! sequential.

pub mod result;
mod strategies;

pub use result::{Assignment, AssignmentFailure, AssignmentResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::{get_priority_thresholds, get_scoring_weights};
use crate::core::{Assignee, Lead};
use crate::error::LeadrouteError;
use crate::scoring::{score_lead_at, score_to_priority_with};
use strategies::{least_loaded, next_round_robin, territory_match, RunState};

/// Failure reason when filtering leaves nobody to assign to.
pub const REASON_NO_ELIGIBLE: &str = "no eligible assignees";

/// Failure reason for a lead record missing its identity.
pub const REASON_MISSING_LEAD_ID: &str = "missing lead id";

/// Allocation policy for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Rotate through the eligible roster in order, wrapping circularly.
    RoundRobin,
    /// Always pick the eligible assignee with the lowest open-lead count.
    Workload,
    /// Match the lead's zip against serviced territories, falling back to
    /// round-robin when nothing matches.
    Territory,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::RoundRobin => "round_robin",
            Strategy::Workload => "workload",
            Strategy::Territory => "territory",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Strategy {
    type Err = LeadrouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round_robin" => Ok(Strategy::RoundRobin),
            "workload" => Ok(Strategy::Workload),
            "territory" => Ok(Strategy::Territory),
            other => Err(LeadrouteError::InvalidStrategy {
                name: other.to_string(),
            }),
        }
    }
}

/// Options applied before any strategy logic runs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AssignOptions {
    /// Drop sales managers from the roster before assigning. If that
    /// empties the roster, every lead fails rather than silently routing
    /// to managers.
    #[serde(default)]
    pub exclude_managers: bool,
}

/// Assign a batch of leads across a roster under the given strategy.
///
/// Total: malformed leads and un-placeable leads become per-lead failures
/// in the result, never an error or a panic, and one lead's failure does
/// not abort the batch. An empty `leads` batch is a valid no-op. The
/// result always satisfies `success + failed == leads.len()`.
///
/// Each successful assignment carries the lead's recomputed score and
/// priority tier as the proposed write-back; persistence is the caller's
/// responsibility.
///
/// Cost is `O(leads.len() * roster.len())` in the territory path; callers
/// batching very large lead sets should budget accordingly.
pub fn assign(
    leads: &[Lead],
    roster: &[Assignee],
    strategy: Strategy,
    options: AssignOptions,
) -> AssignmentResult {
    assign_at(leads, roster, strategy, options, Utc::now())
}

/// [`assign`] with an explicit clock reading, used once for the whole
/// batch so every lead is scored against the same instant.
pub fn assign_at(
    leads: &[Lead],
    roster: &[Assignee],
    strategy: Strategy,
    options: AssignOptions,
    now: DateTime<Utc>,
) -> AssignmentResult {
    let mut result = AssignmentResult::new();

    let eligible: Vec<&Assignee> = roster
        .iter()
        .filter(|assignee| !(options.exclude_managers && assignee.is_manager()))
        .collect();

    if eligible.is_empty() {
        for lead in leads {
            result.record_failure(lead.id.clone(), REASON_NO_ELIGIBLE);
        }
        return result;
    }

    let weights = get_scoring_weights();
    let thresholds = get_priority_thresholds();
    let mut state = RunState::new(&eligible);

    for lead in leads {
        if lead.id.trim().is_empty() {
            result.record_failure(lead.id.clone(), REASON_MISSING_LEAD_ID);
            continue;
        }

        let index = match strategy {
            Strategy::RoundRobin => next_round_robin(&mut state, eligible.len()),
            Strategy::Workload => least_loaded(&state),
            Strategy::Territory => {
                match territory_match(lead.zip_code.as_deref(), &eligible, &state) {
                    Some(index) => index,
                    None => {
                        // Unassigned is worse than suboptimal: leads with
                        // no serviced territory rotate among everyone.
                        log::debug!(
                            "Lead {} has no territory match, falling back to round-robin",
                            lead.id
                        );
                        next_round_robin(&mut state, eligible.len())
                    }
                }
            }
        };

        state.record_assignment(index);

        let score = score_lead_at(lead, now, weights);
        let priority = score_to_priority_with(score, thresholds);
        result.record_success(lead.id.clone(), eligible[index].id.clone(), score, priority);
    }

    log::debug!(
        "Assigned batch of {} leads with {} strategy: {} ok, {} failed",
        leads.len(),
        strategy,
        result.success,
        result.failed
    );

    result
}
