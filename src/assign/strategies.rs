//! Per-lead assignee selection for each strategy.
//!
//! Selection is a pure function of the eligible roster and an explicit
//! in-run state value. The rotation cursor and the in-run workload
//! counters live only inside one batch; threading them through as a value
//! keeps concurrent batches from interfering through hidden mutable state.

use crate::core::Assignee;

/// Mutable state for one batch run: the round-robin cursor plus each
/// eligible assignee's workload (caller snapshot plus assignments made
/// earlier in this batch).
#[derive(Debug, Clone)]
pub(crate) struct RunState {
    cursor: usize,
    in_run_load: Vec<u32>,
}

impl RunState {
    pub(crate) fn new(eligible: &[&Assignee]) -> Self {
        Self {
            cursor: 0,
            in_run_load: eligible.iter().map(|a| a.open_leads).collect(),
        }
    }

    /// Record an assignment against `index` so later leads in the batch
    /// see the updated workload.
    pub(crate) fn record_assignment(&mut self, index: usize) {
        if let Some(load) = self.in_run_load.get_mut(index) {
            *load = load.saturating_add(1);
        }
    }

    #[cfg(test)]
    pub(crate) fn load_at(&self, index: usize) -> u32 {
        self.in_run_load[index]
    }
}

/// Next assignee under round-robin: take the cursor position, advance and
/// wrap. Deterministic for a fixed roster order.
pub(crate) fn next_round_robin(state: &mut RunState, eligible_len: usize) -> usize {
    let index = state.cursor % eligible_len;
    state.cursor += 1;
    index
}

/// Eligible assignee with the lowest in-run workload; ties broken by
/// roster order so repeated runs stay stable.
pub(crate) fn least_loaded(state: &RunState) -> usize {
    state
        .in_run_load
        .iter()
        .enumerate()
        .min_by_key(|(index, load)| (**load, *index))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// Assignee servicing the lead's zip, if any. Among multiple territory
/// matches the least loaded wins, ties by roster order. `None` means the
/// caller should fall back to round-robin rather than fail the lead.
pub(crate) fn territory_match(
    zip_code: Option<&str>,
    eligible: &[&Assignee],
    state: &RunState,
) -> Option<usize> {
    let zip = zip_code?;
    eligible
        .iter()
        .enumerate()
        .filter(|(_, assignee)| assignee.services_zip(zip))
        .min_by_key(|(index, _)| (state.in_run_load[*index], *index))
        .map(|(index, _)| index)
}
