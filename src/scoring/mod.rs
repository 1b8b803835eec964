//! Lead conversion scoring.
//!
//! Maps a single lead's attributes to a 0-100 conversion score and a
//! derived hot/warm/cold priority tier. The scorer is pure and total:
//! malformed or missing fields degrade to a neutral contribution instead
//! of erroring, so a half-captured lead still gets a usable score.
//!
//! The score is a weighted signal sum over four components:
//! a fixed prior from the lead source, a linear recency decay over
//! age-in-days, a capped engagement bonus from contact touches, and a
//! status adjustment. Leads in a dead status (spam, lost) are clamped to a
//! low ceiling after summing, whatever the other signals say.

pub mod score_types;

pub use score_types::LeadScore;

use chrono::{DateTime, Utc};

use crate::config::{
    get_priority_thresholds, get_scoring_weights, PriorityThresholds, ScoringWeights,
};
use crate::core::{Lead, Priority};

/// Recency contribution: `recency_max` for a lead created right now,
/// decaying linearly to zero at the cutoff.
///
/// A missing `created_at` counts as age zero so incomplete capture data is
/// not punished; so does a timestamp in the future (clock skew between the
/// capture flow and the caller).
fn recency_component(
    created_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    weights: &ScoringWeights,
) -> u32 {
    let age_days = created_at
        .map(|created| (now - created).num_days().max(0))
        .unwrap_or(0);

    let cutoff = i64::from(weights.recency_cutoff_days.max(1));
    if age_days >= cutoff {
        return 0;
    }

    let remaining = cutoff - age_days;
    (i64::from(weights.recency_max) * remaining / cutoff) as u32
}

/// Engagement contribution: more touches mean a more qualified lead, but
/// the contribution is capped so a high contact count with no status
/// progression cannot inflate the score on its own.
fn engagement_component(contact_count: u32, weights: &ScoringWeights) -> u32 {
    contact_count
        .saturating_mul(weights.engagement_per_contact)
        .min(weights.engagement_cap)
}

/// Score a lead against explicit weights at an explicit instant.
///
/// Pure and total; deterministic for a fixed `now`. This is the variant to
/// call from tests and from batch runs that need one consistent clock
/// reading across the whole batch.
pub fn score_lead_at(lead: &Lead, now: DateTime<Utc>, weights: &ScoringWeights) -> LeadScore {
    let prior = weights.source_priors.for_source(lead.source);
    let recency = recency_component(lead.created_at, now, weights);
    let engagement = engagement_component(lead.contact_count, weights);
    let status = weights.status_adjustments.for_status(lead.status);

    // Saturating sum keeps the scorer total even under extreme
    // configured weights.
    let score = LeadScore::new(
        prior
            .saturating_add(recency)
            .saturating_add(engagement)
            .saturating_add(status),
    );

    // A spam or lost lead is technically still a record, functionally
    // dead. Clamp after summing so the ceiling wins over every signal.
    if lead.status.is_dead() {
        score.capped_at(weights.dead_status_ceiling)
    } else {
        score
    }
}

/// Score a lead with the configured weights and the current wall clock.
pub fn score_lead(lead: &Lead) -> LeadScore {
    score_lead_at(lead, Utc::now(), get_scoring_weights())
}

/// Map a score to a priority tier against explicit thresholds.
///
/// A pure non-decreasing step function of the score: the same score always
/// yields the same tier, and a higher score never yields a colder tier.
pub fn score_to_priority_with(score: LeadScore, thresholds: &PriorityThresholds) -> Priority {
    if score.value() >= thresholds.hot {
        Priority::Hot
    } else if score.value() >= thresholds.warm {
        Priority::Warm
    } else {
        Priority::Cold
    }
}

/// Map a score to a priority tier with the configured thresholds.
pub fn score_to_priority(score: LeadScore) -> Priority {
    score_to_priority_with(score, get_priority_thresholds())
}
