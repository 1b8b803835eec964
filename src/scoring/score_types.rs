//! Type-safe score scale for lead scoring.
//!
//! A conversion-probability score lives on a 0-100 integer scale. Encoding
//! the scale in a newtype keeps raw component sums (which can exceed 100
//! before clamping) from leaking into results.

use serde::{Deserialize, Serialize};

/// Lead conversion score on a 0-100 scale.
///
/// Values are automatically clamped to the [0, 100] range.
///
/// # Examples
///
/// ```rust
/// use leadroute::scoring::LeadScore;
///
/// let score = LeadScore::new(85);
/// assert_eq!(score.value(), 85);
///
/// // Out-of-bounds component sums are clamped
/// let clamped = LeadScore::new(150);
/// assert_eq!(clamped.value(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeadScore(u32);

impl LeadScore {
    pub const MAX: LeadScore = LeadScore(100);
    pub const MIN: LeadScore = LeadScore(0);

    /// Create a new score, clamping to [0, 100].
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    /// Get the raw score value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Apply a ceiling, keeping whichever is lower. Used for the dead
    /// status clamp.
    pub fn capped_at(self, ceiling: u32) -> Self {
        Self(self.0.min(ceiling.min(100)))
    }

    /// Normalize to a 0-1 fraction for callers persisting a
    /// conversion probability.
    pub fn as_probability(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl std::fmt::Display for LeadScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
