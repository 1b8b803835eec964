// Export modules for library usage
pub mod assign;
pub mod config;
pub mod core;
pub mod error;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{Assignee, AssigneeRole, Lead, LeadSource, LeadStatus, Priority};

pub use crate::assign::{
    assign, AssignOptions, Assignment, AssignmentFailure, AssignmentResult, Strategy,
};

pub use crate::scoring::{
    score_lead, score_lead_at, score_to_priority, score_to_priority_with, LeadScore,
};

pub use crate::config::{
    get_priority_thresholds, get_scoring_weights, LeadrouteConfig, PriorityThresholds,
    ScoringWeights, SourcePriors, StatusAdjustments,
};

pub use crate::error::LeadrouteError;
