use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::{LeadSource, LeadStatus};

/// Base score each lead source starts from. The source is a proxy for
/// buying intent: someone who filled out the contact form or asked a
/// medical question is much closer to a purchase than a passive event
/// signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePriors {
    #[serde(default = "default_medical_request_prior")]
    pub medical_request: u32,
    #[serde(default = "default_contact_form_prior")]
    pub contact_form: u32,
    #[serde(default = "default_incomplete_checkout_prior")]
    pub incomplete_checkout: u32,
    #[serde(default = "default_abandoned_plan_prior")]
    pub abandoned_plan: u32,
    #[serde(default = "default_early_access_prior")]
    pub early_access: u32,
    #[serde(default = "default_individual_pack_prior")]
    pub individual_pack: u32,
    #[serde(default = "default_manual_prior")]
    pub manual: u32,
    #[serde(default = "default_event_signup_prior")]
    pub event_signup: u32,
}

fn default_medical_request_prior() -> u32 {
    40
}

fn default_contact_form_prior() -> u32 {
    35
}

fn default_incomplete_checkout_prior() -> u32 {
    30
}

fn default_abandoned_plan_prior() -> u32 {
    28
}

fn default_early_access_prior() -> u32 {
    20
}

fn default_individual_pack_prior() -> u32 {
    18
}

fn default_manual_prior() -> u32 {
    15
}

fn default_event_signup_prior() -> u32 {
    10
}

impl Default for SourcePriors {
    fn default() -> Self {
        Self {
            medical_request: default_medical_request_prior(),
            contact_form: default_contact_form_prior(),
            incomplete_checkout: default_incomplete_checkout_prior(),
            abandoned_plan: default_abandoned_plan_prior(),
            early_access: default_early_access_prior(),
            individual_pack: default_individual_pack_prior(),
            manual: default_manual_prior(),
            event_signup: default_event_signup_prior(),
        }
    }
}

impl SourcePriors {
    /// Prior for a given source. Unknown sources get the lowest configured
    /// prior rather than an error.
    pub fn for_source(&self, source: LeadSource) -> u32 {
        match source {
            LeadSource::MedicalRequest => self.medical_request,
            LeadSource::ContactForm => self.contact_form,
            LeadSource::IncompleteCheckout => self.incomplete_checkout,
            LeadSource::AbandonedPlan => self.abandoned_plan,
            LeadSource::EarlyAccess => self.early_access,
            LeadSource::IndividualPack => self.individual_pack,
            LeadSource::Manual => self.manual,
            LeadSource::EventSignup => self.event_signup,
            LeadSource::Unknown => self.lowest(),
        }
    }

    fn lowest(&self) -> u32 {
        [
            self.medical_request,
            self.contact_form,
            self.incomplete_checkout,
            self.abandoned_plan,
            self.early_access,
            self.individual_pack,
            self.manual,
            self.event_signup,
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }
}

/// Additive adjustment per pipeline status. Dead statuses carry no
/// adjustment here because they are handled by the ceiling clamp instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusAdjustments {
    #[serde(default = "default_contacted_adjustment")]
    pub contacted: u32,
    #[serde(default = "default_qualified_adjustment")]
    pub qualified: u32,
    #[serde(default = "default_nurturing_adjustment")]
    pub nurturing: u32,
}

fn default_contacted_adjustment() -> u32 {
    5
}

fn default_qualified_adjustment() -> u32 {
    25
}

fn default_nurturing_adjustment() -> u32 {
    15
}

impl Default for StatusAdjustments {
    fn default() -> Self {
        Self {
            contacted: default_contacted_adjustment(),
            qualified: default_qualified_adjustment(),
            nurturing: default_nurturing_adjustment(),
        }
    }
}

impl StatusAdjustments {
    pub fn for_status(&self, status: LeadStatus) -> u32 {
        match status {
            LeadStatus::Contacted => self.contacted,
            LeadStatus::Qualified => self.qualified,
            LeadStatus::Nurturing => self.nurturing,
            LeadStatus::New | LeadStatus::Converted | LeadStatus::Lost | LeadStatus::Spam => 0,
        }
    }
}

/// Scoring weights configuration. These numbers are tuned policy, not a
/// behavioral contract; ship different values in `.leadroute.toml` to
/// recalibrate without a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default)]
    pub source_priors: SourcePriors,

    #[serde(default)]
    pub status_adjustments: StatusAdjustments,

    /// Recency contribution for a lead created right now.
    #[serde(default = "default_recency_max")]
    pub recency_max: u32,

    /// Age in days past which recency contributes nothing.
    #[serde(default = "default_recency_cutoff_days")]
    pub recency_cutoff_days: u32,

    /// Points per recorded contact touch.
    #[serde(default = "default_engagement_per_contact")]
    pub engagement_per_contact: u32,

    /// Cap on the engagement contribution, so a lead that was called
    /// thirty times without progressing doesn't look qualified.
    #[serde(default = "default_engagement_cap")]
    pub engagement_cap: u32,

    /// Ceiling applied to leads in a dead status (spam, lost).
    #[serde(default = "default_dead_status_ceiling")]
    pub dead_status_ceiling: u32,
}

fn default_recency_max() -> u32 {
    30
}

fn default_recency_cutoff_days() -> u32 {
    60
}

fn default_engagement_per_contact() -> u32 {
    5
}

fn default_engagement_cap() -> u32 {
    20
}

fn default_dead_status_ceiling() -> u32 {
    10
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            source_priors: SourcePriors::default(),
            status_adjustments: StatusAdjustments::default(),
            recency_max: default_recency_max(),
            recency_cutoff_days: default_recency_cutoff_days(),
            engagement_per_contact: default_engagement_per_contact(),
            engagement_cap: default_engagement_cap(),
            dead_status_ceiling: default_dead_status_ceiling(),
        }
    }
}

impl ScoringWeights {
    /// Sanity-check configured weights. A zero recency cutoff would divide
    /// by zero in the decay; a ceiling above 100 is meaningless.
    pub fn validate(&self) -> Result<(), String> {
        if self.recency_cutoff_days == 0 {
            return Err("recency_cutoff_days must be at least 1".to_string());
        }
        if self.dead_status_ceiling > 100 {
            return Err("dead_status_ceiling must be between 0 and 100".to_string());
        }
        Ok(())
    }
}

/// Score thresholds for the hot/warm/cold tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityThresholds {
    /// Minimum score for the hot tier.
    #[serde(default = "default_hot_threshold")]
    pub hot: u32,

    /// Minimum score for the warm tier. Everything below is cold.
    #[serde(default = "default_warm_threshold")]
    pub warm: u32,
}

fn default_hot_threshold() -> u32 {
    70
}

fn default_warm_threshold() -> u32 {
    40
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self {
            hot: default_hot_threshold(),
            warm: default_warm_threshold(),
        }
    }
}

impl PriorityThresholds {
    /// Thresholds must be ordered or the step function stops being
    /// monotonic.
    pub fn validate(&self) -> Result<(), String> {
        if self.warm > self.hot {
            return Err("warm threshold must not exceed hot threshold".to_string());
        }
        Ok(())
    }
}

/// Top-level configuration, loaded from `.leadroute.toml` when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadrouteConfig {
    pub scoring: Option<ScoringWeights>,
    pub thresholds: Option<PriorityThresholds>,
}

/// Cache the configuration
static CONFIG: OnceLock<LeadrouteConfig> = OnceLock::new();
static SCORING_WEIGHTS: OnceLock<ScoringWeights> = OnceLock::new();
static PRIORITY_THRESHOLDS: OnceLock<PriorityThresholds> = OnceLock::new();

fn parse_and_validate_config(contents: &str) -> anyhow::Result<LeadrouteConfig> {
    let mut config = toml::from_str::<LeadrouteConfig>(contents)
        .context("failed to parse .leadroute.toml")?;

    if let Some(ref scoring) = config.scoring {
        if let Err(e) = scoring.validate() {
            log::warn!("Invalid scoring weights: {}. Using defaults.", e);
            config.scoring = Some(ScoringWeights::default());
        }
    }

    if let Some(ref thresholds) = config.thresholds {
        if let Err(e) = thresholds.validate() {
            log::warn!("Invalid priority thresholds: {}. Using defaults.", e);
            config.thresholds = Some(PriorityThresholds::default());
        }
    }

    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<LeadrouteConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    let parsed = parse_and_validate_config(&contents)
        .with_context(|| format!("invalid config at {}", config_path.display()));

    match parsed {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            // {:#} renders the whole context trail on one line.
            log::warn!("{:#}. Using defaults.", e);
            None
        }
    }
}

fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load configuration from `.leadroute.toml` in the current directory or
/// an ancestor, falling back to defaults on any failure.
pub fn load_config() -> LeadrouteConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to get current directory: {}. Using default config.", e);
            return LeadrouteConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(".leadroute.toml"))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            LeadrouteConfig::default()
        })
}

/// Get the cached configuration
pub fn get_config() -> &'static LeadrouteConfig {
    CONFIG.get_or_init(load_config)
}

/// Get the scoring weights (with defaults if not configured)
pub fn get_scoring_weights() -> &'static ScoringWeights {
    SCORING_WEIGHTS.get_or_init(|| get_config().scoring.clone().unwrap_or_default())
}

/// Get the priority thresholds (with defaults if not configured)
pub fn get_priority_thresholds() -> &'static PriorityThresholds {
    PRIORITY_THRESHOLDS.get_or_init(|| get_config().thresholds.clone().unwrap_or_default())
}
