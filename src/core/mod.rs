use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a lead entered the funnel. The source is the strongest prior we
/// have on buying intent before anyone has talked to the prospect.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    EventSignup,
    EarlyAccess,
    AbandonedPlan,
    IncompleteCheckout,
    IndividualPack,
    ContactForm,
    MedicalRequest,
    Manual,
    /// Anything we don't recognize. Gets the lowest prior rather than
    /// failing deserialization, so stale capture flows keep working.
    #[serde(other)]
    Unknown,
}

/// Sales pipeline status. `Converted`, `Lost`, and `Spam` are terminal and
/// set by external sales actions; this engine only reads them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Nurturing,
    Converted,
    Lost,
    Spam,
}

impl LeadStatus {
    /// Terminal statuses that should never score above the dead ceiling,
    /// no matter how strong the other signals look.
    pub fn is_dead(self) -> bool {
        matches!(self, LeadStatus::Lost | LeadStatus::Spam)
    }
}

/// Coarse priority tier derived from a numeric score. Always recomputed
/// from the score, never trusted as stored input.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Cold,
    Warm,
    Hot,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            Priority::Hot => "hot",
            Priority::Warm => "warm",
            Priority::Cold => "cold",
        };
        write!(f, "{display_str}")
    }
}

/// A sales prospect record as handed to the engine by the caller.
///
/// Optional fields stay optional end to end: a lead captured by a flaky
/// checkout-abandonment detector with half its fields missing still scores
/// and still assigns.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: String,
    pub source: LeadSource,
    pub status: LeadStatus,
    #[serde(default)]
    pub contact_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dog_weight: Option<f64>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub source_metadata: BTreeMap<String, String>,
}

impl Lead {
    pub fn new(id: impl Into<String>, source: LeadSource, status: LeadStatus) -> Self {
        Self {
            id: id.into(),
            source,
            status,
            contact_count: 0,
            created_at: None,
            assigned_at: None,
            dog_weight: None,
            zip_code: None,
            source_metadata: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeRole {
    SalesRep,
    SalesManager,
}

/// A sales team member eligible to receive leads.
///
/// `open_leads` is the caller's workload snapshot, read once at the start
/// of a batch; the engine layers in-run increments on top of it but never
/// writes it back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Assignee {
    pub id: String,
    pub role: AssigneeRole,
    #[serde(default)]
    pub open_leads: u32,
    /// Serviced zip prefixes, e.g. `["981", "982"]`. Empty means the
    /// assignee matches no territory and only receives fallback traffic
    /// under the territory strategy.
    #[serde(default)]
    pub territories: Vec<String>,
}

impl Assignee {
    pub fn new(id: impl Into<String>, role: AssigneeRole) -> Self {
        Self {
            id: id.into(),
            role,
            open_leads: 0,
            territories: Vec::new(),
        }
    }

    pub fn is_manager(&self) -> bool {
        self.role == AssigneeRole::SalesManager
    }

    /// Whether this assignee services the given zip code. Prefix match,
    /// mirroring how the territory table stores zip prefixes.
    pub fn services_zip(&self, zip: &str) -> bool {
        self.territories.iter().any(|prefix| zip.starts_with(prefix.as_str()))
    }
}
