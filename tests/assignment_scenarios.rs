//! End-to-end scenarios for the scoring and assignment engine.
//!
//! These tests exercise the public call contract the way the admin sales
//! tooling uses it: load a batch of leads and a roster snapshot, run one
//! assignment pass, and persist the serialized result.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

use leadroute::{
    assign::assign_at, score_lead_at, score_to_priority_with, AssignOptions, Assignee,
    AssigneeRole, Lead, LeadSource, LeadStatus, Priority, PriorityThresholds, ScoringWeights,
    Strategy,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn now() -> DateTime<Utc> {
    init_logging();
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn lead(id: &str, source: LeadSource, status: LeadStatus) -> Lead {
    let mut l = Lead::new(id, source, status);
    l.created_at = Some(now() - Duration::days(1));
    l
}

fn rep(id: &str, open_leads: u32, territories: &[&str]) -> Assignee {
    let mut a = Assignee::new(id, AssigneeRole::SalesRep);
    a.open_leads = open_leads;
    a.territories = territories.iter().map(|t| t.to_string()).collect();
    a
}

#[test]
fn inbound_batch_spreads_across_the_team_round_robin() {
    let batch: Vec<Lead> = (0..6)
        .map(|i| lead(&format!("lead-{i}"), LeadSource::EventSignup, LeadStatus::New))
        .collect();
    let roster = vec![rep("ana", 0, &[]), rep("ben", 0, &[]), rep("cal", 0, &[])];

    let result = assign_at(
        &batch,
        &roster,
        Strategy::RoundRobin,
        AssignOptions::default(),
        now(),
    );

    assert_eq!(result.success, 6);
    assert_eq!(result.failed, 0);
    let order: Vec<&str> = result
        .assignments
        .iter()
        .map(|a| a.assignee_id.as_str())
        .collect();
    assert_eq!(order, vec!["ana", "ben", "cal", "ana", "ben", "cal"]);
}

#[test]
fn workload_strategy_relieves_a_loaded_team() {
    // Ana comes back from vacation to an empty queue while Ben and Cal
    // each carry a backlog; the next burst should flow mostly to Ana.
    let batch: Vec<Lead> = (0..5)
        .map(|i| lead(&format!("lead-{i}"), LeadSource::ContactForm, LeadStatus::New))
        .collect();
    let roster = vec![rep("ben", 4, &[]), rep("cal", 3, &[]), rep("ana", 0, &[])];

    let result = assign_at(
        &batch,
        &roster,
        Strategy::Workload,
        AssignOptions::default(),
        now(),
    );

    let ana_count = result
        .assignments
        .iter()
        .filter(|a| a.assignee_id == "ana")
        .count();
    assert_eq!(ana_count, 4);
    // Once Ana catches up to Cal's backlog, the tie goes to roster order.
    assert_eq!(result.assignee_for("lead-3"), Some("cal"));
}

#[test]
fn territory_strategy_honors_zip_prefixes_with_fallback() {
    let mut seattle_lead = lead("seattle", LeadSource::IncompleteCheckout, LeadStatus::New);
    seattle_lead.zip_code = Some("98107".to_string());
    let mut denver_lead = lead("denver", LeadSource::IncompleteCheckout, LeadStatus::New);
    denver_lead.zip_code = Some("80210".to_string());
    let nowhere_lead = lead("nowhere", LeadSource::IncompleteCheckout, LeadStatus::New);

    let roster = vec![rep("pnw", 0, &["980", "981"]), rep("mountain", 0, &["80"])];

    let result = assign_at(
        &[seattle_lead, denver_lead, nowhere_lead],
        &roster,
        Strategy::Territory,
        AssignOptions::default(),
        now(),
    );

    assert_eq!(result.failed, 0);
    assert_eq!(result.assignee_for("seattle"), Some("pnw"));
    assert_eq!(result.assignee_for("denver"), Some("mountain"));
    // No territory match still gets an owner.
    assert!(result.assignee_for("nowhere").is_some());
}

#[test]
fn mixed_batch_reports_partial_failures_without_aborting() {
    let batch = vec![
        lead("good-1", LeadSource::ContactForm, LeadStatus::New),
        lead("", LeadSource::ContactForm, LeadStatus::New),
        lead("good-2", LeadSource::MedicalRequest, LeadStatus::Contacted),
    ];
    let roster = vec![rep("ana", 0, &[])];

    let result = assign_at(
        &batch,
        &roster,
        Strategy::RoundRobin,
        AssignOptions::default(),
        now(),
    );

    assert_eq!(result.success, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.total(), batch.len());
    assert_eq!(result.failures[0].reason, "missing lead id");
}

#[test]
fn excluding_managers_from_a_manager_only_roster_fails_the_batch() {
    let batch = vec![lead("l1", LeadSource::Manual, LeadStatus::New)];
    let roster = vec![
        Assignee::new("boss", AssigneeRole::SalesManager),
        Assignee::new("bigger-boss", AssigneeRole::SalesManager),
    ];

    let result = assign_at(
        &batch,
        &roster,
        Strategy::Workload,
        AssignOptions {
            exclude_managers: true,
        },
        now(),
    );

    assert_eq!(result.success, 0);
    assert_eq!(result.failed, 1);
    assert_eq!(result.failures[0].reason, "no eligible assignees");
}

#[test]
fn assignments_propose_score_and_priority_for_write_back() {
    let hot = {
        let mut l = lead("hot", LeadSource::MedicalRequest, LeadStatus::Qualified);
        l.contact_count = 3;
        l
    };
    let dead = lead("dead", LeadSource::MedicalRequest, LeadStatus::Spam);
    let roster = vec![rep("ana", 0, &[])];

    let result = assign_at(
        &[hot, dead],
        &roster,
        Strategy::RoundRobin,
        AssignOptions::default(),
        now(),
    );

    let hot_assignment = result
        .assignments
        .iter()
        .find(|a| a.lead_id == "hot")
        .unwrap();
    assert_eq!(hot_assignment.priority, Priority::Hot);

    let dead_assignment = result
        .assignments
        .iter()
        .find(|a| a.lead_id == "dead")
        .unwrap();
    assert!(dead_assignment.score.value() <= 10);
    assert_eq!(dead_assignment.priority, Priority::Cold);
}

#[test]
fn result_serializes_stably_for_persistence() {
    let batch: Vec<Lead> = (0..4)
        .map(|i| lead(&format!("l{i}"), LeadSource::EarlyAccess, LeadStatus::New))
        .collect();
    let roster = vec![rep("ana", 1, &[]), rep("ben", 0, &[])];

    let first = assign_at(
        &batch,
        &roster,
        Strategy::Workload,
        AssignOptions::default(),
        now(),
    );
    let second = assign_at(
        &batch,
        &roster,
        Strategy::Workload,
        AssignOptions::default(),
        now(),
    );

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);

    // And the caller can rehydrate what it persisted.
    let rehydrated: leadroute::AssignmentResult = serde_json::from_str(&first_json).unwrap();
    assert_eq!(rehydrated, first);
}

#[test]
fn rescoring_a_stale_lead_demotes_its_tier() {
    let weights = ScoringWeights::default();
    let thresholds = PriorityThresholds::default();

    let mut l = lead("aging", LeadSource::ContactForm, LeadStatus::New);
    l.created_at = Some(now());
    let fresh_score = score_lead_at(&l, now(), &weights);
    assert_eq!(
        score_to_priority_with(fresh_score, &thresholds),
        Priority::Warm
    );

    l.created_at = Some(now() - Duration::days(90));
    let stale_score = score_lead_at(&l, now(), &weights);
    assert!(stale_score < fresh_score);
    assert_eq!(
        score_to_priority_with(stale_score, &thresholds),
        Priority::Cold
    );
}
