use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use esg_auditor::assessment::{Answer, DiagnosticStep};
use esg_auditor::carbon::{CarbonRecord, CarbonState, EmissionSource};
use esg_auditor::portfolio::{ActionDraft, EsgCategory, KpiDraft, RiskCategory, RiskDraft};
use esg_auditor::report::DiagnosticStatus;
use esg_auditor::store::{KeyValueStore, MemoryStore, StoreKey};
use esg_auditor::workspace::{AuditorWorkspace, WorkspaceError};

fn workspace() -> (Arc<MemoryStore>, AuditorWorkspace<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let workspace = AuditorWorkspace::new(Arc::clone(&store));
    (store, workspace)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn risk_draft(name: &str, probability: u8, impact: u8) -> RiskDraft {
    RiskDraft {
        name: name.to_string(),
        category: RiskCategory::Environmental,
        probability,
        impact,
        mitigation: String::new(),
    }
}

fn action_draft(title: &str, due_date: NaiveDate) -> ActionDraft {
    ActionDraft {
        title: title.to_string(),
        responsible: "Operations".to_string(),
        due_date: Some(due_date),
        category: EsgCategory::Environmental,
    }
}

#[test]
fn sign_in_trims_and_requires_fields() {
    let (_, workspace) = workspace();

    let err = workspace
        .sign_in("   ", "ops@example.com")
        .expect_err("blank company rejected");
    assert!(matches!(err, WorkspaceError::MissingField("company")));

    let profile = workspace
        .sign_in("  Acme Metals ", " ops@example.com ")
        .expect("profile saved");
    assert_eq!(profile.company, "Acme Metals");
    assert_eq!(profile.email, "ops@example.com");
    assert_eq!(workspace.profile(), profile);
    assert_eq!(workspace.dashboard().company, "Acme Metals");
}

#[test]
fn sign_out_keeps_registers() {
    let (store, workspace) = workspace();
    workspace
        .sign_in("Acme", "ops@example.com")
        .expect("profile saved");
    workspace
        .record_answer("a1", Answer::Yes)
        .expect("answer recorded");
    workspace
        .set_carbon_field(EmissionSource::Diesel, "40")
        .expect("carbon saved");
    workspace
        .add_risk(risk_draft("Spill", 4, 4))
        .expect("risk saved");
    workspace
        .add_kpi(KpiDraft {
            name: "Recycled share".to_string(),
            unit: "%".to_string(),
            current: 40.0,
            target: 60.0,
            category: EsgCategory::Environmental,
        })
        .expect("kpi saved");
    workspace
        .add_action(action_draft("Install meters", date(2026, 12, 1)))
        .expect("action saved");

    workspace.sign_out().expect("sign out succeeds");

    for key in StoreKey::session_scoped() {
        assert_eq!(store.get(key.as_str()).expect("memory read"), None);
    }
    assert!(!workspace.profile().is_signed_in());
    assert!(workspace.diagnostic().answers.is_empty());
    assert_eq!(workspace.footprint().total, 0.0);
    assert_eq!(workspace.risks().len(), 1);
    assert_eq!(workspace.kpis().len(), 1);
    assert_eq!(workspace.actions().len(), 1);
}

#[test]
fn unknown_questions_are_rejected() {
    let (_, workspace) = workspace();
    let err = workspace
        .record_answer("z9", Answer::Yes)
        .expect_err("unknown question rejected");
    assert!(matches!(err, WorkspaceError::UnknownQuestion(ref id) if id == "z9"));
    assert!(workspace.diagnostic().answers.is_empty());
}

#[test]
fn diagnostic_progress_drives_dashboard_status() {
    let (_, workspace) = workspace();
    assert_eq!(
        workspace.dashboard().diagnostic_status,
        DiagnosticStatus::NotStarted
    );

    workspace
        .record_answer("s1", Answer::Partial)
        .expect("answer recorded");
    assert_eq!(
        workspace.dashboard().diagnostic_status,
        DiagnosticStatus::InProgress
    );

    workspace
        .set_step(DiagnosticStep::Results)
        .expect("step saved");
    assert_eq!(
        workspace.dashboard().diagnostic_status,
        DiagnosticStatus::Completed
    );

    let record = workspace.clear_answer("s1").expect("answer cleared");
    assert!(record.answers.is_empty());

    workspace.reset_diagnostic().expect("diagnostic reset");
    assert_eq!(workspace.diagnostic().step, DiagnosticStep::Answering);
}

#[test]
fn carbon_total_appears_after_calculation() {
    let (_, workspace) = workspace();
    workspace
        .update_carbon(CarbonRecord {
            gasoline: "100".to_string(),
            ..CarbonRecord::default()
        })
        .expect("carbon saved");

    assert!(!workspace.carbon().calculated);
    assert_eq!(workspace.dashboard().carbon_total, None);

    workspace.mark_calculated().expect("carbon calculated");
    let total = workspace
        .dashboard()
        .carbon_total
        .expect("total shown once calculated");
    assert!((total - 231.0).abs() < 1e-9);

    workspace.reset_carbon().expect("carbon reset");
    assert_eq!(workspace.carbon(), CarbonState::default());
}

#[test]
fn risks_are_clamped_and_removed_by_id() {
    let (_, workspace) = workspace();
    let first = workspace
        .add_risk(risk_draft("Flood", 9, 0))
        .expect("risk saved");
    assert_eq!(first.id, "risk-1");
    assert_eq!((first.probability, first.impact), (5, 1));

    let err = workspace
        .add_risk(risk_draft("  ", 3, 3))
        .expect_err("name required");
    assert!(matches!(err, WorkspaceError::MissingField("name")));

    let second = workspace
        .add_risk(risk_draft("Supplier fraud", 3, 3))
        .expect("risk saved");
    assert_eq!(second.id, "risk-2");

    workspace.remove_risk("risk-1").expect("risk removed");
    let err = workspace
        .remove_risk("risk-1")
        .expect_err("second removal fails");
    assert!(matches!(err, WorkspaceError::NotFound { kind: "risk", .. }));

    let third = workspace
        .add_risk(risk_draft("Heat stress", 2, 2))
        .expect("risk saved");
    assert_eq!(third.id, "risk-3");
}

#[test]
fn kpi_updates_replace_current_value() {
    let (_, workspace) = workspace();
    let kpi = workspace
        .add_kpi(KpiDraft {
            name: "Training hours".to_string(),
            unit: "h".to_string(),
            current: 10.0,
            target: 100.0,
            category: EsgCategory::Social,
        })
        .expect("kpi saved");
    assert!(!kpi.is_on_target());

    let updated = workspace
        .update_kpi_current(&kpi.id, 80.0)
        .expect("kpi updated");
    assert!(updated.is_on_target());

    let err = workspace
        .update_kpi_current("kpi-99", 1.0)
        .expect_err("unknown kpi");
    assert!(matches!(err, WorkspaceError::NotFound { kind: "kpi", .. }));

    workspace.remove_kpi(&kpi.id).expect("kpi removed");
    assert!(workspace.kpis().is_empty());
}

#[test]
fn action_progress_feeds_the_report() {
    let (_, workspace) = workspace();
    let today = date(2026, 10, 17);

    let err = workspace
        .add_action(ActionDraft {
            due_date: None,
            ..action_draft("Audit suppliers", today)
        })
        .expect_err("due date required");
    assert!(matches!(err, WorkspaceError::MissingField("due_date")));

    let first = workspace
        .add_action(action_draft("Audit suppliers", date(2026, 9, 1)))
        .expect("action saved");
    let second = workspace
        .add_action(action_draft("Publish policy", date(2026, 12, 1)))
        .expect("action saved");
    assert_eq!(first.progress, 0);

    let done = workspace
        .update_action_progress(&first.id, 100)
        .expect("progress saved");
    assert!(done.is_completed());
    let half = workspace
        .update_action_progress(&second.id, 47)
        .expect("progress saved");
    assert_eq!(half.progress, 50);

    let report = workspace.report(today);
    assert_eq!(report.action_completion.label, "1/2");
    assert_eq!(report.action_stats.completed, 1);
    assert_eq!(report.action_stats.in_progress, 1);
    assert_eq!(report.action_stats.overdue, 0);
    assert_eq!(report.generated_on, today);

    workspace.remove_action(&first.id).expect("action removed");
    assert_eq!(workspace.actions().len(), 1);
}

#[test]
fn malformed_stored_values_load_as_defaults() {
    let (store, workspace) = workspace();
    for key in StoreKey::ordered() {
        store
            .set(key.as_str(), "{not json".to_string())
            .expect("memory write");
    }

    assert!(!workspace.profile().is_signed_in());
    assert!(workspace.diagnostic().answers.is_empty());
    assert_eq!(workspace.carbon(), CarbonState::default());
    assert!(workspace.risks().is_empty());
    assert!(workspace.kpis().is_empty());
    assert!(workspace.actions().is_empty());

    let report = workspace.report(date(2026, 10, 17));
    assert_eq!(report.global.percentage, 0);
    assert_eq!(report.action_completion.label, "0/0");

    workspace
        .add_risk(risk_draft("Drought", 2, 3))
        .expect("writes recover after corrupt data");
    assert_eq!(workspace.risks().len(), 1);
}

#[test]
fn reads_between_writes_are_stable() {
    let (_, workspace) = workspace();
    workspace
        .record_answer("g1", Answer::Yes)
        .expect("answer recorded");
    workspace
        .add_risk(risk_draft("Bribery", 5, 4))
        .expect("risk saved");

    let today = date(2026, 10, 17);
    assert_eq!(workspace.report(today), workspace.report(today));
    assert_eq!(workspace.dashboard(), workspace.dashboard());
    assert_eq!(workspace.assessment(), workspace.assessment());
}

#[test]
fn concurrent_writers_do_not_lose_updates() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 25;

    let (_, workspace) = workspace();

    thread::scope(|scope| {
        for writer in 0..WRITERS {
            let workspace = &workspace;
            scope.spawn(move || {
                for item in 0..PER_WRITER {
                    workspace
                        .add_risk(risk_draft(&format!("risk {writer}-{item}"), 2, 2))
                        .expect("risk saved");
                    if item % 5 == 0 {
                        workspace
                            .record_answer("a1", Answer::Partial)
                            .expect("answer recorded");
                    }
                }
            });
        }
    });

    let risks = workspace.risks();
    assert_eq!(risks.len(), WRITERS * PER_WRITER);
    let ids: HashSet<&str> = risks.iter().map(|risk| risk.id.as_str()).collect();
    assert_eq!(ids.len(), WRITERS * PER_WRITER, "every risk keeps a unique id");
    let names: HashSet<&str> = risks.iter().map(|risk| risk.name.as_str()).collect();
    assert_eq!(names.len(), WRITERS * PER_WRITER);
}
