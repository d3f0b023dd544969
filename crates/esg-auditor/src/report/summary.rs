use super::views::{ActionLine, CarbonSummary, KpiOverview, ReportView};
use crate::assessment::{assess, AnswerSheet, Questionnaire};
use crate::carbon::{compute_breakdown, compute_footprint, CarbonState};
use crate::portfolio::{
    action_completion, count_critical_risks, count_high_risks, count_kpis_on_target, rank_risks, snapshot_kpis,
    summarize_actions, summarize_risks, ActionItem, Kpi, Risk,
};
use crate::profile::CompanyProfile;
use chrono::NaiveDate;

/// Number of risks listed in the report.
pub const TOP_RISK_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub questionnaire: &'a Questionnaire,
    pub profile: &'a CompanyProfile,
    pub answers: &'a AnswerSheet,
    pub carbon: &'a CarbonState,
    pub actions: &'a [ActionItem],
    pub risks: &'a [Risk],
    pub kpis: &'a [Kpi],
    pub today: NaiveDate,
}

pub fn compose_report(inputs: ReportInputs<'_>) -> ReportView {
    let ReportInputs {
        questionnaire,
        profile,
        answers,
        carbon,
        actions,
        risks,
        kpis,
        today,
    } = inputs;

    let assessment = assess(questionnaire, answers);

    let mut top_risks = rank_risks(risks);
    top_risks.truncate(TOP_RISK_LIMIT);

    let action_lines = actions
        .iter()
        .map(|action| {
            let status = action.status(today);
            ActionLine {
                id: action.id.clone(),
                title: action.title.clone(),
                responsible: action.responsible.clone(),
                category: action.category,
                category_label: action.category.label(),
                due_date: action.due_date,
                progress: action.progress,
                status,
                status_label: status.label(),
            }
        })
        .collect();

    ReportView {
        company: profile.display_name().to_string(),
        contact: profile.email.trim().to_string(),
        generated_on: today,
        global: assessment.global,
        sections: assessment.sections,
        roadmap: assessment.roadmap,
        completion: assessment.completion,
        carbon: CarbonSummary {
            calculated: carbon.calculated,
            footprint: compute_footprint(&carbon.record),
            breakdown: compute_breakdown(&carbon.record),
        },
        action_completion: action_completion(actions),
        action_stats: summarize_actions(actions, today),
        actions: action_lines,
        critical_risks: count_critical_risks(risks),
        high_risks: count_high_risks(risks),
        risk_matrix: summarize_risks(risks),
        top_risks,
        kpis: KpiOverview {
            total: kpis.len(),
            on_target: count_kpis_on_target(kpis),
            items: snapshot_kpis(kpis),
        },
    }
}
