use super::views::{DashboardView, DiagnosticStatus, SectionPercentage};
use crate::assessment::{assess, DiagnosticRecord, DiagnosticStep, Questionnaire};
use crate::carbon::{compute_footprint, CarbonState};
use crate::profile::CompanyProfile;

#[derive(Debug, Clone, Copy)]
pub struct DashboardInputs<'a> {
    pub questionnaire: &'a Questionnaire,
    pub profile: &'a CompanyProfile,
    pub diagnostic: &'a DiagnosticRecord,
    pub carbon: &'a CarbonState,
}

pub fn compose_dashboard(inputs: DashboardInputs<'_>) -> DashboardView {
    let DashboardInputs {
        questionnaire,
        profile,
        diagnostic,
        carbon,
    } = inputs;

    let assessment = assess(questionnaire, &diagnostic.answers);

    let diagnostic_status = if diagnostic.step == DiagnosticStep::Results {
        DiagnosticStatus::Completed
    } else if assessment.completion.answered > 0 {
        DiagnosticStatus::InProgress
    } else {
        DiagnosticStatus::NotStarted
    };

    let carbon_total = carbon
        .calculated
        .then(|| compute_footprint(&carbon.record).total);

    let sections = assessment
        .sections
        .iter()
        .map(|score| SectionPercentage {
            id: score.id.clone(),
            label: score.label.clone(),
            norm: score.norm.clone(),
            percentage: score.percentage,
        })
        .collect();

    DashboardView {
        company: profile.display_name().to_string(),
        global: assessment.global,
        sections,
        completion: assessment.completion,
        diagnostic_status,
        diagnostic_status_label: diagnostic_status.label(),
        carbon_total,
        has_data: diagnostic_status != DiagnosticStatus::NotStarted || carbon_total.is_some(),
    }
}
