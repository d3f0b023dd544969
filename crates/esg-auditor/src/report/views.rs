use crate::assessment::{Completion, GlobalScore, RoadmapEntry, SectionScore};
use crate::carbon::{EmissionLine, Footprint};
use crate::portfolio::{
    ActionCompletion, ActionStats, ActionStatus, EsgCategory, KpiSnapshot, RankedRisk, RiskMatrix,
};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarbonSummary {
    pub calculated: bool,
    pub footprint: Footprint,
    pub breakdown: Vec<EmissionLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionLine {
    pub id: String,
    pub title: String,
    pub responsible: String,
    pub category: EsgCategory,
    pub category_label: &'static str,
    pub due_date: NaiveDate,
    pub progress: u8,
    pub status: ActionStatus,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiOverview {
    pub total: usize,
    pub on_target: usize,
    pub items: Vec<KpiSnapshot>,
}

/// Everything the printable report shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub company: String,
    pub contact: String,
    pub generated_on: NaiveDate,
    pub global: GlobalScore,
    pub sections: Vec<SectionScore>,
    pub roadmap: Vec<RoadmapEntry>,
    pub completion: Completion,
    pub carbon: CarbonSummary,
    pub action_completion: ActionCompletion,
    pub action_stats: ActionStats,
    pub actions: Vec<ActionLine>,
    pub critical_risks: usize,
    pub high_risks: usize,
    pub risk_matrix: RiskMatrix,
    pub top_risks: Vec<RankedRisk>,
    pub kpis: KpiOverview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl DiagnosticStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionPercentage {
    pub id: String,
    pub label: String,
    pub norm: String,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub company: String,
    pub global: GlobalScore,
    pub sections: Vec<SectionPercentage>,
    pub completion: Completion,
    pub diagnostic_status: DiagnosticStatus,
    pub diagnostic_status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_total: Option<f64>,
    pub has_data: bool,
}
