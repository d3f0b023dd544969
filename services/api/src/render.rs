use esg_auditor::report::ReportView;
use std::fmt;

/// Plain-text rendering of the report for terminals and printing.
pub(crate) struct TextReport<'a>(pub(crate) &'a ReportView);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(f, "ESG report: {}", report.company)?;
        if !report.contact.is_empty() {
            writeln!(f, "Contact: {}", report.contact)?;
        }
        writeln!(f, "Generated: {}", report.generated_on)?;

        writeln!(
            f,
            "\nGlobal score: {}% ({})",
            report.global.percentage, report.global.level_label
        )?;
        writeln!(
            f,
            "Questions answered: {}/{} ({}%)",
            report.completion.answered, report.completion.total, report.completion.percentage
        )?;

        writeln!(f, "\nSections")?;
        for section in &report.sections {
            writeln!(
                f,
                "- {} [{}]: {}% ({}/{} points, {})",
                section.label,
                section.norm,
                section.percentage,
                section.points,
                section.max_points,
                section.level().label()
            )?;
        }

        writeln!(f, "\nRoadmap")?;
        for entry in &report.roadmap {
            writeln!(
                f,
                "{}. {} ({}%): {}",
                entry.rank, entry.label, entry.percentage, entry.priority_label
            )?;
        }

        if report.carbon.calculated {
            let footprint = report.carbon.footprint.rounded(2);
            writeln!(f, "\nCarbon footprint (tCO2e)")?;
            writeln!(f, "- Scope 1: {:.2}", footprint.scope1)?;
            writeln!(f, "- Scope 2: {:.2}", footprint.scope2)?;
            writeln!(f, "- Scope 3: {:.2}", footprint.scope3)?;
            writeln!(f, "- Total: {:.2}", footprint.total)?;
        } else {
            writeln!(f, "\nCarbon footprint: not calculated")?;
        }

        writeln!(
            f,
            "\nAction plan: {} completed, {} in progress, {} overdue",
            report.action_completion.label,
            report.action_stats.in_progress,
            report.action_stats.overdue
        )?;
        for action in &report.actions {
            writeln!(
                f,
                "- {} ({}), due {}, {}% [{}]",
                action.title,
                action.responsible,
                action.due_date,
                action.progress,
                action.status_label
            )?;
        }

        if report.top_risks.is_empty() {
            writeln!(f, "\nRisks: none recorded")?;
        } else {
            writeln!(
                f,
                "\nRisks: {} recorded, {} critical, {} high",
                report.risk_matrix.total, report.critical_risks, report.high_risks
            )?;
            for risk in &report.top_risks {
                writeln!(
                    f,
                    "- [{}] {} ({}): score {}",
                    risk.tier_label, risk.name, risk.category_label, risk.score
                )?;
            }
        }

        writeln!(
            f,
            "\nKPIs: {}/{} on target",
            report.kpis.on_target, report.kpis.total
        )?;
        for kpi in &report.kpis.items {
            let marker = if kpi.on_target { "on target" } else { "below target" };
            writeln!(
                f,
                "- {}: {} / {} {} ({}%, {})",
                kpi.name, kpi.current, kpi.target, kpi.unit, kpi.attainment_pct, marker
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use esg_auditor::assessment::Answer;
    use esg_auditor::portfolio::{RiskCategory, RiskDraft};
    use esg_auditor::store::MemoryStore;
    use esg_auditor::workspace::AuditorWorkspace;
    use std::sync::Arc;

    #[test]
    fn text_report_lists_scores_and_risks() {
        let workspace = AuditorWorkspace::new(Arc::new(MemoryStore::default()));
        workspace
            .sign_in("Acme Metals", "ops@acme.test")
            .expect("profile saved");
        workspace
            .record_answer("q1", Answer::Yes)
            .expect("answer recorded");
        workspace
            .add_risk(RiskDraft {
                name: "Tailings dam failure".to_string(),
                category: RiskCategory::Environmental,
                probability: 4,
                impact: 5,
                mitigation: String::new(),
            })
            .expect("risk saved");

        let today = NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date");
        let text = TextReport(&workspace.report(today)).to_string();

        assert!(text.starts_with("ESG report: Acme Metals"));
        assert!(text.contains("Generated: 2026-10-17"));
        assert!(text.contains("- Quality [ISO 9001]: 25%"));
        assert!(text.contains("Carbon footprint: not calculated"));
        assert!(text.contains("Risks: 1 recorded, 1 critical, 0 high"));
        assert!(text.contains("[Critical] Tailings dam failure"));
        assert!(text.contains("Action plan: 0/0 completed"));
    }
}
