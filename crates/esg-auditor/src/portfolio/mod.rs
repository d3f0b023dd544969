//! Risk register, KPI tracker and action plan, with the aggregators the
//! dashboard and report read from them.

pub mod actions;
mod category;
pub mod kpi;
pub mod risk;

pub use actions::{
    action_completion, normalize_progress, summarize_actions, ActionCompletion, ActionDraft,
    ActionItem, ActionStats, ActionStatus,
};
pub use category::{EsgCategory, RiskCategory};
pub use kpi::{
    count_kpis_on_target, kpi_attainment, snapshot_kpis, Kpi, KpiDraft, KpiSnapshot,
    ON_TARGET_RATIO,
};
pub use risk::{
    count_critical_risks, count_high_risks, rank_risks, risk_severity, summarize_risks,
    RankedRisk, Risk, RiskDraft, RiskMatrix, RiskSeverity, SeverityTier,
};

/// Next `<prefix>-<n>` id, one past the highest numeric suffix already used
/// in the collection.
pub fn next_id<'a>(prefix: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let highest = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-'))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}-{}", highest + 1)
}

#[cfg(test)]
mod tests {
    use super::next_id;

    #[test]
    fn next_id_skips_past_the_highest_suffix() {
        assert_eq!(next_id("risk", Vec::<&str>::new()), "risk-1");
        assert_eq!(
            next_id("risk", ["risk-2", "risk-9", "risk-4"]),
            "risk-10"
        );
        assert_eq!(
            next_id("kpi", ["1712345678901", "kpi-x", "kpi-3"]),
            "kpi-4"
        );
    }
}
