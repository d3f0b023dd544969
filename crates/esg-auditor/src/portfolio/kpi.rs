use super::category::EsgCategory;
use serde::{Deserialize, Serialize};

/// Attainment at or above this ratio counts as on target.
pub const ON_TARGET_RATIO: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub current: f64,
    pub target: f64,
    pub category: EsgCategory,
}

impl Kpi {
    pub fn attainment(&self) -> f64 {
        kpi_attainment(self.current, self.target)
    }

    pub fn is_on_target(&self) -> bool {
        self.attainment() >= ON_TARGET_RATIO
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KpiDraft {
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub current: f64,
    #[serde(default = "default_target")]
    pub target: f64,
    pub category: EsgCategory,
}

fn default_target() -> f64 {
    100.0
}

/// `current / target`, or zero when the target is not positive or either
/// value, or the ratio itself, is not finite.
pub fn kpi_attainment(current: f64, target: f64) -> f64 {
    if !current.is_finite() || !target.is_finite() || target <= 0.0 {
        return 0.0;
    }
    let ratio = current / target;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub category: EsgCategory,
    pub category_label: &'static str,
    pub current: f64,
    pub target: f64,
    pub ratio: f64,
    /// Ratio as a whole percentage, capped at 100 for progress bars.
    pub attainment_pct: u8,
    pub on_target: bool,
}

impl KpiSnapshot {
    pub fn from_kpi(kpi: &Kpi) -> Self {
        let ratio = kpi.attainment();
        Self {
            id: kpi.id.clone(),
            name: kpi.name.clone(),
            unit: kpi.unit.clone(),
            category: kpi.category,
            category_label: kpi.category.label(),
            current: kpi.current,
            target: kpi.target,
            ratio,
            attainment_pct: (ratio * 100.0).round().clamp(0.0, 100.0) as u8,
            on_target: ratio >= ON_TARGET_RATIO,
        }
    }
}

pub fn snapshot_kpis(kpis: &[Kpi]) -> Vec<KpiSnapshot> {
    kpis.iter().map(KpiSnapshot::from_kpi).collect()
}

pub fn count_kpis_on_target(kpis: &[Kpi]) -> usize {
    kpis.iter().filter(|kpi| kpi.is_on_target()).count()
}
