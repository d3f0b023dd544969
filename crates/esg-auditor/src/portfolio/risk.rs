use super::category::RiskCategory;
use serde::{Deserialize, Serialize};

/// Scores at or above this are critical.
pub const CRITICAL_THRESHOLD: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityTier {
    pub const fn from_score(score: u8) -> Self {
        if score >= CRITICAL_THRESHOLD {
            Self::Critical
        } else if score >= 10 {
            Self::High
        } else if score >= 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskSeverity {
    pub score: u8,
    pub tier: SeverityTier,
}

/// Probability times impact. Both inputs are clamped into 1..=5 first, so the
/// score always falls in 1..=25.
pub fn risk_severity(probability: u8, impact: u8) -> RiskSeverity {
    let score = probability.clamp(1, 5) * impact.clamp(1, 5);
    RiskSeverity {
        score,
        tier: SeverityTier::from_score(score),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub id: String,
    pub name: String,
    pub category: RiskCategory,
    pub probability: u8,
    pub impact: u8,
    #[serde(default)]
    pub mitigation: String,
}

impl Risk {
    pub fn severity(&self) -> RiskSeverity {
        risk_severity(self.probability, self.impact)
    }
}

/// User input for a new risk; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RiskDraft {
    pub name: String,
    pub category: RiskCategory,
    #[serde(default = "default_rating")]
    pub probability: u8,
    #[serde(default = "default_rating")]
    pub impact: u8,
    #[serde(default)]
    pub mitigation: String,
}

fn default_rating() -> u8 {
    3
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRisk {
    pub id: String,
    pub name: String,
    pub category: RiskCategory,
    pub category_label: &'static str,
    pub probability: u8,
    pub impact: u8,
    pub score: u8,
    pub tier: SeverityTier,
    pub tier_label: &'static str,
    pub mitigation: String,
}

impl RankedRisk {
    fn from_risk(risk: &Risk) -> Self {
        let severity = risk.severity();
        Self {
            id: risk.id.clone(),
            name: risk.name.clone(),
            category: risk.category,
            category_label: risk.category.label(),
            probability: risk.probability,
            impact: risk.impact,
            score: severity.score,
            tier: severity.tier,
            tier_label: severity.tier.label(),
            mitigation: risk.mitigation.clone(),
        }
    }
}

/// Risks by descending severity score. Callers must not rely on the order of
/// equal scores.
pub fn rank_risks(risks: &[Risk]) -> Vec<RankedRisk> {
    let mut ranked: Vec<RankedRisk> = risks.iter().map(RankedRisk::from_risk).collect();
    ranked.sort_unstable_by(|left, right| right.score.cmp(&left.score));
    ranked
}

pub fn count_critical_risks(risks: &[Risk]) -> usize {
    risks
        .iter()
        .filter(|risk| risk.severity().tier == SeverityTier::Critical)
        .count()
}

pub fn count_high_risks(risks: &[Risk]) -> usize {
    risks
        .iter()
        .filter(|risk| risk.severity().tier == SeverityTier::High)
        .count()
}

/// Count of risks per severity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskMatrix {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

pub fn summarize_risks(risks: &[Risk]) -> RiskMatrix {
    risks
        .iter()
        .fold(RiskMatrix::default(), |mut matrix, risk| {
            matrix.total += 1;
            match risk.severity().tier {
                SeverityTier::Low => matrix.low += 1,
                SeverityTier::Medium => matrix.medium += 1,
                SeverityTier::High => matrix.high += 1,
                SeverityTier::Critical => matrix.critical += 1,
            }
            matrix
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(id: &str, probability: u8, impact: u8) -> Risk {
        Risk {
            id: id.to_string(),
            name: format!("risk {id}"),
            category: RiskCategory::Operational,
            probability,
            impact,
            mitigation: String::new(),
        }
    }

    #[test]
    fn severity_matches_reference_examples() {
        let severe = risk_severity(5, 4);
        assert_eq!(severe.score, 20);
        assert_eq!(severe.tier, SeverityTier::Critical);
        assert_eq!(severe.tier.label(), "Critical");

        let minor = risk_severity(1, 1);
        assert_eq!(minor.score, 1);
        assert_eq!(minor.tier.label(), "Low");
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(risk_severity(3, 5).tier, SeverityTier::Critical); // 15
        assert_eq!(risk_severity(2, 7).tier, SeverityTier::High); // clamped to 2x5
        assert_eq!(risk_severity(2, 5).tier, SeverityTier::High); // 10
        assert_eq!(risk_severity(3, 3).tier, SeverityTier::Medium); // 9
        assert_eq!(risk_severity(1, 5).tier, SeverityTier::Medium); // 5
        assert_eq!(risk_severity(2, 2).tier, SeverityTier::Low); // 4
    }

    #[test]
    fn out_of_range_ratings_are_clamped() {
        assert_eq!(risk_severity(0, 0).score, 1);
        assert_eq!(risk_severity(9, 200).score, 25);
    }

    #[test]
    fn ranking_is_descending_by_score() {
        let risks = vec![risk("a", 1, 2), risk("b", 5, 5), risk("c", 3, 3), risk("d", 4, 4)];
        let ranked = rank_risks(&risks);
        let scores: Vec<u8> = ranked.iter().map(|risk| risk.score).collect();
        assert_eq!(scores, [25, 16, 9, 2]);
        assert_eq!(ranked[0].tier_label, "Critical");
    }

    #[test]
    fn portfolio_counts() {
        let risks = vec![
            risk("a", 5, 3),
            risk("b", 5, 5),
            risk("c", 2, 5),
            risk("d", 1, 1),
        ];
        assert_eq!(count_critical_risks(&risks), 2);
        assert_eq!(count_high_risks(&risks), 1);

        let matrix = summarize_risks(&risks);
        assert_eq!(matrix.total, 4);
        assert_eq!(matrix.critical, 2);
        assert_eq!(matrix.high, 1);
        assert_eq!(matrix.medium, 0);
        assert_eq!(matrix.low, 1);
    }
}
