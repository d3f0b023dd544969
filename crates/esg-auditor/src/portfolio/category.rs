use serde::{Deserialize, Serialize};

/// Category shared by KPIs and action items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EsgCategory {
    Environmental,
    Social,
    Governance,
    Quality,
}

impl EsgCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Environmental => "Environmental",
            Self::Social => "Social",
            Self::Governance => "Governance",
            Self::Quality => "Quality",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "environmental" | "environment" => Some(Self::Environmental),
            "social" => Some(Self::Social),
            "governance" => Some(Self::Governance),
            "quality" => Some(Self::Quality),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Environmental,
    Social,
    Governance,
    Operational,
}

impl RiskCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Environmental => "Environmental",
            Self::Social => "Social",
            Self::Governance => "Governance",
            Self::Operational => "Operational",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "environmental" | "environment" => Some(Self::Environmental),
            "social" => Some(Self::Social),
            "governance" => Some(Self::Governance),
            "operational" | "operations" => Some(Self::Operational),
            _ => None,
        }
    }
}
