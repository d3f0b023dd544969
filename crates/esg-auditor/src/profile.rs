use serde::{Deserialize, Serialize};

/// Company the assessment is for, plus the contact who signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub company: String,
    pub email: String,
}

impl CompanyProfile {
    pub const FALLBACK_NAME: &'static str = "Company";

    pub fn is_signed_in(&self) -> bool {
        !self.company.trim().is_empty()
    }

    pub fn display_name(&self) -> &str {
        let name = self.company.trim();
        if name.is_empty() {
            Self::FALLBACK_NAME
        } else {
            name
        }
    }
}
