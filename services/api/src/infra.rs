use chrono::NaiveDate;
use esg_auditor::assessment::Answer;
use esg_auditor::carbon::{
    compute_breakdown, compute_footprint, CarbonRecord, CarbonState, EmissionLine, Footprint,
};
use esg_auditor::error::AppError;
use esg_auditor::portfolio::{EsgCategory, RiskCategory};
use esg_auditor::profile::CompanyProfile;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileView {
    pub(crate) company: String,
    pub(crate) email: String,
    pub(crate) display_name: String,
    pub(crate) signed_in: bool,
}

impl From<CompanyProfile> for ProfileView {
    fn from(profile: CompanyProfile) -> Self {
        Self {
            display_name: profile.display_name().to_string(),
            signed_in: profile.is_signed_in(),
            company: profile.company,
            email: profile.email,
        }
    }
}

/// Carbon inputs alongside the derived totals, rounded for display.
#[derive(Debug, Serialize)]
pub(crate) struct CarbonView {
    pub(crate) calculated: bool,
    pub(crate) record: CarbonRecord,
    pub(crate) footprint: Footprint,
    pub(crate) breakdown: Vec<EmissionLine>,
}

impl From<CarbonState> for CarbonView {
    fn from(state: CarbonState) -> Self {
        let breakdown = compute_breakdown(&state.record);
        let footprint = compute_footprint(&state.record).rounded(2);
        Self {
            calculated: state.calculated,
            record: state.record,
            footprint,
            breakdown,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_answer(raw: &str) -> Result<Answer, String> {
    Answer::parse(raw).ok_or_else(|| format!("'{raw}' is not one of yes, partial, no"))
}

pub(crate) fn parse_esg_category(raw: &str) -> Result<EsgCategory, String> {
    EsgCategory::parse(raw).ok_or_else(|| {
        format!("'{raw}' is not one of environmental, social, governance, quality")
    })
}

pub(crate) fn parse_risk_category(raw: &str) -> Result<RiskCategory, String> {
    RiskCategory::parse(raw).ok_or_else(|| {
        format!("'{raw}' is not one of environmental, social, governance, operational")
    })
}

/// Parses a snake_case wire token (`natural_gas`, `long-haul-flights`) into
/// any enum that deserializes from one.
pub(crate) fn parse_token<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let token = raw.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(token))
        .map_err(|_| format!("unrecognized value '{raw}'"))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}
