use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::assessment::{
    assess, Answer, Assessment, DiagnosticRecord, DiagnosticStep, Questionnaire,
};
use crate::carbon::{compute_footprint, CarbonRecord, CarbonState, EmissionSource, Footprint};
use crate::portfolio::{
    next_id, normalize_progress, ActionDraft, ActionItem, Kpi, KpiDraft, Risk, RiskDraft,
};
use crate::profile::CompanyProfile;
use crate::report::{
    compose_dashboard, compose_report, DashboardInputs, DashboardView, ReportInputs, ReportView,
};
use crate::store::{self, KeyValueStore, StoreError, StoreKey};

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the store handle and the questionnaire every view is scored against.
///
/// Mutations hold `writes` from the first read to the final write, so
/// concurrent callers sharing one workspace never overwrite each other.
pub struct AuditorWorkspace<S> {
    store: Arc<S>,
    questionnaire: Questionnaire,
    writes: Mutex<()>,
}

fn required(value: &str, field: &'static str) -> Result<String, WorkspaceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WorkspaceError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl<S> AuditorWorkspace<S>
where
    S: KeyValueStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_questionnaire(store, Questionnaire::reference().clone())
    }

    pub fn with_questionnaire(store: Arc<S>, questionnaire: Questionnaire) -> Self {
        Self {
            store,
            questionnaire,
            writes: Mutex::new(()),
        }
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    fn write_guard(&self) -> Result<MutexGuard<'_, ()>, WorkspaceError> {
        self.writes.lock().map_err(|_| {
            WorkspaceError::Store(StoreError::Unavailable(
                "workspace write lock poisoned".to_string(),
            ))
        })
    }

    fn load<T: DeserializeOwned + Default>(&self, key: StoreKey) -> T {
        store::load_or_default(self.store.as_ref(), key)
    }

    fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), WorkspaceError> {
        store::save(self.store.as_ref(), key, value)?;
        Ok(())
    }

    fn update_collection<T, R, F>(&self, key: StoreKey, apply: F) -> Result<R, WorkspaceError>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce(&mut Vec<T>) -> Result<R, WorkspaceError>,
    {
        let _writes = self.write_guard()?;
        let mut items: Vec<T> = store::load_collection(self.store.as_ref(), key);
        let result = apply(&mut items)?;
        self.save(key, &items)?;
        debug!(key = key.as_str(), len = items.len(), "collection updated");
        Ok(result)
    }

    // Profile

    pub fn profile(&self) -> CompanyProfile {
        self.load(StoreKey::Profile)
    }

    pub fn sign_in(&self, company: &str, email: &str) -> Result<CompanyProfile, WorkspaceError> {
        let profile = CompanyProfile {
            company: required(company, "company")?,
            email: required(email, "email")?,
        };
        let _writes = self.write_guard()?;
        self.save(StoreKey::Profile, &profile)?;
        debug!(company = %profile.company, "profile saved");
        Ok(profile)
    }

    /// Clears the profile, diagnostic and carbon data. Registers are kept.
    pub fn sign_out(&self) -> Result<(), WorkspaceError> {
        let _writes = self.write_guard()?;
        for key in StoreKey::session_scoped() {
            store::clear(self.store.as_ref(), key)?;
        }
        debug!("session data cleared");
        Ok(())
    }

    // Diagnostic

    pub fn diagnostic(&self) -> DiagnosticRecord {
        self.load(StoreKey::Diagnostic)
    }

    pub fn assessment(&self) -> Assessment {
        assess(&self.questionnaire, &self.diagnostic().answers)
    }

    pub fn record_answer(
        &self,
        question_id: &str,
        answer: Answer,
    ) -> Result<DiagnosticRecord, WorkspaceError> {
        if !self.questionnaire.contains_question(question_id) {
            return Err(WorkspaceError::UnknownQuestion(question_id.to_string()));
        }

        let _writes = self.write_guard()?;
        let mut record = self.diagnostic();
        record.answers.set(question_id, answer);
        self.save(StoreKey::Diagnostic, &record)?;
        debug!(question_id, answer = answer.label(), "answer recorded");
        Ok(record)
    }

    pub fn clear_answer(&self, question_id: &str) -> Result<DiagnosticRecord, WorkspaceError> {
        let _writes = self.write_guard()?;
        let mut record = self.diagnostic();
        if record.answers.clear(question_id).is_some() {
            self.save(StoreKey::Diagnostic, &record)?;
        }
        Ok(record)
    }

    pub fn set_step(&self, step: DiagnosticStep) -> Result<DiagnosticRecord, WorkspaceError> {
        let _writes = self.write_guard()?;
        let mut record = self.diagnostic();
        record.step = step;
        self.save(StoreKey::Diagnostic, &record)?;
        Ok(record)
    }

    pub fn reset_diagnostic(&self) -> Result<(), WorkspaceError> {
        let _writes = self.write_guard()?;
        store::clear(self.store.as_ref(), StoreKey::Diagnostic)?;
        Ok(())
    }

    // Carbon

    pub fn carbon(&self) -> CarbonState {
        self.load(StoreKey::Carbon)
    }

    pub fn footprint(&self) -> Footprint {
        compute_footprint(&self.carbon().record)
    }

    /// Replaces the activity inputs; the calculated flag is left as it was.
    pub fn update_carbon(&self, record: CarbonRecord) -> Result<CarbonState, WorkspaceError> {
        let _writes = self.write_guard()?;
        let mut state = self.carbon();
        state.record = record;
        self.save(StoreKey::Carbon, &state)?;
        Ok(state)
    }

    pub fn set_carbon_field(
        &self,
        source: EmissionSource,
        value: &str,
    ) -> Result<CarbonState, WorkspaceError> {
        let _writes = self.write_guard()?;
        let mut state = self.carbon();
        state.record.set(source, value.trim());
        self.save(StoreKey::Carbon, &state)?;
        Ok(state)
    }

    pub fn mark_calculated(&self) -> Result<CarbonState, WorkspaceError> {
        let _writes = self.write_guard()?;
        let mut state = self.carbon();
        state.calculated = true;
        self.save(StoreKey::Carbon, &state)?;
        debug!(total = compute_footprint(&state.record).total, "carbon footprint calculated");
        Ok(state)
    }

    pub fn reset_carbon(&self) -> Result<(), WorkspaceError> {
        let _writes = self.write_guard()?;
        store::clear(self.store.as_ref(), StoreKey::Carbon)?;
        Ok(())
    }

    // Risks

    pub fn risks(&self) -> Vec<Risk> {
        store::load_collection(self.store.as_ref(), StoreKey::Risks)
    }

    pub fn add_risk(&self, draft: RiskDraft) -> Result<Risk, WorkspaceError> {
        let name = required(&draft.name, "name")?;
        self.update_collection(StoreKey::Risks, |risks: &mut Vec<Risk>| {
            let risk = Risk {
                id: next_id("risk", risks.iter().map(|risk| risk.id.as_str())),
                name,
                category: draft.category,
                probability: draft.probability.clamp(1, 5),
                impact: draft.impact.clamp(1, 5),
                mitigation: draft.mitigation.trim().to_string(),
            };
            risks.push(risk.clone());
            Ok(risk)
        })
    }

    pub fn remove_risk(&self, id: &str) -> Result<(), WorkspaceError> {
        self.update_collection(StoreKey::Risks, |risks: &mut Vec<Risk>| {
            let before = risks.len();
            risks.retain(|risk| risk.id != id);
            if risks.len() == before {
                return Err(WorkspaceError::NotFound {
                    kind: "risk",
                    id: id.to_string(),
                });
            }
            Ok(())
        })
    }

    // KPIs

    pub fn kpis(&self) -> Vec<Kpi> {
        store::load_collection(self.store.as_ref(), StoreKey::Kpis)
    }

    pub fn add_kpi(&self, draft: KpiDraft) -> Result<Kpi, WorkspaceError> {
        let name = required(&draft.name, "name")?;
        let unit = required(&draft.unit, "unit")?;
        self.update_collection(StoreKey::Kpis, |kpis: &mut Vec<Kpi>| {
            let kpi = Kpi {
                id: next_id("kpi", kpis.iter().map(|kpi| kpi.id.as_str())),
                name,
                unit,
                current: finite_or_zero(draft.current),
                target: finite_or_zero(draft.target),
                category: draft.category,
            };
            kpis.push(kpi.clone());
            Ok(kpi)
        })
    }

    pub fn update_kpi_current(&self, id: &str, current: f64) -> Result<Kpi, WorkspaceError> {
        self.update_collection(StoreKey::Kpis, |kpis: &mut Vec<Kpi>| {
            let kpi = kpis
                .iter_mut()
                .find(|kpi| kpi.id == id)
                .ok_or_else(|| WorkspaceError::NotFound {
                    kind: "kpi",
                    id: id.to_string(),
                })?;
            kpi.current = finite_or_zero(current);
            Ok(kpi.clone())
        })
    }

    pub fn remove_kpi(&self, id: &str) -> Result<(), WorkspaceError> {
        self.update_collection(StoreKey::Kpis, |kpis: &mut Vec<Kpi>| {
            let before = kpis.len();
            kpis.retain(|kpi| kpi.id != id);
            if kpis.len() == before {
                return Err(WorkspaceError::NotFound {
                    kind: "kpi",
                    id: id.to_string(),
                });
            }
            Ok(())
        })
    }

    // Action plan

    pub fn actions(&self) -> Vec<ActionItem> {
        store::load_collection(self.store.as_ref(), StoreKey::ActionPlan)
    }

    pub fn add_action(&self, draft: ActionDraft) -> Result<ActionItem, WorkspaceError> {
        let title = required(&draft.title, "title")?;
        let responsible = required(&draft.responsible, "responsible")?;
        let due_date = draft
            .due_date
            .ok_or(WorkspaceError::MissingField("due_date"))?;

        self.update_collection(StoreKey::ActionPlan, |actions: &mut Vec<ActionItem>| {
            let action = ActionItem {
                id: next_id("action", actions.iter().map(|action| action.id.as_str())),
                title,
                responsible,
                due_date,
                progress: 0,
                category: draft.category,
            };
            actions.push(action.clone());
            Ok(action)
        })
    }

    pub fn update_action_progress(
        &self,
        id: &str,
        progress: i64,
    ) -> Result<ActionItem, WorkspaceError> {
        self.update_collection(StoreKey::ActionPlan, |actions: &mut Vec<ActionItem>| {
            let action = actions
                .iter_mut()
                .find(|action| action.id == id)
                .ok_or_else(|| WorkspaceError::NotFound {
                    kind: "action",
                    id: id.to_string(),
                })?;
            action.progress = normalize_progress(progress);
            Ok(action.clone())
        })
    }

    pub fn remove_action(&self, id: &str) -> Result<(), WorkspaceError> {
        self.update_collection(StoreKey::ActionPlan, |actions: &mut Vec<ActionItem>| {
            let before = actions.len();
            actions.retain(|action| action.id != id);
            if actions.len() == before {
                return Err(WorkspaceError::NotFound {
                    kind: "action",
                    id: id.to_string(),
                });
            }
            Ok(())
        })
    }

    // Views

    pub fn dashboard(&self) -> DashboardView {
        let profile = self.profile();
        let diagnostic = self.diagnostic();
        let carbon = self.carbon();

        compose_dashboard(DashboardInputs {
            questionnaire: &self.questionnaire,
            profile: &profile,
            diagnostic: &diagnostic,
            carbon: &carbon,
        })
    }

    pub fn report(&self, today: NaiveDate) -> ReportView {
        let profile = self.profile();
        let diagnostic = self.diagnostic();
        let carbon = self.carbon();
        let actions = self.actions();
        let risks = self.risks();
        let kpis = self.kpis();

        compose_report(ReportInputs {
            questionnaire: &self.questionnaire,
            profile: &profile,
            answers: &diagnostic.answers,
            carbon: &carbon,
            actions: &actions,
            risks: &risks,
            kpis: &kpis,
            today,
        })
    }
}
