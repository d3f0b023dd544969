use super::category::EsgCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: String,
    pub title: String,
    pub responsible: String,
    pub due_date: NaiveDate,
    pub progress: u8,
    pub category: EsgCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    NotStarted,
    InProgress,
    Overdue,
    Completed,
}

impl ActionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Overdue => "Overdue",
            Self::Completed => "Completed",
        }
    }
}

impl ActionItem {
    pub fn is_completed(&self) -> bool {
        self.progress >= 100
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today && !self.is_completed()
    }

    pub fn is_in_progress(&self) -> bool {
        self.progress > 0 && !self.is_completed()
    }

    pub fn status(&self, today: NaiveDate) -> ActionStatus {
        if self.is_completed() {
            ActionStatus::Completed
        } else if self.is_overdue(today) {
            ActionStatus::Overdue
        } else if self.is_in_progress() {
            ActionStatus::InProgress
        } else {
            ActionStatus::NotStarted
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionDraft {
    pub title: String,
    pub responsible: String,
    pub due_date: Option<NaiveDate>,
    pub category: EsgCategory,
}

/// Clamps to 0..=100 and snaps to the nearest step of 10.
pub fn normalize_progress(raw: i64) -> u8 {
    let clamped = raw.clamp(0, 100);
    (((clamped + 5) / 10) * 10) as u8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub overdue: usize,
}

pub fn summarize_actions(actions: &[ActionItem], today: NaiveDate) -> ActionStats {
    ActionStats {
        total: actions.len(),
        completed: actions.iter().filter(|action| action.is_completed()).count(),
        in_progress: actions
            .iter()
            .filter(|action| action.is_in_progress())
            .count(),
        overdue: actions
            .iter()
            .filter(|action| action.is_overdue(today))
            .count(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionCompletion {
    pub completed: usize,
    pub total: usize,
    pub ratio: f64,
    /// `completed/total`, e.g. `1/2`.
    pub label: String,
}

pub fn action_completion(actions: &[ActionItem]) -> ActionCompletion {
    let total = actions.len();
    let completed = actions.iter().filter(|action| action.is_completed()).count();
    let ratio = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    };

    ActionCompletion {
        completed,
        total,
        ratio,
        label: format!("{completed}/{total}"),
    }
}
